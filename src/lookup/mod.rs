//! City-level air quality lookups.
//!
//! Provides:
//! - [`AirQualityProvider`], the seam the CLI queries through
//! - [`AqiBand`], the 1 (best) to 5 (worst) index with labels and
//!   health advisories
//! - [`AirQualityReport`], one resolved observation for a city
//!
//! The shipping provider is [`openweather::OpenWeatherClient`]; the
//! trait exists so the interactive layer never depends on a concrete
//! backend.

pub mod openweather;

pub use openweather::OpenWeatherClient;

use serde::Deserialize;
use thiserror::Error;

/// Failures while resolving a city or fetching its observation.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The request never completed (network, TLS, timeout) or the body
    /// failed to decode.
    #[error("air quality request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("air quality service rejected the request ({status}): {detail}")]
    Service { status: u16, detail: String },

    /// The response decoded but did not carry what we need.
    #[error("unexpected air quality payload: {0}")]
    Payload(String),
}

/// Air quality index band as reported by OpenWeatherMap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AqiBand {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl AqiBand {
    /// Map the raw 1..=5 index from the API. Anything else is `None`.
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Self::Good),
            2 => Some(Self::Fair),
            3 => Some(Self::Moderate),
            4 => Some(Self::Poor),
            5 => Some(Self::VeryPoor),
            _ => None,
        }
    }

    /// The numeric index this band came from.
    pub fn index(self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Fair => 2,
            Self::Moderate => 3,
            Self::Poor => 4,
            Self::VeryPoor => 5,
        }
    }

    /// Short label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }

    /// One-line health recommendation for this band.
    pub fn advisory(self) -> &'static str {
        match self {
            Self::Good => "Air quality is good. Enjoy outdoor activities!",
            Self::Fair => {
                "Air quality is fair. Sensitive individuals should limit \
                 prolonged outdoor exertion."
            }
            Self::Moderate => {
                "Air quality is moderate. People with respiratory or heart \
                 conditions should reduce outdoor exertion."
            }
            Self::Poor => {
                "Air quality is poor. Avoid prolonged outdoor activities. \
                 Wear a mask if necessary."
            }
            Self::VeryPoor => {
                "Air quality is very poor. Stay indoors and keep windows \
                 closed. Wear a mask if you must go outside."
            }
        }
    }
}

/// Pollutant concentrations in μg/m³. Fields the service omits default
/// to zero; fields it adds are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PollutantLevels {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

impl PollutantLevels {
    /// Name and value pairs in the order the service documents them.
    pub fn readings(&self) -> [(&'static str, f64); 8] {
        [
            ("co", self.co),
            ("no", self.no),
            ("no2", self.no2),
            ("o3", self.o3),
            ("so2", self.so2),
            ("pm2_5", self.pm2_5),
            ("pm10", self.pm10),
            ("nh3", self.nh3),
        ]
    }
}

/// One air quality observation, tagged with the city the caller asked
/// about.
#[derive(Debug, Clone)]
pub struct AirQualityReport {
    pub city: String,
    pub band: AqiBand,
    pub components: PollutantLevels,
}

/// A backend that can turn a city name into a report.
pub trait AirQualityProvider {
    /// Fetch the current report for `city`. `Ok(None)` means the name
    /// did not resolve to any known place.
    fn by_city(&self, city: &str) -> Result<Option<AirQualityReport>, LookupError>;
}

// ── Tests ───────────────────────────────────────────────────────────
