//! OpenWeatherMap backend for air quality lookups.
//!
//! Two calls per query: the geocoding endpoint turns a city name into
//! coordinates, then the air pollution endpoint returns the index and
//! pollutant concentrations for that point.

use serde::Deserialize;
use std::time::Duration;

use crate::lookup::{AirQualityProvider, AirQualityReport, AqiBand, LookupError, PollutantLevels};

/// Geocoding endpoint: city name to coordinates.
const GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// Air pollution endpoint: coordinates to index + components.
const AIR_POLLUTION_URL: &str = "https://api.openweathermap.org/data/2.5/air_pollution";

/// Request timeout for both endpoints.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ── Wire models ─────────────────────────────────────────────────────

/// One geocoding match. The endpoint returns a JSON array of these.
#[derive(Debug, Deserialize)]
struct GeoPlace {
    lat: f64,
    lon: f64,
}

/// Air pollution response envelope.
#[derive(Debug, Deserialize)]
struct PollutionResponse {
    list: Vec<PollutionSample>,
}

/// One observation in the response list.
#[derive(Debug, Deserialize)]
struct PollutionSample {
    main: PollutionIndex,
    components: PollutantLevels,
}

#[derive(Debug, Deserialize)]
struct PollutionIndex {
    aqi: u8,
}

// ── Client ──────────────────────────────────────────────────────────

/// OpenWeatherMap HTTP client.
pub struct OpenWeatherClient {
    http: reqwest::blocking::Client,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LookupError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
        })
    }

    /// Resolve a city name to coordinates. `None` when the service knows
    /// no such place.
    fn geocode(&self, city: &str) -> Result<Option<GeoPlace>, LookupError> {
        let resp = self
            .http
            .get(GEOCODING_URL)
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()?;
        let resp = check_status(resp)?;
        let places: Vec<GeoPlace> = resp.json()?;
        Ok(places.into_iter().next())
    }

    /// Fetch the current observation for a coordinate pair.
    fn pollution(&self, lat: f64, lon: f64) -> Result<PollutionResponse, LookupError> {
        let resp = self
            .http
            .get(AIR_POLLUTION_URL)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()?;
        let resp = check_status(resp)?;
        Ok(resp.json()?)
    }
}

impl AirQualityProvider for OpenWeatherClient {
    fn by_city(&self, city: &str) -> Result<Option<AirQualityReport>, LookupError> {
        let place = match self.geocode(city)? {
            Some(place) => place,
            None => {
                tracing::debug!(city, "Geocoding returned no match");
                return Ok(None);
            }
        };
        tracing::debug!(city, lat = place.lat, lon = place.lon, "City resolved");

        let response = self.pollution(place.lat, place.lon)?;
        Ok(Some(report_from(city, response)?))
    }
}

/// Reject non-success responses, keeping status and body for the error.
fn check_status(
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, LookupError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let detail = resp.text().unwrap_or_default();
    Err(LookupError::Service {
        status,
        detail: detail.trim().to_string(),
    })
}

/// Pick the first observation out of a response and band its index.
fn report_from(city: &str, response: PollutionResponse) -> Result<AirQualityReport, LookupError> {
    let sample = response
        .list
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::Payload("empty observation list".to_string()))?;
    let band = AqiBand::from_index(sample.main.aqi).ok_or_else(|| {
        LookupError::Payload(format!("aqi index {} outside 1..=5", sample.main.aqi))
    })?;
    Ok(AirQualityReport {
        city: city.to_string(),
        band,
        components: sample.components,
    })
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // Response shapes trimmed from the OpenWeatherMap API documentation.
    const GEO_JSON: &str = r#"[
        {"name":"London","local_names":{"en":"London"},"lat":51.5073,
         "lon":-0.1276,"country":"GB","state":"England"}
    ]"#;

    const POLLUTION_JSON: &str = r#"{
        "coord":{"lon":-0.1276,"lat":51.5073},
        "list":[{
            "main":{"aqi":2},
            "components":{"co":201.94,"no":0.02,"no2":0.77,"o3":68.66,
                          "so2":0.64,"pm2_5":0.5,"pm10":0.54,"nh3":0.12},
            "dt":1606147200
        }]
    }"#;

    #[test]
    fn geocoding_response_parses_with_extra_fields() {
        let places: Vec<GeoPlace> = serde_json::from_str(GEO_JSON).unwrap();
        assert_eq!(places.len(), 1);
        assert!((places[0].lat - 51.5073).abs() < 1e-9);
        assert!((places[0].lon - -0.1276).abs() < 1e-9);
    }

    #[test]
    fn empty_geocoding_response_means_unknown_city() {
        let places: Vec<GeoPlace> = serde_json::from_str("[]").unwrap();
        assert!(places.into_iter().next().is_none());
    }

    #[test]
    fn pollution_response_parses() {
        let response: PollutionResponse = serde_json::from_str(POLLUTION_JSON).unwrap();
        let report = report_from("London", response).unwrap();
        assert_eq!(report.city, "London");
        assert_eq!(report.band, AqiBand::Fair);
        assert!((report.components.co - 201.94).abs() < 1e-9);
        assert!((report.components.nh3 - 0.12).abs() < 1e-9);
    }

    #[test]
    fn missing_components_default_to_zero() {
        let json = r#"{"list":[{"main":{"aqi":1},"components":{"co":3.0}}]}"#;
        let response: PollutionResponse = serde_json::from_str(json).unwrap();
        let report = report_from("Nowhere", response).unwrap();
        assert!((report.components.co - 3.0).abs() < 1e-9);
        assert_eq!(report.components.pm10, 0.0);
    }

    #[test]
    fn empty_observation_list_is_a_payload_error() {
        let response: PollutionResponse = serde_json::from_str(r#"{"list":[]}"#).unwrap();
        let err = report_from("London", response).unwrap_err();
        assert!(matches!(err, LookupError::Payload(_)));
    }

    #[test]
    fn out_of_range_index_is_a_payload_error() {
        let json = r#"{"list":[{"main":{"aqi":9},"components":{}}]}"#;
        let response: PollutionResponse = serde_json::from_str(json).unwrap();
        let err = report_from("London", response).unwrap_err();
        assert!(matches!(err, LookupError::Payload(_)));
    }

    #[test]
    fn client_creation_succeeds() {
        assert!(OpenWeatherClient::new("test-key").is_ok());
    }
}
