//! Air quality lookups behind a local, attempt-limited login.
//!
//! `airlock` keeps accounts in one CSV file you own, hashes every secret
//! into PHC strings, and gates OpenWeatherMap air quality queries behind
//! an interactive login with a fixed attempt budget.

pub mod auth;
pub mod cli;
pub mod config;
pub mod lookup;
