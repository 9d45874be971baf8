use std::fmt;

use crate::constants::{DEFAULT_MODEL, GEMINI_API_BASE};
use crate::error::WeatherError;
use crate::models::Coordinates;

/// Connection settings for the Gemini API
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    /// Fixed position answered for "current location" lookups
    pub home: Option<Coordinates>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, WeatherError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, WeatherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| WeatherError::Config("GEMINI_API_KEY is not set".to_string()))?;

        let gemini = GeminiConfig {
            api_key,
            model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            base_url: lookup("GEMINI_API_BASE").unwrap_or_else(|| GEMINI_API_BASE.into()),
        };

        let home = match (lookup("SKYCAST_HOME_LAT"), lookup("SKYCAST_HOME_LON")) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(
                parse_degrees("SKYCAST_HOME_LAT", &lat, 90.0)?,
                parse_degrees("SKYCAST_HOME_LON", &lon, 180.0)?,
            )),
            (None, None) => None,
            _ => {
                return Err(WeatherError::Config(
                    "SKYCAST_HOME_LAT and SKYCAST_HOME_LON must be set together".to_string(),
                ))
            }
        };

        Ok(Self { gemini, home })
    }
}

fn parse_degrees(key: &str, raw: &str, limit: f64) -> Result<f64, WeatherError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| (-limit..=limit).contains(value))
        .ok_or_else(|| WeatherError::Config(format!("{key} is not a valid coordinate: {raw}")))
}
