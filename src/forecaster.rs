use std::sync::Arc;

use crate::error::WeatherError;
use crate::geolocation::Geolocator;
use crate::models::{Coordinates, WeatherRecord};
use crate::normalizer::normalize;
use crate::prompt::{build_prompt, WeatherQuery};
use crate::provider::CompletionProvider;

/// Builds the prompt, calls the model and normalizes its answer.
///
/// Holds no state between calls; every lookup is independent.
#[derive(Clone)]
pub struct Forecaster {
    provider: Arc<dyn CompletionProvider>,
}

impl Forecaster {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }

    /// Weather for a free-text place description
    pub async fn fetch_weather(&self, query: &str) -> Result<WeatherRecord, WeatherError> {
        let query = WeatherQuery::new(query)?;
        let prompt = build_prompt(&query);

        let completion = self.provider.generate(&prompt).await?;

        let text = match completion.text {
            Some(text) if !text.trim().is_empty() => text,
            _ => return Err(WeatherError::NoData),
        };

        let record = normalize(&text, &completion.grounding_chunks)?;
        tracing::info!(
            query = query.as_str(),
            location = %record.location,
            forecast_days = record.forecast.len(),
            sources = record.sources.len(),
            "Weather report assembled"
        );
        Ok(record)
    }

    pub async fn fetch_weather_by_coords(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherRecord, WeatherError> {
        self.fetch_weather(&Coordinates::new(latitude, longitude).to_query())
            .await
    }

    /// Weather at the position reported by `locator`
    pub async fn fetch_local_weather(
        &self,
        locator: &dyn Geolocator,
    ) -> Result<WeatherRecord, WeatherError> {
        let position = locator.current_position().await?;
        self.fetch_weather_by_coords(position.lat, position.lon).await
    }
}
