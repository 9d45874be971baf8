use async_trait::async_trait;

use crate::error::WeatherError;
use crate::models::Coordinates;

/// Source of the caller's current position
#[async_trait]
pub trait Geolocator: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, WeatherError>;
}

/// Answers with a position fixed in configuration, or a denial when none is set
#[derive(Debug, Clone, Default)]
pub struct ConfiguredLocation {
    home: Option<Coordinates>,
}

impl ConfiguredLocation {
    pub fn new(home: Option<Coordinates>) -> Self {
        Self { home }
    }
}

#[async_trait]
impl Geolocator for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, WeatherError> {
        self.home.ok_or_else(|| {
            WeatherError::Geolocation(
                "no home position configured (set SKYCAST_HOME_LAT and SKYCAST_HOME_LON)"
                    .to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn configured_position_is_returned() {
        let locator = ConfiguredLocation::new(Some(Coordinates::new(1.5, 2.5)));
        assert_eq!(
            locator.current_position().await.unwrap(),
            Coordinates::new(1.5, 2.5)
        );
    }

    #[tokio::test]
    async fn missing_position_is_a_geolocation_error() {
        let err = ConfiguredLocation::default()
            .current_position()
            .await
            .unwrap_err();
        assert!(err.is_geolocation());
    }
}
