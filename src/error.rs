use thiserror::Error;

/// Errors produced while fetching and ingesting a weather report
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The location query was empty after trimming
    #[error("Location query must not be empty")]
    EmptyQuery,

    /// The request never produced an HTTP response
    #[error("Request to weather model failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status
    #[error("Weather model returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// The provider answered but the completion carried no text
    #[error("No data received from the weather model.")]
    NoData,

    /// The completion text held no parseable weather payload
    #[error("Failed to parse weather data format.")]
    MalformedPayload,

    /// The device position could not be determined
    #[error("Unable to determine location: {0}")]
    Geolocation(String),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// Whether this error came from the location collaborator rather than the model
    pub fn is_geolocation(&self) -> bool {
        matches!(self, Self::Geolocation(_))
    }
}
