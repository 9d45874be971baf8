//! Grounded weather lookups served over the Model Context Protocol.
//!
//! A place name or coordinate pair is turned into an instruction for Gemini,
//! sent with Google Search and Google Maps grounding enabled, and the JSON
//! embedded in the completion is carved out and combined with the cited
//! sources into a [`models::WeatherRecord`].

pub mod config;
pub mod constants;
pub mod error;
pub mod forecaster;
pub mod formatters;
pub mod geolocation;
pub mod models;
pub mod normalizer;
pub mod prompt;
pub mod provider;
pub mod service;

pub use error::WeatherError;
pub use forecaster::Forecaster;
pub use models::WeatherRecord;
pub use provider::{CompletionProvider, GeminiClient, ModelCompletion};
