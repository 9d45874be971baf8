use rmcp::{
    handler::server::{wrapper::Parameters, ServerHandler, tool::ToolRouter},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError,
};
use std::sync::Arc;

use crate::error::WeatherError;
use crate::forecaster::Forecaster;
use crate::formatters::format_weather;
use crate::geolocation::Geolocator;
use crate::models::{GetWeatherByCoordinatesRequest, GetWeatherRequest, WeatherRecord};

const SEARCH_FAILED: &str =
    "Unable to retrieve weather data. Please check the city name or try again later.";
const LOCAL_SEARCH_FAILED: &str = "Failed to get weather for your location.";
const LOCATION_UNAVAILABLE: &str =
    "Unable to retrieve your location. Please ensure a home location is configured.";

/// MCP server answering weather lookups through the grounded model
#[derive(Clone)]
pub struct WeatherServer {
    forecaster: Forecaster,
    locator: Arc<dyn Geolocator>,
    tool_router: ToolRouter<Self>,
}

impl WeatherServer {
    pub fn new(forecaster: Forecaster, locator: Arc<dyn Geolocator>) -> Self {
        Self {
            forecaster,
            locator,
            tool_router: Self::tool_router(),
        }
    }

    /// Maps a lookup outcome onto a tool result. Model output never reaches
    /// the caller verbatim on failure.
    fn to_tool_result(
        result: Result<WeatherRecord, WeatherError>,
        failure_message: &str,
    ) -> Result<CallToolResult, McpError> {
        match result {
            Ok(record) => Ok(CallToolResult::success(vec![Content::text(format_weather(
                &record,
            ))])),
            Err(WeatherError::EmptyQuery) => Err(McpError::invalid_params(
                "Location query must not be empty.",
                None,
            )),
            Err(e @ WeatherError::Geolocation(_)) => {
                tracing::warn!(error = %e, "Location lookup failed");
                Err(McpError::invalid_request(LOCATION_UNAVAILABLE, None))
            }
            Err(e) => {
                tracing::error!(error = %e, "Weather lookup failed");
                Err(McpError::internal_error(failure_message.to_string(), None))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for WeatherServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "skycast".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some(
                "A weather service backed by Gemini with Google Search and Google Maps grounding. \
                Provides current conditions, a 5-day forecast, air quality, official alerts and \
                cited sources for any place worldwide."
                    .to_string(),
            ),
        }
    }
}

#[tool_router]
impl WeatherServer {
    /// Gets weather for a place name
    #[tool(description = "Get current weather, a 5-day forecast, air quality and official alerts for a place (e.g., 'Paris', 'Springfield, Illinois').")]
    async fn get_weather(
        &self,
        Parameters(request): Parameters<GetWeatherRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting weather for: {}", request.query);

        let result = self.forecaster.fetch_weather(&request.query).await;
        Self::to_tool_result(result, SEARCH_FAILED)
    }

    /// Gets weather for a latitude/longitude pair
    #[tool(description = "Get current weather, a 5-day forecast, air quality and official alerts for coordinates (e.g., latitude: 48.8566, longitude: 2.3522 for Paris).")]
    async fn get_weather_by_coordinates(
        &self,
        Parameters(request): Parameters<GetWeatherByCoordinatesRequest>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            "Getting weather for coordinates: {}, {}",
            request.latitude,
            request.longitude
        );

        let result = self
            .forecaster
            .fetch_weather_by_coords(request.latitude, request.longitude)
            .await;
        Self::to_tool_result(result, LOCAL_SEARCH_FAILED)
    }

    /// Gets weather at the server's configured location
    #[tool(description = "Get weather for the user's current location, as configured on the server.")]
    async fn get_local_weather(&self) -> Result<CallToolResult, McpError> {
        tracing::info!("Getting weather for current location");

        let result = self
            .forecaster
            .fetch_local_weather(self.locator.as_ref())
            .await;
        Self::to_tool_result(result, LOCAL_SEARCH_FAILED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::ConfiguredLocation;
    use crate::provider::{CompletionProvider, ModelCompletion};
    use async_trait::async_trait;
    use rmcp::model::ErrorCode;

    struct Canned(Option<&'static str>);

    #[async_trait]
    impl CompletionProvider for Canned {
        async fn generate(&self, _prompt: &str) -> Result<ModelCompletion, WeatherError> {
            Ok(ModelCompletion {
                text: self.0.map(str::to_string),
                grounding_chunks: Vec::new(),
            })
        }
    }

    fn server(reply: Option<&'static str>) -> WeatherServer {
        WeatherServer::new(
            Forecaster::new(Arc::new(Canned(reply))),
            Arc::new(ConfiguredLocation::default()),
        )
    }

    #[tokio::test]
    async fn successful_lookup_renders_report() {
        let result = server(Some(r#"{"location":"Lima, Peru","forecast":[]}"#))
            .get_weather(Parameters(GetWeatherRequest {
                query: "Lima".to_string(),
            }))
            .await
            .unwrap();
        assert_ne!(result.is_error, Some(true));

        let rendered = serde_json::to_value(&result).unwrap();
        let text = rendered["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Weather for Lima, Peru"));
    }

    #[tokio::test]
    async fn blank_query_is_invalid_params() {
        let err = server(None)
            .get_weather(Parameters(GetWeatherRequest {
                query: " ".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn parse_failure_hides_model_text() {
        let err = server(Some("secret internal reasoning"))
            .get_weather(Parameters(GetWeatherRequest {
                query: "Lima".to_string(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert_eq!(err.message, SEARCH_FAILED);
    }

    #[tokio::test]
    async fn missing_location_is_not_a_provider_error() {
        let err = server(Some("{}")).get_local_weather().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::INVALID_REQUEST);
        assert_eq!(err.message, LOCATION_UNAVAILABLE);
    }
}
