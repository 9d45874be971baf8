//! Integration tests for the Gemini client using wiremock
//!
//! These tests mock the `generateContent` endpoint to verify request shape,
//! response ingestion and error handling without real API calls.

use std::sync::Arc;

use serde_json::json;
use skycast_mcp::config::GeminiConfig;
use skycast_mcp::models::SourceKind;
use skycast_mcp::{CompletionProvider, Forecaster, GeminiClient, WeatherError};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

const ENDPOINT: &str = "/models/gemini-2.5-flash:generateContent";

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_client(mock_server: &MockServer) -> GeminiClient {
    let mut config = GeminiConfig::new("test-api-key");
    config.base_url = mock_server.uri();
    GeminiClient::new(config).expect("Failed to create client")
}

fn weather_json() -> String {
    json!({
        "location": "Berlin, Germany",
        "coordinates": {"lat": 52.52, "lon": 13.405},
        "current": {
            "temp": 7.0,
            "condition": "Overcast",
            "humidity": "78%",
            "windSpeed": "18 km/h",
            "feelsLike": 4.0
        },
        "forecast": [
            {"day": "Mon", "date": "Oct 20", "tempHigh": 9, "tempLow": 3, "condition": "Cloudy"},
            {"day": "Tue", "date": "Oct 21", "tempHigh": 10, "tempLow": 4, "condition": "Rain"},
            {"day": "Wed", "date": "Oct 22", "tempHigh": 8, "tempLow": 2, "condition": "Rain"}
        ],
        "alerts": [
            {"title": "Wind Advisory", "severity": "advisory", "description": "Gusts up to 70 km/h."}
        ]
    })
    .to_string()
}

/// Sample generateContent response with fenced JSON and grounding chunks
fn generate_content_response(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"text": text}]
            },
            "finishReason": "STOP",
            "groundingMetadata": {
                "webSearchQueries": ["weather Berlin"],
                "groundingChunks": [
                    {"web": {"uri": "https://dwd.de", "title": "dwd.de"}},
                    {"maps": {"uri": "https://maps.google.com/?cid=42", "title": "Berlin", "placeId": "places/abc"}},
                    {"web": {"uri": "https://wetter.com"}}
                ]
            }
        }],
        "usageMetadata": {"promptTokenCount": 512, "candidatesTokenCount": 300}
    })
}

async fn setup_generate_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

// =============================================================================
// Request Shape
// =============================================================================

#[tokio::test]
async fn test_request_carries_key_and_both_tools() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "tools": [{"googleSearch": {}}, {"googleMaps": {}}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(generate_content_response("{}")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let completion = client.generate("weather please").await.unwrap();

    assert_eq!(completion.text.as_deref(), Some("{}"));
}

// =============================================================================
// End-to-End Ingestion
// =============================================================================

#[tokio::test]
async fn test_fenced_response_becomes_record() {
    let mock_server = MockServer::start().await;
    let text = format!("Here is the report:\n```json\n{}\n```", weather_json());
    setup_generate_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(generate_content_response(&text)),
    )
    .await;

    let forecaster = Forecaster::new(Arc::new(create_test_client(&mock_server)));
    let record = forecaster.fetch_weather("Berlin").await.unwrap();

    assert_eq!(record.location, "Berlin, Germany");
    assert_eq!(record.forecast.len(), 3);
    assert_eq!(record.alerts.as_ref().map(Vec::len), Some(1));

    let kinds: Vec<_> = record.sources.iter().map(|s| (s.kind, s.uri.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            (SourceKind::Web, "https://dwd.de"),
            (SourceKind::Map, "https://maps.google.com/?cid=42"),
        ]
    );
    assert_eq!(record.sources[1].title, "Google Maps");
}

#[tokio::test]
async fn test_empty_query_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let forecaster = Forecaster::new(Arc::new(create_test_client(&mock_server)));
    let err = forecaster.fetch_weather("  ").await.unwrap_err();

    assert!(matches!(err, WeatherError::EmptyQuery));
}

// =============================================================================
// Failure Scenarios
// =============================================================================

#[tokio::test]
async fn test_no_candidates_is_no_data() {
    let mock_server = MockServer::start().await;
    setup_generate_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "OTHER"}
        })),
    )
    .await;

    let forecaster = Forecaster::new(Arc::new(create_test_client(&mock_server)));
    let err = forecaster.fetch_weather("Berlin").await.unwrap_err();

    assert!(matches!(err, WeatherError::NoData));
}

#[tokio::test]
async fn test_prose_only_response_is_parse_failure() {
    let mock_server = MockServer::start().await;
    setup_generate_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(generate_content_response("I could not find weather for that place.")),
    )
    .await;

    let forecaster = Forecaster::new(Arc::new(create_test_client(&mock_server)));
    let err = forecaster.fetch_weather("Atlantis").await.unwrap_err();

    assert!(matches!(err, WeatherError::MalformedPayload));
}

#[tokio::test]
async fn test_api_error_is_provider_error() {
    let mock_server = MockServer::start().await;
    setup_generate_mock(
        &mock_server,
        ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "message": "Resource has been exhausted (e.g. check quota).",
                "status": "RESOURCE_EXHAUSTED"
            }
        })),
    )
    .await;

    let client = create_test_client(&mock_server);
    let err = client.generate("anything").await.unwrap_err();

    match err {
        WeatherError::Provider { status, message } => {
            assert_eq!(status, 429);
            assert!(message.contains("exhausted"));
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_as_message() {
    let mock_server = MockServer::start().await;
    setup_generate_mock(
        &mock_server,
        ResponseTemplate::new(503).set_body_string("upstream unavailable"),
    )
    .await;

    let err = create_test_client(&mock_server)
        .generate("anything")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WeatherError::Provider { status: 503, ref message } if message == "upstream unavailable"
    ));
}
