//! Gemini `generateContent` client with Search and Maps grounding.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::constants::USER_AGENT;
use crate::error::WeatherError;

/// Raw output of one model call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelCompletion {
    pub text: Option<String>,
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// A text-completion backend with web and maps retrieval enabled
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<ModelCompletion, WeatherError>;
}

// ============================================================================
// Gemini Wire Models
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub tools: Vec<Tool>,
}

impl GenerateContentRequest {
    /// Single user turn with both grounding tools declared
    pub fn grounded(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                    thought: None,
                }],
            }],
            tools: vec![
                Tool::GoogleSearch(ToolConfig {}),
                Tool::GoogleMaps(ToolConfig {}),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Tool {
    GoogleSearch(ToolConfig),
    GoogleMaps(ToolConfig),
}

#[derive(Debug, Serialize)]
pub struct ToolConfig {}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

/// One citation unit; `web` and `maps` are independent of each other
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web: Option<WebChunk>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps: Option<MapsChunk>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapsChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Text and citations of the first candidate. Thought parts are skipped.
    pub fn into_completion(self) -> ModelCompletion {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return ModelCompletion::default();
        };

        let texts: Vec<String> = candidate
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text)
            .collect();

        ModelCompletion {
            text: if texts.is_empty() { None } else { Some(texts.concat()) },
            grounding_chunks: candidate
                .grounding_metadata
                .map(|metadata| metadata.grounding_chunks)
                .unwrap_or_default(),
        }
    }
}

// ============================================================================
// Gemini Client
// ============================================================================

/// HTTP client for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, WeatherError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Posts the request and decodes the JSON response
    async fn make_request(
        &self,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, WeatherError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = match response.text().await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read error body from weather model");
                    String::new()
                }
            };
            let message = provider_error_message(status, &raw);
            tracing::warn!(status = status.as_u16(), %message, "Weather model rejected request");
            return Err(WeatherError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let data = response.json::<GenerateContentResponse>().await?;
        Ok(data)
    }
}

/// Message from a Gemini error envelope, the raw body, or the status reason
fn provider_error_message(status: StatusCode, raw: &str) -> String {
    if raw.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown provider error")
            .to_string();
    }
    serde_json::from_str::<ApiErrorEnvelope>(raw)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| raw.to_string())
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<ModelCompletion, WeatherError> {
        tracing::debug!(model = %self.config.model, "Sending grounded generateContent request");

        let response = self
            .make_request(&GenerateContentRequest::grounded(prompt))
            .await?;

        Ok(response.into_completion())
    }
}
