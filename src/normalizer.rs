//! Turns a free-form model completion plus its grounding citations into a
//! [`WeatherRecord`].
//!
//! Models wrap JSON in markdown fences and chatty prose often enough that a
//! strict parse is useless. The payload is carved out textually instead: fence
//! markers are deleted, then everything between the first `{` and the last `}`
//! is handed to serde.

use lazy_static::lazy_static;
use regex::Regex;

use crate::constants::MAPS_SOURCE_TITLE;
use crate::error::WeatherError;
use crate::models::{Source, SourceKind, WeatherRecord};
use crate::provider::GroundingChunk;

lazy_static! {
    static ref JSON_FENCE_OPEN: Regex = Regex::new(r"```json\n?").expect("valid fence pattern");
}

const FENCE: &str = "```";

/// Strips fence markers and slices the text to its outermost braces
pub fn extract_json_body(text: &str) -> String {
    let stripped = JSON_FENCE_OPEN.replace_all(text, "").replace(FENCE, "");

    match (stripped.find('{'), stripped.rfind('}')) {
        (Some(start), Some(end)) if start < end => stripped[start..=end].to_string(),
        _ => stripped,
    }
}

/// Parses the carved payload. The raw completion is logged on failure but
/// never returned to the caller.
pub fn parse_payload(text: &str) -> Result<WeatherRecord, WeatherError> {
    let body = extract_json_body(text);

    serde_json::from_str::<WeatherRecord>(&body).map_err(|e| {
        tracing::error!(error = %e, raw = %text, "Failed to parse JSON from model response");
        WeatherError::MalformedPayload
    })
}

/// Web citations in encounter order, followed by every maps citation
pub fn normalize_sources(chunks: &[GroundingChunk]) -> Vec<Source> {
    let mut sources: Vec<Source> = chunks
        .iter()
        .filter_map(|chunk| {
            let web = chunk.web.as_ref()?;
            let uri = non_empty(web.uri.as_deref())?;
            let title = non_empty(web.title.as_deref())?;
            Some(Source {
                title: title.to_string(),
                uri: uri.to_string(),
                kind: SourceKind::Web,
            })
        })
        .collect();

    for chunk in chunks {
        if let Some(uri) = chunk.maps.as_ref().and_then(|maps| non_empty(maps.uri.as_deref())) {
            sources.push(Source {
                title: MAPS_SOURCE_TITLE.to_string(),
                uri: uri.to_string(),
                kind: SourceKind::Map,
            });
        }
    }

    sources
}

/// Parses the completion and attaches the normalized citations
pub fn normalize(text: &str, chunks: &[GroundingChunk]) -> Result<WeatherRecord, WeatherError> {
    let mut record = parse_payload(text)?;
    record.sources = normalize_sources(chunks);
    Ok(record)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
