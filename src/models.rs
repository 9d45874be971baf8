use schemars::JsonSchema;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Weather Record Models
// ============================================================================

/// A complete weather report for one location, as described by the model.
///
/// Decoding never rejects a field's value: `null`, missing keys and loosely
/// typed values all fall back to absent or default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient_coordinates", skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, deserialize_with = "null_default")]
    pub current: CurrentConditions,
    #[serde(default, deserialize_with = "null_default")]
    pub forecast: Vec<ForecastDay>,
    /// `None` when the model omitted the field, `Some(vec![])` when it reported no hazards
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerts: Option<Vec<WeatherAlert>>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub analysis: Option<String>,
    /// Filled from grounding metadata only; anything the model writes here is ignored
    #[serde(default, skip_deserializing)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Location query understood by the model for a raw position
    pub fn to_query(&self) -> String {
        format!("coordinates {}, {}", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub humidity: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub pressure: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aqi: Option<AirQualityIndex>,
}

/// US AQI reading (0-500)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQualityIndex {
    #[serde(default, deserialize_with = "lenient_index")]
    pub index: f64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

/// Severity band of an AQI reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AqiTier {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiTier {
    pub fn from_index(index: f64) -> Self {
        if index <= 50.0 {
            Self::Good
        } else if index <= 100.0 {
            Self::Moderate
        } else if index <= 150.0 {
            Self::UnhealthyForSensitiveGroups
        } else if index <= 200.0 {
            Self::Unhealthy
        } else if index <= 300.0 {
            Self::VeryUnhealthy
        } else {
            Self::Hazardous
        }
    }

    /// 1-based tier number, 1 being the cleanest air
    pub fn level(&self) -> u8 {
        match self {
            Self::Good => 1,
            Self::Moderate => 2,
            Self::UnhealthyForSensitiveGroups => 3,
            Self::Unhealthy => 4,
            Self::VeryUnhealthy => 5,
            Self::Hazardous => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
        }
    }
}

impl AirQualityIndex {
    pub fn tier(&self) -> AqiTier {
        AqiTier::from_index(self.index)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    #[serde(default, deserialize_with = "lenient_text")]
    pub day: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temp_high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub temp_low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub condition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_severity")]
    pub severity: AlertSeverity,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
}

/// Official hazard level. Unknown labels are treated as advisories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AlertSeverity {
    #[default]
    Advisory,
    Watch,
    Warning,
}

impl From<String> for AlertSeverity {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "warning" => Self::Warning,
            "watch" => Self::Watch,
            _ => Self::Advisory,
        }
    }
}

impl AlertSeverity {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Advisory => "ADVISORY",
            Self::Watch => "WATCH",
            Self::Warning => "WARNING",
        }
    }
}

/// A citation backing the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Web,
    Map,
}

// ============================================================================
// Lenient Decoding
// ============================================================================

/// Any JSON scalar the model might put where a string or number belongs
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Number(serde_json::Number),
    Other(#[allow(dead_code)] IgnoredAny),
}

/// `null` reads as the type's default
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Strings kept as-is, numbers in their textual form, anything else absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Text(text)) => Some(text),
        Some(Loose::Number(number)) => Some(number.to_string()),
        Some(Loose::Other(_)) | None => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Numbers as-is, strings by their leading numeric part ("21", "21°C")
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Loose>::deserialize(deserializer)? {
        Some(Loose::Number(number)) => number.as_f64(),
        Some(Loose::Text(text)) => leading_number(&text),
        Some(Loose::Other(_)) | None => None,
    })
}

fn lenient_index<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.unwrap_or_default())
}

fn lenient_severity<'de, D>(deserializer: D) -> Result<AlertSeverity, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?
        .map(AlertSeverity::from)
        .unwrap_or_default())
}

/// Coordinates are kept only when both components are usable
fn lenient_coordinates<'de, D>(deserializer: D) -> Result<Option<Coordinates>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct RawCoordinates {
        #[serde(default, deserialize_with = "lenient_number")]
        lat: Option<f64>,
        #[serde(default, deserialize_with = "lenient_number")]
        lon: Option<f64>,
    }

    Ok(match Option::<RawCoordinates>::deserialize(deserializer)? {
        Some(RawCoordinates {
            lat: Some(lat),
            lon: Some(lon),
        }) => Some(Coordinates::new(lat, lon)),
        _ => None,
    })
}

fn leading_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);
    trimmed[..end].parse().ok()
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetWeatherRequest {
    /// Place name to look up, e.g. "Paris" or "Springfield, Illinois"
    pub query: String,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetWeatherByCoordinatesRequest {
    pub latitude: f64,
    pub longitude: f64,
}
