//! Instruction template sent to the model for every lookup.

use crate::error::WeatherError;

/// A non-empty, trimmed location description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery(String);

impl WeatherQuery {
    pub fn new(raw: &str) -> Result<Self, WeatherError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Builds the instruction describing the JSON payload the model must return
pub fn build_prompt(query: &WeatherQuery) -> String {
    format!(
        r#"You are SkyCast, a production-grade weather forecasting assistant.

Your task:
1. Use Google Search and Google Maps to find accurate, real-time weather, location details, Air Quality (AQI) and OFFICIAL WEATHER ALERTS for: "{query}".
2. Analyze the data to provide a helpful summary.
3. Return strictly valid JSON matching the schema below.

JSON Schema:
{{
  "location": "City, Country (official name)",
  "coordinates": {{
    "lat": number,
    "lon": number
  }},
  "current": {{
    "temp": number (Celsius),
    "condition": "Short string (e.g. Sunny, Heavy Rain)",
    "humidity": "String with %",
    "windSpeed": "String with km/h",
    "feelsLike": number (Celsius),
    "pressure": "String with hPa",
    "uvIndex": "String",
    "aqi": {{
      "index": number (US AQI standard, 0-500),
      "category": "String (e.g. Good, Moderate, Unhealthy)",
      "description": "Short health implication (e.g. 'Safe for outdoor activities')"
    }}
  }},
  "forecast": [
    {{
      "day": "Day name (e.g. Mon)",
      "date": "Short date (e.g. Oct 24)",
      "tempHigh": number (Celsius),
      "tempLow": number (Celsius),
      "condition": "Short string"
    }}
  ],
  "alerts": [
    {{
      "title": "Official alert title (e.g. Severe Thunderstorm Warning)",
      "severity": "advisory OR watch OR warning",
      "description": "One sentence summary of the alert"
    }}
  ],
  "analysis": "A professional, 2-sentence weather analysis advising on outdoor activities or clothing."
}}

Rules:
- The forecast array must contain exactly 5 days.
- Only include alerts for active official government warnings (NOAA, Met Office, etc.).
- If there are no alerts, return an empty array [] for "alerts"; never omit the field.
"#,
        query = query.as_str()
    )
}
