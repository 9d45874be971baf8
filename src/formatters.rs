use crate::constants::MAPS_SEARCH_URL;
use crate::models::{SourceKind, WeatherAlert, WeatherRecord};

/// Broad weather family used to pick a glyph for a condition string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Rain,
    Storm,
    Snow,
    Cloud,
    Sun,
    Wind,
}

impl ConditionKind {
    /// Keyword match in priority order; unknown conditions read as sunny
    pub fn classify(condition: &str) -> Self {
        let lower = condition.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| lower.contains(w));

        if has(&["rain", "drizzle"]) {
            Self::Rain
        } else if has(&["storm", "thunder"]) {
            Self::Storm
        } else if has(&["snow", "ice"]) {
            Self::Snow
        } else if has(&["cloud", "overcast"]) {
            Self::Cloud
        } else if has(&["clear", "sun"]) {
            Self::Sun
        } else if has(&["wind"]) {
            Self::Wind
        } else {
            Self::Sun
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Rain => "\u{1f327}",
            Self::Storm => "\u{26c8}",
            Self::Snow => "\u{1f328}",
            Self::Cloud => "\u{2601}",
            Self::Sun => "\u{2600}",
            Self::Wind => "\u{1f32c}",
        }
    }
}

/// Link to the location on Google Maps: a cited map URI first, else a search by coordinates
pub fn map_link(record: &WeatherRecord) -> Option<String> {
    record
        .sources
        .iter()
        .find(|source| source.kind == SourceKind::Map)
        .map(|source| source.uri.clone())
        .or_else(|| {
            record
                .coordinates
                .map(|c| format!("{}{},{}", MAPS_SEARCH_URL, c.lat, c.lon))
        })
}

/// Alerts ordered most severe first, keeping the model's order on ties
pub fn alerts_by_severity(alerts: &[WeatherAlert]) -> Vec<&WeatherAlert> {
    let mut sorted: Vec<&WeatherAlert> = alerts.iter().collect();
    sorted.sort_by(|a, b| b.severity.cmp(&a.severity));
    sorted
}

fn degrees(value: Option<f64>) -> String {
    match value.map(f64::round) {
        // -0.4 rounds to -0
        Some(v) if v == 0.0 => "0\u{00b0}".to_string(),
        Some(v) => format!("{}\u{00b0}", v),
        None => "N/A".to_string(),
    }
}

fn or_na(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("N/A")
}

/// Formats a weather record into a human-readable report
pub fn format_weather(record: &WeatherRecord) -> String {
    let current = &record.current;
    let condition = current.condition.as_deref().unwrap_or("Unknown");

    let mut output = format!("Weather for {}\n", record.location);
    if let Some(coordinates) = record.coordinates {
        output.push_str(&format!(
            "Coordinates: {:.2}, {:.2}\n",
            coordinates.lat, coordinates.lon
        ));
    }
    output.push('\n');

    if let Some(alerts) = record.alerts.as_deref().filter(|alerts| !alerts.is_empty()) {
        output.push_str("Active Weather Alerts:\n");
        for alert in alerts_by_severity(alerts) {
            output.push_str(&format!("  [{}] {}\n", alert.severity.label(), alert.title));
            if !alert.description.is_empty() {
                output.push_str(&format!("    {}\n", alert.description));
            }
        }
        output.push('\n');
    }

    output.push_str(&format!(
        "Current Conditions:\n  {} {} {}\n  Wind: {}\n  Humidity: {}\n  Feels Like: {}\n  Pressure: {}\n",
        ConditionKind::classify(condition).glyph(),
        degrees(current.temp),
        condition,
        or_na(current.wind_speed.as_deref()),
        or_na(current.humidity.as_deref()),
        degrees(current.feels_like),
        or_na(current.pressure.as_deref()),
    ));
    if let Some(uv_index) = current.uv_index.as_deref() {
        output.push_str(&format!("  UV Index: {}\n", uv_index));
    }
    output.push('\n');

    if let Some(aqi) = &current.aqi {
        let tier = aqi.tier();
        output.push_str(&format!(
            "Air Quality Index: {} AQI (tier {}, {})\n  {}\n",
            aqi.index,
            tier.level(),
            tier.label(),
            aqi.category
        ));
        if !aqi.description.is_empty() {
            output.push_str(&format!("  {}\n", aqi.description));
        }
        output.push('\n');
    }

    if let Some(link) = map_link(record) {
        output.push_str(&format!("View on Google Maps: {}\n\n", link));
    }

    if !record.forecast.is_empty() {
        output.push_str(&format!("{}-Day Forecast:\n", record.forecast.len()));
        for day in &record.forecast {
            output.push_str(&format!(
                "  {} {} {}  High {}  Low {}  {}\n",
                ConditionKind::classify(&day.condition).glyph(),
                day.day,
                day.date,
                degrees(day.temp_high),
                degrees(day.temp_low),
                day.condition
            ));
        }
        output.push('\n');
    }

    if let Some(analysis) = record.analysis.as_deref().filter(|a| !a.is_empty()) {
        output.push_str(&format!("Analysis:\n  {}\n\n", analysis));
    }

    if !record.sources.is_empty() {
        output.push_str("Verified Sources:\n");
        for source in &record.sources {
            let marker = match source.kind {
                SourceKind::Map => "map",
                SourceKind::Web => "web",
            };
            output.push_str(&format!("  [{}] {} - {}\n", marker, source.title, source.uri));
        }
    }

    output
}
