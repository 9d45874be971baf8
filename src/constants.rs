/// User agent string for HTTP requests
pub const USER_AGENT: &str = "skycast-mcp/0.1.0";

/// Gemini API base URL
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when `GEMINI_MODEL` is not set
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Title given to every citation produced by Maps grounding
pub const MAPS_SOURCE_TITLE: &str = "Google Maps";

/// Google Maps search URL used when no map citation came back
pub const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";
