//! Application configuration structures

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Archive client configuration
    #[validate]
    pub archive: ArchiveSettings,

    /// Chart rendering settings
    #[validate]
    pub graph: GraphSettings,

    /// Logging configuration
    #[validate]
    pub logging: LogSettings,
}

/// MAST archive configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ArchiveSettings {
    /// Archive base URL
    #[validate(url(message = "Archive base URL must be a valid URL"))]
    pub base_url: String,

    /// Optional auth token for proprietary data access
    pub auth_token: Option<String>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 3600, message = "Timeout must be between 1 and 3600 seconds"))]
    pub timeout_seconds: u64,

    /// Maximum number of retries for failed requests
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,

    /// Rate limit in requests per second
    #[validate(range(min = 1, max = 100, message = "Rate limit must be between 1 and 100"))]
    pub rate_limit_per_sec: u32,

    /// Optional cap on rows retained from one query
    pub max_records: Option<u64>,
}

/// Chart rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphSettings {
    /// Chart width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Chart height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(
        path = "crate::validation::HEX_COLOR_REGEX",
        message = "Background color must be a hex color like #FFFFFF"
    ))]
    pub background_color: String,

    /// Font family for text rendering
    pub font_family: String,

    /// Font size for chart titles
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LogSettings {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Optional log file path
    pub file: Option<String>,

    /// Whether to emit JSON-formatted events
    pub json_format: bool,

    /// Whether to include span open/close events
    pub include_spans: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive: ArchiveSettings::default(),
            graph: GraphSettings::default(),
            logging: LogSettings::default(),
        }
    }
}

impl Config {
    /// Validate the entire configuration tree
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            base_url: "https://mast.stsci.edu".to_string(),
            auth_token: None,
            timeout_seconds: 300,
            max_retries: 3,
            rate_limit_per_sec: 5,
            max_records: None,
        }
    }
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 16,
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json_format: false,
            include_spans: true,
        }
    }
}
