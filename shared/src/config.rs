use serde::{Deserialize, Serialize};

/// Display settings used by the formatting helpers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    pub thousands_separator: char,
    /// chrono format string, e.g. "%B %-d, %Y" -> "June 19, 2025"
    pub date_format: String,
    pub datetime_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            thousands_separator: ',',
            date_format: "%B %-d, %Y".to_string(),
            datetime_format: "%B %-d, %Y %-I:%M %p".to_string(),
        }
    }
}
