//! Presentation adapters for formatted messages.
//!
//! The formatter only describes structure; these modules paint it.
//! - [`text`]: plain terminal text
//! - [`html`]: an escaped HTML fragment for web views

pub mod html;
pub mod text;

use serde::{Deserialize, Serialize};

/// Output format selectable from the CLI and config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Terminal text.
    #[default]
    Text,
    /// HTML fragment.
    Html,
    /// Render-node descriptors as JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

/// Render `message` in the requested format.
///
/// # Errors
///
/// Returns an error only if JSON serialization fails.
pub fn render(
    message: &crate::format::FormattedMessage,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Text => Ok(text::render(message)),
        OutputFormat::Html => Ok(html::render(message)),
        OutputFormat::Json => serde_json::to_string_pretty(message),
    }
}
