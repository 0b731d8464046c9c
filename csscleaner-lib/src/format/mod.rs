//! Output formatting.
//!
//! The cleaner hands serialized CSS to a `Formatter`. `PrettyFormatter` is the
//! default; `LightningFormatter` produces minified output via `lightningcss`.

pub mod lightning;
pub mod pretty;

use crate::error::FormatError;
use serde::{Deserialize, Serialize};

pub use lightning::LightningFormatter;
pub use pretty::PrettyFormatter;

/// Turns CSS text into formatted CSS text.
pub trait Formatter {
    fn format(&self, css: &str, config: &FormatConfig) -> Result<String, FormatError>;
}

/// Quote character used for strings in declaration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
    /// Leave quotes as written.
    Preserve,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormatConfig {
    /// Lines longer than this get their comma-separated values wrapped.
    pub print_width: usize,
    /// Spaces per nesting level.
    pub indent_width: usize,
    pub quote_style: QuoteStyle,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            print_width: 80,
            indent_width: 2,
            quote_style: QuoteStyle::Double,
        }
    }
}
