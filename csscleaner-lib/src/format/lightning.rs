use crate::error::FormatError;
use crate::format::{FormatConfig, Formatter};
use lightningcss::printer::PrinterOptions;
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};

/// Re-prints CSS through LightningCSS.
///
/// LightningCSS normalizes values (colors, numbers) and always indents with
/// two spaces, so only `minify` changes its output; `FormatConfig` is ignored.
/// It is stricter than our own parser and rejects things like preprocessor
/// syntax or invalid selectors.
#[derive(Debug, Clone, Copy)]
pub struct LightningFormatter {
    pub minify: bool,
}

impl LightningFormatter {
    pub fn minified() -> Self {
        LightningFormatter { minify: true }
    }
}

impl Formatter for LightningFormatter {
    fn format(&self, css: &str, _config: &FormatConfig) -> Result<String, FormatError> {
        if css.trim().is_empty() {
            return Ok(String::new());
        }

        let sheet = LightningStyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| FormatError::Lightning(e.to_string()))?;
        let printed = sheet
            .to_css(PrinterOptions {
                minify: self.minify,
                ..PrinterOptions::default()
            })
            .map_err(|e| FormatError::Lightning(e.to_string()))?;
        Ok(printed.code)
    }
}
