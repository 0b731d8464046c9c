use crate::error::ConfigError;
use crate::format::FormatConfig;
use crate::style::reconcile::MergePolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "csscleaner.config.json";

/// Cleaning options. Every field is optional in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanerOptions {
    /// Keep only the last declaration of each property within a rule.
    pub remove_duplicated_properties: bool,
    /// Drop repeated declarations whose value is identical too. Only matters
    /// when `remove_duplicated_properties` is off.
    pub remove_duplicated_values: bool,
    /// Run the ordering stage.
    pub sort_properties: bool,
    /// Run the pretty formatter on the output.
    pub prettify: bool,
    /// Print minified output through LightningCSS; wins over `prettify`.
    pub minify: bool,
    pub format: FormatConfig,
}

impl Default for CleanerOptions {
    fn default() -> Self {
        CleanerOptions {
            remove_duplicated_properties: true,
            remove_duplicated_values: true,
            sort_properties: false,
            prettify: true,
            minify: false,
            format: FormatConfig::default(),
        }
    }
}

impl CleanerOptions {
    /// Load options from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let options = serde_json::from_str(&content)?;
        log::debug!("loaded cleaner options from {}", path.display());
        Ok(options)
    }

    /// Load `csscleaner.config.json` from `dir`, or defaults if there is none.
    pub fn discover(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(DEFAULT_CONFIG_NAME);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy::from_flags(
            self.remove_duplicated_properties,
            self.remove_duplicated_values,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::QuoteStyle;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "removeDuplicatedProperties": false,
            "sortProperties": true,
            "format": { "printWidth": 100, "quoteStyle": "single" }
        }"#;
        let options: CleanerOptions = serde_json::from_str(json).unwrap();
        assert_eq!(
            options,
            CleanerOptions {
                remove_duplicated_properties: false,
                remove_duplicated_values: true,
                sort_properties: true,
                prettify: true,
                minify: false,
                format: FormatConfig {
                    print_width: 100,
                    indent_width: 2,
                    quote_style: QuoteStyle::Single,
                },
            }
        );
        assert_eq!(options.merge_policy(), MergePolicy::ByValue);
    }

    #[test]
    fn test_discover_without_file_gives_defaults() {
        let dir = std::env::temp_dir().join("csscleaner-config-missing");
        let options = CleanerOptions::discover(&dir).unwrap();
        assert_eq!(options, CleanerOptions::default());
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = std::env::temp_dir().join(format!("csscleaner-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(DEFAULT_CONFIG_NAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(CleanerOptions::discover(&dir), Err(ConfigError::Json(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
