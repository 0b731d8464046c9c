//! CSS deduplication and normalization.
//!
//! `CssCleaner` merges rules that share a selector, keeps the last declaration
//! of each property within a rule, optionally orders declarations, and
//! pretty-prints (or minifies) the result. `CleaningStats` reports what a run
//! removed.

pub mod cleaner;
pub mod config;
pub mod error;
pub mod format;
pub mod parser;
pub mod stats;
pub mod style;

pub use cleaner::{clean_batch, clean_css, CssCleaner, Pass};
pub use config::CleanerOptions;
pub use error::{CleanError, ConfigError, FormatError, ParseError};
pub use parser::css::{is_valid_css, parse_css, stringify_css};
pub use stats::{get_cleaning_stats, CleaningStats};
pub use style::duplicates::{count_duplicated_properties, count_duplicates, DuplicateReport};
