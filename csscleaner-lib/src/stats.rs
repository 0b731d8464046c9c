use crate::cleaner::CssCleaner;
use crate::error::CleanError;
use crate::style::duplicates::DuplicateReport;
use serde::Serialize;

/// What one cleaning run changed.
///
/// Removed counts are signed: they are plain differences between the counts
/// before and after, and a configuration that keeps duplicates may produce
/// zero or, with a lossy formatter, a negative difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningStats {
    pub original_size: usize,
    pub cleaned_size: usize,
    pub duplicated_selectors_removed: i64,
    pub duplicated_properties_removed: i64,
    /// Not clamped: negative when formatting made the text longer.
    pub percent_reduction: f64,
}

impl CleaningStats {
    pub fn compute(
        original: &str,
        cleaned: &str,
        before: DuplicateReport,
        after: DuplicateReport,
    ) -> Self {
        let original_size = original.chars().count();
        let cleaned_size = cleaned.chars().count();
        CleaningStats {
            original_size,
            cleaned_size,
            duplicated_selectors_removed: before.selectors as i64 - after.selectors as i64,
            duplicated_properties_removed: before.properties as i64 - after.properties as i64,
            percent_reduction: percent_reduction(original_size, cleaned_size),
        }
    }

    /// One-line report shown to the user after a run.
    pub fn summary(&self) -> String {
        format!(
            "Removed {} duplicated selectors and {} duplicated properties, size reduced by {:.1}%",
            self.duplicated_selectors_removed,
            self.duplicated_properties_removed,
            self.percent_reduction
        )
    }
}

/// `(original - cleaned) / original * 100`, or 0 for an empty original.
pub fn percent_reduction(original_size: usize, cleaned_size: usize) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (original_size as f64 - cleaned_size as f64) / original_size as f64 * 100.0
}

/// Cleans `css` with the default options and reports what changed.
pub fn get_cleaning_stats(css: &str) -> Result<CleaningStats, CleanError> {
    CssCleaner::default().stats(css)
}
