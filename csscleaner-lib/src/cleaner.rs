use crate::config::CleanerOptions;
use crate::error::CleanError;
use crate::format::{Formatter, LightningFormatter, PrettyFormatter};
use crate::parser::css::{parse_css, stringify_css};
use crate::stats::CleaningStats;
use crate::style::discard::discard_duplicates;
use crate::style::duplicates::DuplicateReport;
use crate::style::merge::merge_selectors;
use crate::style::ordering::order_stylesheet;
use crate::style::owned_css::OwnedStylesheet;
use crate::style::reconcile::{reconcile_stylesheet, MergePolicy};
use rayon::prelude::*;

/// One tree transform of the cleaning pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    MergeSelectors,
    Reconcile(MergePolicy),
    DiscardDuplicates,
    Order,
}

impl Pass {
    pub fn name(&self) -> &'static str {
        match self {
            Pass::MergeSelectors => "merge-selectors",
            Pass::Reconcile(_) => "reconcile-declarations",
            Pass::DiscardDuplicates => "discard-duplicates",
            Pass::Order => "order-declarations",
        }
    }

    pub fn run(self, sheet: OwnedStylesheet) -> OwnedStylesheet {
        match self {
            Pass::MergeSelectors => merge_selectors(sheet),
            Pass::Reconcile(policy) => reconcile_stylesheet(sheet, policy),
            Pass::DiscardDuplicates => discard_duplicates(sheet),
            Pass::Order => order_stylesheet(sheet),
        }
    }
}

/// The passes `options` asks for, in the order they run.
pub fn passes(options: &CleanerOptions) -> Vec<Pass> {
    let mut passes = vec![Pass::MergeSelectors];
    let policy = options.merge_policy();
    if policy != MergePolicy::Keep {
        passes.push(Pass::Reconcile(policy));
    }
    passes.push(Pass::DiscardDuplicates);
    if options.sort_properties {
        passes.push(Pass::Order);
    }
    passes
}

/// Parse → merge → reconcile → discard → order → serialize → format.
///
/// A cleaner holds no state besides its options, so one instance can serve
/// any number of inputs, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct CssCleaner {
    options: CleanerOptions,
}

impl CssCleaner {
    pub fn new(options: CleanerOptions) -> Self {
        CssCleaner { options }
    }

    pub fn options(&self) -> &CleanerOptions {
        &self.options
    }

    /// Runs the pipeline over `css`.
    ///
    /// # Errors
    ///
    /// `CleanError::Parse` for malformed input, `CleanError::Format` when the
    /// formatter rejects the cleaned text. There is no unformatted fallback.
    pub fn clean(&self, css: &str) -> Result<String, CleanError> {
        let sheet = parse_css(css)?;
        let sheet = self.transform(sheet);
        let serialized = stringify_css(&sheet);

        let output = if self.options.minify {
            LightningFormatter::minified().format(&serialized, &self.options.format)?
        } else if self.options.prettify {
            PrettyFormatter.format(&serialized, &self.options.format)?
        } else {
            serialized
        };
        Ok(output)
    }

    /// Runs the configured passes over an already parsed stylesheet.
    pub fn transform(&self, sheet: OwnedStylesheet) -> OwnedStylesheet {
        passes(&self.options).into_iter().fold(sheet, |sheet, pass| {
            let sheet = pass.run(sheet);
            log::debug!("{}: {} top-level nodes", pass.name(), sheet.nodes.len());
            sheet
        })
    }

    /// Cleans `css` and reports what changed.
    pub fn clean_with_stats(&self, css: &str) -> Result<(String, CleaningStats), CleanError> {
        let before = DuplicateReport::of(&parse_css(css)?);
        let cleaned = self.clean(css)?;
        let after = DuplicateReport::of(&parse_css(&cleaned)?);
        let stats = CleaningStats::compute(css, &cleaned, before, after);
        Ok((cleaned, stats))
    }

    pub fn stats(&self, css: &str) -> Result<CleaningStats, CleanError> {
        self.clean_with_stats(css).map(|(_, stats)| stats)
    }
}

/// Cleans `css` with `options`.
pub fn clean_css(css: &str, options: &CleanerOptions) -> Result<String, CleanError> {
    CssCleaner::new(options.clone()).clean(css)
}

/// Cleans independent inputs in parallel. Results come back in input order.
pub fn clean_batch<S>(
    inputs: &[S],
    options: &CleanerOptions,
) -> Vec<Result<(String, CleaningStats), CleanError>>
where
    S: AsRef<str> + Sync,
{
    let cleaner = CssCleaner::new(options.clone());
    inputs
        .par_iter()
        .map(|css| cleaner.clean_with_stats(css.as_ref()))
        .collect()
}
