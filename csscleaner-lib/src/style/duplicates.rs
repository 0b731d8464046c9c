use crate::error::ParseResult;
use crate::parser::css::parse_css;
use crate::style::owned_css::OwnedStylesheet;
use std::collections::HashMap;

/// How many selector and property occurrences in a stylesheet are redundant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateReport {
    pub selectors: usize,
    pub properties: usize,
}

impl DuplicateReport {
    pub fn of(sheet: &OwnedStylesheet) -> Self {
        DuplicateReport {
            selectors: count_duplicate_selectors(sheet),
            properties: count_duplicate_properties(sheet),
        }
    }
}

/// Sum of `n - 1` over every group of `n` rules sharing the exact same selector
/// text, wherever in the tree they live.
pub fn count_duplicate_selectors(sheet: &OwnedStylesheet) -> usize {
    let mut selectors: HashMap<&str, usize> = HashMap::new();
    sheet.walk_rules(&mut |rule| {
        *selectors.entry(rule.selector.as_str()).or_insert(0) += 1;
    });
    redundant(selectors.into_values())
}

/// Sum of `n - 1` over every group of `n` same-named declarations inside a
/// single rule. Rules are looked at one by one, so a property repeated across
/// two rules with the same selector is not counted here.
pub fn count_duplicate_properties(sheet: &OwnedStylesheet) -> usize {
    let mut total = 0;
    sheet.walk_rules(&mut |rule| {
        let mut properties: HashMap<String, usize> = HashMap::new();
        for decl in rule.declarations() {
            *properties.entry(decl.key()).or_insert(0) += 1;
        }
        total += redundant(properties.into_values());
    });
    total
}

fn redundant(counts: impl Iterator<Item = usize>) -> usize {
    counts.filter(|&count| count > 1).map(|count| count - 1).sum()
}

/// Parses `css` and counts its duplicated selectors.
pub fn count_duplicates(css: &str) -> ParseResult<usize> {
    Ok(count_duplicate_selectors(&parse_css(css)?))
}

/// Parses `css` and counts duplicated properties within its rules.
pub fn count_duplicated_properties(css: &str) -> ParseResult<usize> {
    Ok(count_duplicate_properties(&parse_css(css)?))
}
