use crate::style::owned_css::{OwnedAtRule, OwnedNode, OwnedRule, OwnedStylesheet};
use std::collections::HashSet;

/// Drops declarations and at-rules that an identical later sibling repeats.
///
/// Runs whatever the reconciliation policy is. Two nodes are identical when
/// they serialize to the same text, so `color: red` and `COLOR: red` are
/// different here. The last copy survives at its own position. Blocks are
/// cleaned before their at-rule is compared.
pub fn discard_duplicates(sheet: OwnedStylesheet) -> OwnedStylesheet {
    OwnedStylesheet::new(discard_in(sheet.nodes))
}

fn discard_in(nodes: Vec<OwnedNode>) -> Vec<OwnedNode> {
    let nodes: Vec<OwnedNode> = nodes.into_iter().map(discard_nested).collect();

    let mut seen = HashSet::new();
    let mut keep = vec![true; nodes.len()];
    for (index, node) in nodes.iter().enumerate().rev() {
        if matches!(node, OwnedNode::Declaration(_) | OwnedNode::AtRule(_)) {
            keep[index] = seen.insert(node.to_string());
        }
    }

    let before = nodes.len();
    let nodes: Vec<OwnedNode> = nodes
        .into_iter()
        .zip(keep)
        .filter_map(|(node, keep)| keep.then_some(node))
        .collect();
    if nodes.len() != before {
        log::trace!("discarded {} exact duplicates", before - nodes.len());
    }
    nodes
}

fn discard_nested(node: OwnedNode) -> OwnedNode {
    match node {
        OwnedNode::Rule(OwnedRule { selector, children }) => OwnedNode::Rule(OwnedRule {
            selector,
            children: discard_in(children),
        }),
        OwnedNode::AtRule(OwnedAtRule {
            name,
            params,
            block: Some(block),
        }) => OwnedNode::AtRule(OwnedAtRule {
            name,
            params,
            block: Some(discard_in(block)),
        }),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::css::parse_css;
    use pretty_assertions::assert_eq;

    fn discarded(css: &str) -> String {
        discard_duplicates(parse_css(css).unwrap()).to_string()
    }

    #[test]
    fn test_exact_declaration_repeats_keep_the_last() {
        assert_eq!(
            discarded(".a { color: red; margin: 0; color: red; }"),
            ".a { margin: 0; color: red; }\n"
        );
    }

    #[test]
    fn test_different_values_or_case_are_not_duplicates() {
        let css = ".a { color: red; color: blue; COLOR: blue; }\n";
        assert_eq!(discarded(css), css);
    }

    #[test]
    fn test_repeated_at_rules() {
        let css = "@import \"x.css\"; .a { top: 0; } @import \"x.css\"; @import \"y.css\";";
        assert_eq!(
            discarded(css),
            ".a { top: 0; }\n@import \"x.css\";\n@import \"y.css\";\n"
        );
    }

    #[test]
    fn test_at_rule_blocks_compare_after_cleaning() {
        let css = "@font-face { src: url(a.woff); src: url(a.woff); } @font-face { src: url(a.woff); }";
        assert_eq!(discarded(css), "@font-face { src: url(a.woff); }\n");
    }

    #[test]
    fn test_rules_and_comments_are_left_to_other_passes() {
        let css = "/* x */\n.a { top: 0; }\n/* x */\n.a { top: 0; }\n";
        assert_eq!(discarded(css), css);
    }
}
