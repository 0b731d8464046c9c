use crate::style::owned_css::{OwnedAtRule, OwnedNode, OwnedRule, OwnedStylesheet};

/// Sort buckets, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bucket {
    CustomProperty,
    DollarVariable,
    Declaration,
    AtRule,
    Rule,
}

/// Orders the body of every rule and at-rule in the tree. The root keeps its
/// order.
pub fn order_stylesheet(sheet: OwnedStylesheet) -> OwnedStylesheet {
    OwnedStylesheet::new(sheet.nodes.into_iter().map(order_nested).collect())
}

/// Reorders a rule's children: custom properties, `$` variables, plain
/// declarations (alphabetically), at-rules, then nested rules.
///
/// Only plain declarations are sorted by name; every other bucket keeps
/// document order. A comment moves together with the node that follows it.
pub fn order_declarations(rule: OwnedRule) -> OwnedRule {
    OwnedRule {
        selector: rule.selector,
        children: order_nodes(rule.children),
    }
}

fn order_nested(node: OwnedNode) -> OwnedNode {
    match node {
        OwnedNode::Rule(rule) => OwnedNode::Rule(order_declarations(rule)),
        OwnedNode::AtRule(OwnedAtRule {
            name,
            params,
            block: Some(block),
        }) => OwnedNode::AtRule(OwnedAtRule {
            name,
            params,
            block: Some(order_nodes(block)),
        }),
        other => other,
    }
}

fn order_nodes(children: Vec<OwnedNode>) -> Vec<OwnedNode> {
    let mut groups: Vec<Vec<OwnedNode>> = Vec::new();
    let mut pending: Vec<OwnedNode> = Vec::new();
    for child in children {
        let is_comment = matches!(child, OwnedNode::Comment(_));
        pending.push(order_nested(child));
        if !is_comment {
            groups.push(std::mem::take(&mut pending));
        }
    }

    // Stable: equal keys keep document order.
    groups.sort_by_cached_key(|group| group.last().map(sort_key));

    let mut ordered: Vec<OwnedNode> = groups.into_iter().flatten().collect();
    ordered.extend(pending);
    ordered
}

fn sort_key(node: &OwnedNode) -> (Bucket, String) {
    match node {
        OwnedNode::Declaration(decl) if decl.is_custom_property() => {
            (Bucket::CustomProperty, String::new())
        }
        OwnedNode::Declaration(decl) if decl.is_dollar_variable() => {
            (Bucket::DollarVariable, String::new())
        }
        OwnedNode::Declaration(decl) => (Bucket::Declaration, decl.key()),
        OwnedNode::AtRule(_) => (Bucket::AtRule, String::new()),
        OwnedNode::Rule(_) | OwnedNode::Comment(_) => (Bucket::Rule, String::new()),
    }
}
