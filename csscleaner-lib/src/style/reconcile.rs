use crate::style::owned_css::{OwnedAtRule, OwnedNode, OwnedRule, OwnedStylesheet};
use std::collections::HashSet;

/// Which repeated declarations inside one rule are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Only the last declaration of each property name survives.
    #[default]
    ByProperty,
    /// Earlier declarations are dropped only when a later one has the same
    /// property name and the same value.
    ByValue,
    /// No reconciliation. Exact repeats are still dropped by
    /// `discard_duplicates`.
    Keep,
}

impl MergePolicy {
    pub fn from_flags(remove_duplicated_properties: bool, remove_duplicated_values: bool) -> Self {
        if remove_duplicated_properties {
            MergePolicy::ByProperty
        } else if remove_duplicated_values {
            MergePolicy::ByValue
        } else {
            MergePolicy::Keep
        }
    }
}

/// Runs `reconcile_declarations` on every rule of the tree.
pub fn reconcile_stylesheet(sheet: OwnedStylesheet, policy: MergePolicy) -> OwnedStylesheet {
    OwnedStylesheet::new(reconcile_nodes(sheet.nodes, policy))
}

fn reconcile_nodes(nodes: Vec<OwnedNode>, policy: MergePolicy) -> Vec<OwnedNode> {
    nodes
        .into_iter()
        .map(|node| match node {
            OwnedNode::Rule(rule) => OwnedNode::Rule(reconcile_declarations(rule, policy)),
            OwnedNode::AtRule(OwnedAtRule {
                name,
                params,
                block: Some(block),
            }) => OwnedNode::AtRule(OwnedAtRule {
                name,
                params,
                block: Some(reconcile_nodes(block, policy)),
            }),
            other => other,
        })
        .collect()
}

/// Drops superseded declarations from `rule`, keeping the survivors where
/// they were.
///
/// The output is a stable filter of the rule's children: the winning
/// declaration of a name stays at its own (last) position, not at the position
/// where the name first appeared. Nested rules are reconciled independently.
pub fn reconcile_declarations(rule: OwnedRule, policy: MergePolicy) -> OwnedRule {
    let OwnedRule { selector, children } = rule;
    if policy == MergePolicy::Keep {
        return OwnedRule {
            selector,
            children: reconcile_nodes(children, policy),
        };
    }

    // Walk backwards so the first sighting of a key is its last occurrence.
    let mut seen = HashSet::new();
    let mut keep = vec![true; children.len()];
    for (index, child) in children.iter().enumerate().rev() {
        if let OwnedNode::Declaration(decl) = child {
            let key = match policy {
                MergePolicy::ByValue => format!("{}:{}", decl.key(), decl.value),
                _ => decl.key(),
            };
            keep[index] = seen.insert(key);
        }
    }

    let before = children.len();
    let children: Vec<OwnedNode> = children
        .into_iter()
        .zip(keep)
        .filter_map(|(child, keep)| keep.then_some(child))
        .collect();
    if children.len() != before {
        log::trace!(
            "{:?}: dropped {} superseded declarations",
            selector,
            before - children.len()
        );
    }

    OwnedRule {
        selector,
        children: reconcile_nodes(children, policy),
    }
}
