use crate::style::owned_css::{OwnedAtRule, OwnedNode, OwnedStylesheet};
use std::collections::HashMap;

/// Merges rules that share a selector into the first rule using it.
///
/// Each container (the root, an at-rule body, a rule's nested children) is
/// merged on its own; a rule inside `@media` never absorbs a top-level rule.
/// Children of later duplicates are moved, in order, to the end of the first
/// rule's children, and the later rule disappears. Which declarations survive
/// is left to reconciliation.
///
/// Sibling at-rules with the same name and params count as one scope: a rule
/// in a later `@media print` block moves into the matching rule of the first
/// `@media print` block, and a block emptied that way is dropped. Keyframes
/// are left alone.
pub fn merge_selectors(sheet: OwnedStylesheet) -> OwnedStylesheet {
    OwnedStylesheet::new(merge_container(sheet.nodes))
}

fn merge_container(nodes: Vec<OwnedNode>) -> Vec<OwnedNode> {
    let mut merged: Vec<OwnedNode> = Vec::with_capacity(nodes.len());
    let mut first_rule: HashMap<String, usize> = HashMap::new();
    let mut first_at_rule: HashMap<(String, String), usize> = HashMap::new();

    for node in nodes {
        match node {
            OwnedNode::Rule(rule) => match first_rule.get(&rule.selector).copied() {
                Some(index) => {
                    log::trace!("merging duplicate selector {:?}", rule.selector);
                    if let OwnedNode::Rule(first) = &mut merged[index] {
                        first.children.extend(rule.children);
                    }
                }
                None => {
                    first_rule.insert(rule.selector.clone(), merged.len());
                    merged.push(OwnedNode::Rule(rule));
                }
            },
            OwnedNode::AtRule(OwnedAtRule {
                name,
                params,
                block: Some(block),
            }) if !is_keyframes(&name) => {
                let key = (name.to_ascii_lowercase(), params.clone());
                let at_rule = OwnedAtRule {
                    name,
                    params,
                    block: Some(block),
                };
                match first_at_rule.get(&key).copied() {
                    Some(index) => {
                        if let Some(rest) = absorb_rules(&mut merged[index], at_rule) {
                            merged.push(OwnedNode::AtRule(rest));
                        }
                    }
                    None => {
                        first_at_rule.insert(key, merged.len());
                        merged.push(OwnedNode::AtRule(at_rule));
                    }
                }
            }
            other => merged.push(other),
        }
    }

    merged.into_iter().map(merge_nested).collect()
}

/// Moves rules of `later` whose selector already appears directly in `home`'s
/// block into that rule. Returns what is left of `later`, or `None` when the
/// move emptied it.
fn absorb_rules(home: &mut OwnedNode, later: OwnedAtRule) -> Option<OwnedAtRule> {
    let OwnedAtRule {
        name,
        params,
        block,
    } = later;
    let children = block.unwrap_or_default();
    let home_block = match home {
        OwnedNode::AtRule(OwnedAtRule {
            block: Some(home_block),
            ..
        }) => home_block,
        _ => {
            return Some(OwnedAtRule {
                name,
                params,
                block: Some(children),
            })
        }
    };

    let was_empty = children.is_empty();
    let mut rest = Vec::new();
    for child in children {
        match child {
            OwnedNode::Rule(rule) => {
                let target = home_block.iter_mut().find_map(|node| match node {
                    OwnedNode::Rule(first) if first.selector == rule.selector => Some(first),
                    _ => None,
                });
                match target {
                    Some(first) => {
                        log::trace!("merging {:?} across @{} {}", rule.selector, name, params);
                        first.children.extend(rule.children);
                    }
                    None => rest.push(OwnedNode::Rule(rule)),
                }
            }
            other => rest.push(other),
        }
    }

    if rest.is_empty() && !was_empty {
        return None;
    }
    Some(OwnedAtRule {
        name,
        params,
        block: Some(rest),
    })
}

fn is_keyframes(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with("keyframes")
}

fn merge_nested(node: OwnedNode) -> OwnedNode {
    match node {
        OwnedNode::Rule(mut rule) => {
            rule.children = merge_container(rule.children);
            OwnedNode::Rule(rule)
        }
        OwnedNode::AtRule(OwnedAtRule {
            name,
            params,
            block: Some(block),
        }) => OwnedNode::AtRule(OwnedAtRule {
            name,
            params,
            block: Some(merge_container(block)),
        }),
        other => other,
    }
}
