// src/style/owned_css.rs
//
// A fully-owned CSS tree. Nothing here borrows from the source text, so passes
// can move nodes between containers freely.
use std::fmt;

/// A parsed stylesheet: the ordered top-level nodes of one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedStylesheet {
    pub nodes: Vec<OwnedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedNode {
    Rule(OwnedRule),
    AtRule(OwnedAtRule),
    Declaration(OwnedDeclaration),
    Comment(OwnedComment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRule {
    /// Exact selector text as written, e.g. ".button", "a:hover, a:focus".
    pub selector: String,
    /// Declarations, comments and nested rules, in document order.
    pub children: Vec<OwnedNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedAtRule {
    /// Name without the `@`, e.g. "media".
    pub name: String,
    pub params: String,
    /// `None` for statement at-rules such as `@import "a.css";`.
    pub block: Option<Vec<OwnedNode>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDeclaration {
    pub property: String,
    /// Raw value text, `!important` included.
    pub value: String,
    /// Byte offset of the declaration in the source it was parsed from.
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedComment {
    /// Raw text including the `/*` and `*/` delimiters.
    pub text: String,
}

impl OwnedStylesheet {
    pub fn new(nodes: Vec<OwnedNode>) -> Self {
        OwnedStylesheet { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Visit every rule in the tree, depth first, in document order.
    pub fn walk_rules<'a>(&'a self, visit: &mut impl FnMut(&'a OwnedRule)) {
        walk_rules_in(&self.nodes, visit);
    }

    /// Top-level rules only.
    pub fn rules(&self) -> impl Iterator<Item = &OwnedRule> {
        self.nodes.iter().filter_map(OwnedNode::as_rule)
    }
}

fn walk_rules_in<'a>(nodes: &'a [OwnedNode], visit: &mut impl FnMut(&'a OwnedRule)) {
    for node in nodes {
        match node {
            OwnedNode::Rule(rule) => {
                visit(rule);
                walk_rules_in(&rule.children, visit);
            }
            OwnedNode::AtRule(at_rule) => {
                if let Some(block) = &at_rule.block {
                    walk_rules_in(block, visit);
                }
            }
            OwnedNode::Declaration(_) | OwnedNode::Comment(_) => {}
        }
    }
}

impl OwnedNode {
    pub fn as_rule(&self) -> Option<&OwnedRule> {
        match self {
            OwnedNode::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn as_declaration(&self) -> Option<&OwnedDeclaration> {
        match self {
            OwnedNode::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    /// Rules and at-rules with a body.
    pub fn has_block(&self) -> bool {
        match self {
            OwnedNode::Rule(_) => true,
            OwnedNode::AtRule(at_rule) => at_rule.block.is_some(),
            OwnedNode::Declaration(_) | OwnedNode::Comment(_) => false,
        }
    }
}

impl OwnedRule {
    pub fn new(selector: impl Into<String>, children: Vec<OwnedNode>) -> Self {
        OwnedRule {
            selector: selector.into(),
            children,
        }
    }

    /// Direct declarations of this rule; nested rules are not descended into.
    pub fn declarations(&self) -> impl Iterator<Item = &OwnedDeclaration> {
        self.children.iter().filter_map(OwnedNode::as_declaration)
    }
}

impl OwnedDeclaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>, position: usize) -> Self {
        OwnedDeclaration {
            property: property.into(),
            value: value.into(),
            position,
        }
    }

    /// Property name used for duplicate detection (ASCII case-insensitive).
    pub fn key(&self) -> String {
        self.property.to_ascii_lowercase()
    }

    /// `--name: value`
    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }

    /// Preprocessor variable, `$name: value`.
    pub fn is_dollar_variable(&self) -> bool {
        self.property.starts_with('$')
    }
}

impl fmt::Display for OwnedStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}

impl fmt::Display for OwnedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnedNode::Rule(rule) => rule.fmt(f),
            OwnedNode::AtRule(at_rule) => at_rule.fmt(f),
            OwnedNode::Declaration(decl) => decl.fmt(f),
            OwnedNode::Comment(comment) => f.write_str(&comment.text),
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, children: &[OwnedNode]) -> fmt::Result {
    if children.is_empty() {
        return f.write_str("{}");
    }
    f.write_str("{")?;
    for child in children {
        write!(f, " {}", child)?;
    }
    f.write_str(" }")
}

impl fmt::Display for OwnedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.selector)?;
        write_block(f, &self.children)
    }
}

impl fmt::Display for OwnedAtRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, " {}", self.params)?;
        }
        match &self.block {
            Some(children) => {
                f.write_str(" ")?;
                write_block(f, children)
            }
            None => f.write_str(";"),
        }
    }
}

impl fmt::Display for OwnedDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {};", self.property, self.value)
    }
}
