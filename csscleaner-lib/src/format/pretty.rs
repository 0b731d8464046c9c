use crate::error::FormatError;
use crate::format::{FormatConfig, Formatter, QuoteStyle};
use crate::parser::css::parse_css;
use crate::style::owned_css::{OwnedAtRule, OwnedDeclaration, OwnedNode, OwnedRule};

/// Prettier-style printer: one declaration per line, block indentation, a
/// blank line between top-level blocks.
///
/// Selectors are printed exactly as written. Rewriting them here could turn
/// two distinct selectors into the same text after the merge already ran, and
/// a second cleaning pass would then change the output again.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrettyFormatter;

impl Formatter for PrettyFormatter {
    fn format(&self, css: &str, config: &FormatConfig) -> Result<String, FormatError> {
        let sheet = parse_css(css)?;
        let mut printer = Printer {
            config,
            out: String::with_capacity(css.len()),
        };
        printer.print_root(&sheet.nodes);
        Ok(printer.out)
    }
}

struct Printer<'a> {
    config: &'a FormatConfig,
    out: String,
}

impl Printer<'_> {
    fn print_root(&mut self, nodes: &[OwnedNode]) {
        let mut previous: Option<&OwnedNode> = None;
        for node in nodes {
            if let Some(prev) = previous {
                if prev.has_block() || node.has_block() {
                    self.out.push('\n');
                }
            }
            self.print_node(node, 0);
            previous = Some(node);
        }
    }

    fn print_node(&mut self, node: &OwnedNode, depth: usize) {
        match node {
            OwnedNode::Rule(rule) => self.print_rule(rule, depth),
            OwnedNode::AtRule(at_rule) => self.print_at_rule(at_rule, depth),
            OwnedNode::Declaration(decl) => self.print_declaration(decl, depth),
            OwnedNode::Comment(comment) => {
                self.push_indent(depth);
                self.out.push_str(comment.text.trim());
                self.out.push('\n');
            }
        }
    }

    fn print_rule(&mut self, rule: &OwnedRule, depth: usize) {
        self.push_indent(depth);
        self.out.push_str(&rule.selector);
        self.print_block(&rule.children, depth);
    }

    fn print_at_rule(&mut self, at_rule: &OwnedAtRule, depth: usize) {
        self.push_indent(depth);
        self.out.push('@');
        self.out.push_str(&at_rule.name);
        let params = collapse_whitespace(&at_rule.params, QuoteStyle::Preserve);
        if !params.is_empty() {
            self.out.push(' ');
            self.out.push_str(&params);
        }
        match &at_rule.block {
            Some(children) => self.print_block(children, depth),
            None => self.out.push_str(";\n"),
        }
    }

    fn print_block(&mut self, children: &[OwnedNode], depth: usize) {
        self.out.push_str(" {\n");
        for child in children {
            self.print_node(child, depth + 1);
        }
        self.push_indent(depth);
        self.out.push_str("}\n");
    }

    fn print_declaration(&mut self, decl: &OwnedDeclaration, depth: usize) {
        let verbatim = decl.is_custom_property() || decl.is_dollar_variable();
        let name = if verbatim {
            decl.property.clone()
        } else {
            decl.property.to_ascii_lowercase()
        };

        if decl.is_custom_property() {
            self.push_indent(depth);
            self.out.push_str(&format!("{}: {};\n", name, decl.value.trim()));
            return;
        }

        let value = collapse_whitespace(&decl.value, self.config.quote_style);
        let parts = split_top_level_commas(&value);
        let single = parts.join(", ");
        let width = depth * self.config.indent_width + name.len() + single.chars().count() + 3;

        self.push_indent(depth);
        if width > self.config.print_width && parts.len() > 1 {
            self.out.push_str(&name);
            self.out.push_str(":\n");
            for (index, part) in parts.iter().enumerate() {
                self.push_indent(depth + 1);
                self.out.push_str(part);
                self.out.push_str(if index + 1 == parts.len() { ";\n" } else { ",\n" });
            }
        } else if single.is_empty() {
            self.out.push_str(&format!("{}: ;\n", name));
        } else {
            self.out.push_str(&format!("{}: {};\n", name, single));
        }
    }

    fn push_indent(&mut self, depth: usize) {
        for _ in 0..depth * self.config.indent_width {
            self.out.push(' ');
        }
    }
}

/// Collapses runs of whitespace outside strings and comments to one space and
/// applies the quote style to string literals.
fn collapse_whitespace(text: &str, quote_style: QuoteStyle) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.trim().chars().peekable();
    while let Some(c) = chars.next() {
        let opens_comment = c == '/' && chars.peek() == Some(&'*');
        match c {
            '/' if opens_comment => {
                out.push(c);
                if let Some(star) = chars.next() {
                    out.push(star);
                }
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    out.push(inner);
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
            }
            '"' | '\'' => {
                let mut content = String::new();
                let mut closed = false;
                while let Some(inner) = chars.next() {
                    if inner == '\\' {
                        content.push(inner);
                        if let Some(escaped) = chars.next() {
                            content.push(escaped);
                        }
                    } else if inner == c {
                        closed = true;
                        break;
                    } else {
                        content.push(inner);
                    }
                }
                let quote = pick_quote(c, &content, quote_style);
                out.push(quote);
                out.push_str(&content);
                if closed {
                    out.push(quote);
                }
            }
            c if c.is_whitespace() => {
                while chars.peek().map_or(false, |next| next.is_whitespace()) {
                    chars.next();
                }
                out.push(' ');
            }
            c => out.push(c),
        }
    }
    out
}

fn pick_quote(original: char, content: &str, quote_style: QuoteStyle) -> char {
    let preferred = match quote_style {
        QuoteStyle::Double => '"',
        QuoteStyle::Single => '\'',
        QuoteStyle::Preserve => return original,
    };
    if preferred == original || content.contains(preferred) {
        original
    } else {
        preferred
    }
}

/// Splits a value at commas that are not inside parentheses, brackets or
/// strings. Each part is trimmed.
fn split_top_level_commas(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in value.chars() {
        if let Some(q) = quote {
            current.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    parts.push(current.trim().to_string());
    parts
}
