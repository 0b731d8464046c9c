//! This module turns raw CSS text into an `OwnedStylesheet` and back.
//!
//! Tokenization is delegated to `cssparser`; the tree itself is lossless for
//! the parts the cleaner cares about: selector text, at-rule params,
//! declaration values and comments are sliced straight out of the source.

use crate::error::{ParseError, ParseResult};
use crate::style::owned_css::{
    OwnedAtRule, OwnedComment, OwnedDeclaration, OwnedNode, OwnedRule, OwnedStylesheet,
};
use cssparser::{
    ParseError as CssParseError, ParseErrorKind, Parser, ParserInput, SourceLocation,
    SourcePosition, Token,
};

/// Nodes of one container plus the offset where its content stopped.
///
/// Inside a nested block that offset sits right before the closing bracket;
/// when the input ran out first it equals the end of the input.
struct Block {
    nodes: Vec<OwnedNode>,
    end: usize,
}

/// A statement whose first token has been seen but whose end has not.
#[derive(Clone, Copy)]
struct Pending {
    start: SourcePosition,
    location: SourceLocation,
}

/// Parses a CSS string into an owned tree.
///
/// # Errors
///
/// Fails on unbalanced braces, brackets or parentheses, unterminated strings,
/// `url(`s or comments, and on statements that are neither at-rules nor
/// `property: value` pairs.
pub fn parse_css(css: &str) -> ParseResult<OwnedStylesheet> {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let block = parse_nodes(&mut parser)?;
    log::trace!("parsed {} top-level nodes", block.nodes.len());
    Ok(OwnedStylesheet::new(block.nodes))
}

/// Converts a tree back to CSS text. Never fails.
pub fn stringify_css(sheet: &OwnedStylesheet) -> String {
    sheet.to_string()
}

/// Checks whether `css` parses.
pub fn is_valid_css(css: &str) -> bool {
    parse_css(css).is_ok()
}

fn parse_nodes<'i, 't>(parser: &mut Parser<'i, 't>) -> ParseResult<Block> {
    let mut nodes = Vec::new();
    let mut pending: Option<Pending> = None;

    loop {
        let token_start = parser.position();
        let location = parser.current_source_location();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match &token {
            Token::WhiteSpace(_) => {}
            Token::Comment(_) => {
                check_token(parser, &token, token_start, location)?;
                // Comments inside a statement stay part of its raw text.
                if pending.is_none() {
                    nodes.push(OwnedNode::Comment(OwnedComment {
                        text: parser.slice_from(token_start).to_string(),
                    }));
                }
            }
            Token::CloseCurlyBracket => {
                return Err(ParseError::UnexpectedCloseBrace {
                    line: location.line + 1,
                    column: location.column,
                });
            }
            Token::Semicolon => {
                if let Some(statement) = pending.take() {
                    let text = parser.slice(statement.start..token_start);
                    nodes.push(statement_node(text, statement)?);
                }
            }
            Token::CurlyBracketBlock => {
                let prelude_start = pending.map_or(token_start, |p| p.start);
                let prelude = parser.slice(prelude_start..token_start).trim();

                if pending.is_some() && is_custom_property_prefix(prelude) {
                    // `--x: { ... }` keeps its block as part of the value.
                    skip_nested(parser, location)?;
                    continue;
                }

                let block = parser
                    .parse_nested_block(|nested| {
                        parse_nodes(nested).map_err(|err| nested.new_custom_error(err))
                    })
                    .map_err(into_parse_error)?;
                ensure_closed(parser, block.end, location)?;
                nodes.push(block_node(prelude, block.nodes));
                pending = None;
            }
            _ => {
                if pending.is_none() {
                    pending = Some(Pending {
                        start: token_start,
                        location,
                    });
                }
                check_token(parser, &token, token_start, location)?;
            }
        }
    }

    let end = parser.position().byte_index();

    // The last statement of a block may omit its semicolon.
    if let Some(statement) = pending {
        let text = parser.slice_from(statement.start);
        nodes.push(statement_node(text, statement)?);
    }

    Ok(Block { nodes, end })
}

/// Rejects unterminated tokens and consumes any block the token opens, so the
/// parser position afterwards is past everything the token owns.
fn check_token<'i, 't>(
    parser: &mut Parser<'i, 't>,
    token: &Token<'i>,
    token_start: SourcePosition,
    location: SourceLocation,
) -> ParseResult<()> {
    let unclosed_string = || ParseError::UnclosedString {
        line: location.line + 1,
        column: location.column,
    };

    match token {
        Token::Comment(_) => {
            let text = parser.slice_from(token_start);
            if text.len() < 4 || !text.ends_with("*/") {
                return Err(ParseError::UnclosedComment {
                    line: location.line + 1,
                    column: location.column,
                });
            }
            Ok(())
        }
        Token::BadString(_) | Token::BadUrl(_) => Err(unclosed_string()),
        Token::QuotedString(_) if !is_terminated_string(parser.slice_from(token_start)) => {
            Err(unclosed_string())
        }
        Token::UnquotedUrl(_) if !parser.slice_from(token_start).ends_with(')') => {
            Err(unclosed_string())
        }
        Token::Function(_)
        | Token::ParenthesisBlock
        | Token::SquareBracketBlock
        | Token::CurlyBracketBlock => skip_nested(parser, location),
        _ => Ok(()),
    }
}

/// Consumes the block just opened, checking everything inside it.
fn skip_nested<'i, 't>(
    parser: &mut Parser<'i, 't>,
    location: SourceLocation,
) -> ParseResult<()> {
    let end = parser
        .parse_nested_block(|nested| skip_rest(nested).map_err(|err| nested.new_custom_error(err)))
        .map_err(into_parse_error)?;
    ensure_closed(parser, end, location)
}

fn skip_rest<'i, 't>(parser: &mut Parser<'i, 't>) -> ParseResult<usize> {
    loop {
        let token_start = parser.position();
        let location = parser.current_source_location();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => return Ok(parser.position().byte_index()),
        };
        check_token(parser, &token, token_start, location)?;
    }
}

/// A nested block is closed when the parser moved past its content, which
/// only happens by consuming the closing bracket.
fn ensure_closed(
    parser: &Parser<'_, '_>,
    content_end: usize,
    location: SourceLocation,
) -> ParseResult<()> {
    if parser.position().byte_index() > content_end {
        Ok(())
    } else {
        Err(ParseError::UnclosedBlock {
            line: location.line + 1,
            column: location.column,
        })
    }
}

/// `raw` is a quoted string token as written. It is terminated when it ends
/// with its opening quote and that quote is not escaped.
fn is_terminated_string(raw: &str) -> bool {
    let mut chars = raw.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return false;
    };
    if open != close {
        return false;
    }
    let backslashes = chars.as_str().chars().rev().take_while(|&c| c == '\\').count();
    backslashes % 2 == 0
}

fn into_parse_error(err: CssParseError<'_, ParseError>) -> ParseError {
    match err.kind {
        ParseErrorKind::Custom(inner) => inner,
        ParseErrorKind::Basic(_) => ParseError::UnclosedBlock {
            line: err.location.line + 1,
            column: err.location.column,
        },
    }
}

fn is_custom_property_prefix(prelude: &str) -> bool {
    prelude.starts_with("--") && prelude.contains(':')
}

fn block_node(prelude: &str, children: Vec<OwnedNode>) -> OwnedNode {
    match prelude.strip_prefix('@') {
        Some(rest) => {
            let (name, params) = split_at_rule(rest);
            OwnedNode::AtRule(OwnedAtRule {
                name,
                params,
                block: Some(children),
            })
        }
        None => OwnedNode::Rule(OwnedRule::new(prelude, children)),
    }
}

fn statement_node(text: &str, statement: Pending) -> ParseResult<OwnedNode> {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix('@') {
        let (name, params) = split_at_rule(rest);
        return Ok(OwnedNode::AtRule(OwnedAtRule {
            name,
            params,
            block: None,
        }));
    }

    match text.split_once(':') {
        Some((name, value)) if is_property_name(name.trim()) => {
            Ok(OwnedNode::Declaration(OwnedDeclaration::new(
                name.trim(),
                value.trim(),
                statement.start.byte_index(),
            )))
        }
        _ => {
            let word = text.split_whitespace().next().unwrap_or(text);
            Err(ParseError::unknown_word(
                word,
                statement.location.line + 1,
                statement.location.column,
            ))
        }
    }
}

fn is_property_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(|c: char| c.is_whitespace() || c == '{' || c == '}')
}

/// Splits `media (min-width: 1px)` into `("media", "(min-width: 1px)")`.
fn split_at_rule(rest: &str) -> (String, String) {
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'')
        .unwrap_or(rest.len());
    (rest[..end].to_string(), rest[end..].trim().to_string())
}
