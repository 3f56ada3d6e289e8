// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command tokenizer
//!
//! Splits command text into words, quoted strings, numbers, record ids and
//! punctuation. Every token keeps the byte range it was read from so callers
//! can recover the raw text of a nested command.

use nom::{
    branch::alt,
    bytes::complete::take_while,
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{map, opt, recognize, value},
    sequence::{pair, preceded, separated_pair, tuple},
    IResult,
};

use super::error::{ParseError, ParseResult};
use crate::storage::RecordId;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword
    Word(String),
    /// Quoted string with escapes resolved
    Str(String),
    Integer(i64),
    Float(f64),
    Rid(RecordId),
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Equals,
    Semicolon,
}

impl TokenKind {
    /// Text used when reporting this token in an error
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Word(w) => w.clone(),
            TokenKind::Str(s) => format!("'{}'", s),
            TokenKind::Integer(i) => i.to_string(),
            TokenKind::Float(f) => f.to_string(),
            TokenKind::Rid(rid) => rid.to_string(),
            TokenKind::LBracket => "[".to_string(),
            TokenKind::RBracket => "]".to_string(),
            TokenKind::LParen => "(".to_string(),
            TokenKind::RParen => ")".to_string(),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Equals => "=".to_string(),
            TokenKind::Semicolon => ";".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character
    pub offset: usize,
    /// Byte offset just past the last character
    pub end: usize,
}

impl Token {
    /// Case-insensitive keyword match
    pub fn is_keyword(&self, keyword: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '*' || c == '$'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '*' | ':' | '$')
}

fn word(input: &str) -> IResult<&str, TokenKind> {
    map(
        recognize(pair(satisfy(is_word_start), take_while(is_word_char))),
        |w: &str| TokenKind::Word(w.to_string()),
    )(input)
}

fn backtick_word(input: &str) -> IResult<&str, TokenKind> {
    map(
        preceded(char('`'), nom::sequence::terminated(take_while(|c| c != '`'), char('`'))),
        |w: &str| TokenKind::Word(w.to_string()),
    )(input)
}

fn rid(input: &str) -> IResult<&str, (&str, &str)> {
    preceded(char('#'), separated_pair(digit1, char(':'), digit1))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(input)
}

fn punctuation(input: &str) -> IResult<&str, TokenKind> {
    alt((
        value(TokenKind::LBracket, char('[')),
        value(TokenKind::RBracket, char(']')),
        value(TokenKind::LParen, char('(')),
        value(TokenKind::RParen, char(')')),
        value(TokenKind::Comma, char(',')),
        value(TokenKind::Equals, char('=')),
        value(TokenKind::Semicolon, char(';')),
    ))(input)
}

/// Read a single- or double-quoted string; `None` when the closing quote is missing
fn quoted(input: &str) -> Option<(&str, String)> {
    let mut chars = input.char_indices();
    let (_, quote) = chars.next()?;
    let mut out = String::new();
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            out.push(match c {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Some((&input[idx + c.len_utf8()..], out));
        } else {
            out.push(c);
        }
    }
    None
}

/// Tokenize a whole command
pub fn tokenize(input: &str) -> ParseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    loop {
        let (after_space, _) = multispace0::<&str, nom::error::Error<&str>>(rest)
            .unwrap_or((rest, ""));
        rest = after_space;
        if rest.is_empty() {
            break;
        }
        let offset = input.len() - rest.len();
        let first = rest.chars().next().unwrap_or(' ');

        let (remaining, kind) = if first == '\'' || first == '"' {
            match quoted(rest) {
                Some((remaining, text)) => (remaining, TokenKind::Str(text)),
                None => return Err(ParseError::UnterminatedString { position: offset }),
            }
        } else if first == '`' {
            backtick_word(rest)
                .map_err(|_| ParseError::UnterminatedString { position: offset })?
        } else if let Ok((remaining, (cluster, position))) = rid(rest) {
            let text = &rest[..rest.len() - remaining.len()];
            match (cluster.parse::<i32>(), position.parse::<i64>()) {
                (Ok(c), Ok(p)) => (remaining, TokenKind::Rid(RecordId::new(c, p))),
                _ => {
                    return Err(ParseError::InvalidNumber {
                        text: text.to_string(),
                        position: offset,
                    })
                }
            }
        } else if let Ok((remaining, text)) = number(rest) {
            let kind = if text.contains('.') {
                text.parse::<f64>().map(TokenKind::Float).ok()
            } else {
                text.parse::<i64>().map(TokenKind::Integer).ok()
            };
            match kind {
                Some(kind) => (remaining, kind),
                None => {
                    return Err(ParseError::InvalidNumber {
                        text: text.to_string(),
                        position: offset,
                    })
                }
            }
        } else if let Ok(parsed) = alt((word, punctuation))(rest) {
            parsed
        } else {
            return Err(ParseError::InvalidCharacter {
                character: first,
                position: offset,
            });
        };

        let end = input.len() - remaining.len();
        tokens.push(Token { kind, offset, end });
        rest = remaining;
    }

    Ok(tokens)
}
