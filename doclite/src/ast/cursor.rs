// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Token cursor with the keyword helpers shared by every command parser

use super::error::{ParseError, ParseResult};
use super::lexer::{tokenize, Token, TokenKind};
use crate::storage::RecordId;

pub struct TokenCursor<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    /// Tokenize `text`, ignoring trailing semicolons
    pub fn new(text: &'a str) -> ParseResult<Self> {
        let mut tokens = tokenize(text)?;
        while matches!(tokens.last().map(|t| &t.kind), Some(TokenKind::Semicolon)) {
            tokens.pop();
        }
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(Self {
            text,
            tokens,
            pos: 0,
        })
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.pos + ahead)
    }

    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Leading words of the command, upper-cased, used for dispatch
    pub fn leading_words(&self, count: usize) -> Vec<String> {
        self.tokens
            .iter()
            .take(count)
            .map_while(|t| match &t.kind {
                TokenKind::Word(w) => Some(w.to_uppercase()),
                _ => None,
            })
            .collect()
    }

    pub fn peek_keyword(&self, keyword: &str) -> bool {
        self.peek().map(|t| t.is_keyword(keyword)).unwrap_or(false)
    }

    /// Consume `keyword` if it is next
    pub fn consume_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a keyword sequence only when all of it matches
    pub fn consume_keywords(&mut self, keywords: &[&str]) -> bool {
        let matches = keywords
            .iter()
            .enumerate()
            .all(|(i, kw)| self.peek_at(i).map(|t| t.is_keyword(kw)).unwrap_or(false));
        if matches {
            self.pos += keywords.len();
        }
        matches
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> ParseResult<()> {
        if self.consume_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(keyword))
        }
    }

    pub fn expect_keywords(&mut self, keywords: &[&str]) -> ParseResult<()> {
        for keyword in keywords {
            self.expect_keyword(keyword)?;
        }
        Ok(())
    }

    pub fn consume(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind == kind).unwrap_or(false) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: &TokenKind) -> ParseResult<()> {
        if self.consume(kind) {
            Ok(())
        } else {
            Err(self.unexpected(&kind.describe()))
        }
    }

    /// Identifier given as a bare word or a quoted string
    pub fn expect_identifier(&mut self, what: &str) -> ParseResult<String> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Word(w)) | Some(TokenKind::Str(w)) if !w.is_empty() => {
                self.pos += 1;
                Ok(w)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// A word, quoted string or number, returned as text
    pub fn expect_text(&mut self, what: &str) -> ParseResult<String> {
        let text = match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Word(w)) | Some(TokenKind::Str(w)) => w.clone(),
            Some(TokenKind::Integer(i)) => i.to_string(),
            Some(TokenKind::Float(f)) => f.to_string(),
            _ => return Err(self.unexpected(what)),
        };
        self.pos += 1;
        Ok(text)
    }

    pub fn expect_string(&mut self, what: &str) -> ParseResult<String> {
        match self.peek().map(|t| t.kind.clone()) {
            Some(TokenKind::Str(s)) => {
                self.pos += 1;
                Ok(s)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    pub fn expect_integer(&mut self, what: &str) -> ParseResult<i64> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Integer(i)) => {
                let value = *i;
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    pub fn expect_bool(&mut self, what: &str) -> ParseResult<bool> {
        if self.consume_keyword("TRUE") {
            Ok(true)
        } else if self.consume_keyword("FALSE") {
            Ok(false)
        } else {
            Err(self.unexpected(what))
        }
    }

    pub fn expect_rid(&mut self) -> ParseResult<RecordId> {
        match self.peek().map(|t| &t.kind) {
            Some(TokenKind::Rid(rid)) => {
                let rid = *rid;
                self.pos += 1;
                Ok(rid)
            }
            _ => Err(self.unexpected("record id")),
        }
    }

    /// Either a single record id or a bracketed list of them
    pub fn expect_rid_list(&mut self) -> ParseResult<Vec<RecordId>> {
        if !self.consume(&TokenKind::LBracket) {
            return Ok(vec![self.expect_rid()?]);
        }
        let mut rids = Vec::new();
        if self.consume(&TokenKind::RBracket) {
            return Ok(rids);
        }
        loop {
            rids.push(self.expect_rid()?);
            if self.consume(&TokenKind::RBracket) {
                return Ok(rids);
            }
            self.expect(&TokenKind::Comma)?;
        }
    }

    /// Either a single identifier or a bracketed list of them
    pub fn expect_identifier_list(&mut self, what: &str) -> ParseResult<Vec<String>> {
        if !self.consume(&TokenKind::LBracket) {
            return Ok(vec![self.expect_identifier(what)?]);
        }
        let mut items = Vec::new();
        if self.consume(&TokenKind::RBracket) {
            return Ok(items);
        }
        loop {
            items.push(self.expect_identifier(what)?);
            if self.consume(&TokenKind::RBracket) {
                return Ok(items);
            }
            self.expect(&TokenKind::Comma)?;
        }
    }

    /// Raw text from the current token to the end of the command
    pub fn rest_text(&self) -> &'a str {
        match self.peek() {
            Some(token) => {
                let end = self.tokens.last().map(|t| t.end).unwrap_or(token.offset);
                &self.text[token.offset..end]
            }
            None => "",
        }
    }

    /// Move past every remaining token
    pub fn skip_to_end(&mut self) {
        self.pos = self.tokens.len();
    }

    pub fn expect_end(&self) -> ParseResult<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: "end of command".to_string(),
                found: token.kind.describe(),
                position: token.offset,
            }),
        }
    }

    pub fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.describe(),
                position: token.offset,
            },
            None => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }
}
