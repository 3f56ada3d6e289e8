// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Parse errors

use thiserror::Error;

/// Errors produced while tokenizing or parsing a command
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Unexpected end of command, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("Unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Unexpected character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Invalid {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Empty command")]
    Empty,
}

impl ParseError {
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        ParseError::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
