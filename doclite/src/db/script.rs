// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Script splitting
//!
//! A script is a sequence of commands separated by `;`. Semicolons inside
//! quoted strings, backtick identifiers and brackets do not end a command.

/// Split a script into trimmed, non-empty commands
pub fn split_script(text: &str) -> Vec<&str> {
    let mut commands = Vec::new();
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut depth: usize = 0;
    let mut start = 0;

    for (offset, c) in text.char_indices() {
        if let Some(q) = quote {
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
            '\'' | '"' | '`' => quote = Some(c),
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => {
                push_command(&mut commands, &text[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    push_command(&mut commands, &text[start..]);
    commands
}

fn push_command<'a>(commands: &mut Vec<&'a str>, command: &'a str) {
    let command = command.trim();
    if !command.is_empty() {
        commands.push(command);
    }
}
