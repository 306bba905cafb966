// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Argv tokenizer for the wrapped tool's fixed CLI grammar.
//!
//! Whitespace separates arguments except inside double quotes. A quoted span
//! becomes part of exactly one argument with the quotes removed, and quoted
//! and unquoted text that touch (`-subj="/CN=A B"`) join into one argument.
//! There is no escaping and no shell: `|`, `>`, `$()`, `*` and single quotes
//! are ordinary characters.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("command is empty")]
    Empty,

    #[error("unbalanced double quote starting at byte {0}")]
    UnbalancedQuote(usize),

    #[error("missing subcommand after '{0}'")]
    MissingSubcommand(String),
}

/// A tokenized command line, split into program, subcommand and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub program: String,
    pub subcommand: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Full argument vector as the tool's `main(argc, argv)` expects it.
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 2);
        argv.push(self.program.clone());
        argv.push(self.subcommand.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }
}

/// Splits a command line into raw tokens.
///
/// # Example
/// ```
/// use openssl_wasm_bridge::command::tokenize;
///
/// let tokens = tokenize(r#"req -new -subj "/CN=Root CA" -out req.pem"#).unwrap();
/// assert_eq!(tokens, vec!["req", "-new", "-subj", "/CN=Root CA", "-out", "req.pem"]);
/// ```
pub fn tokenize(line: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote_start: Option<usize> = None;

    for (offset, ch) in line.char_indices() {
        match ch {
            '"' => {
                quote_start = match quote_start {
                    Some(_) => None,
                    None => Some(offset),
                };
                in_token = true;
            }
            c if c.is_whitespace() && quote_start.is_none() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if let Some(offset) = quote_start {
        return Err(TokenizeError::UnbalancedQuote(offset));
    }
    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Tokenizes `line` and splits off the program name and subcommand.
///
/// A leading token equal to `program` is dropped, so `openssl genpkey ...`
/// and `genpkey ...` parse identically.
pub fn parse_command(line: &str, program: &str) -> Result<ParsedCommand, TokenizeError> {
    let mut tokens = tokenize(line)?.into_iter();

    let mut subcommand = tokens.next().ok_or(TokenizeError::Empty)?;
    if subcommand == program {
        subcommand = tokens
            .next()
            .ok_or_else(|| TokenizeError::MissingSubcommand(program.to_string()))?;
    }

    Ok(ParsedCommand {
        program: program.to_string(),
        subcommand,
        args: tokens.collect(),
    })
}
