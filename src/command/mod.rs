// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Command line handling: tokenization and per-command environment.

pub mod environment;
mod tokenizer;

pub use environment::{CommandStrategy, Environment, PreparedCommand};
pub use tokenizer::{parse_command, tokenize, ParsedCommand, TokenizeError};
