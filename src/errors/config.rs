// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Problems found while validating a bridge configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The `module` field is empty
    EmptyModulePath,
    /// The program name is empty or contains whitespace
    InvalidProgramName {
        program_name: String,
    },
    /// Fuel minimum exceeds fuel maximum
    FuelBoundsInverted {
        minimum: u64,
        maximum: u64,
    },
    /// A size limit was configured as zero
    ZeroLimit {
        field: &'static str,
    },
    /// A crypto command entry is blank
    EmptyCryptoCommand,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyModulePath => write!(f, "Module path must not be empty"),
            ValidationError::InvalidProgramName { program_name } => {
                write!(
                    f,
                    "Program name '{}' must be a single non-empty word",
                    program_name
                )
            }
            ValidationError::FuelBoundsInverted { minimum, maximum } => {
                write!(
                    f,
                    "Fuel minimum ({}) is greater than fuel maximum ({})",
                    minimum, maximum
                )
            }
            ValidationError::ZeroLimit { field } => {
                write!(f, "'{}' must be greater than zero", field)
            }
            ValidationError::EmptyCryptoCommand => {
                write!(f, "Crypto command entries must not be blank")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
