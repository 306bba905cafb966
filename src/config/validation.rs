// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::BridgeConfig;
use crate::errors::ValidationError;

/// Validates a bridge configuration, collecting every problem found.
///
/// # Returns
/// * `Ok(())` - The configuration is usable
/// * `Err(Vec<ValidationError>)` - All detected problems, in field order
pub fn validate_config(cfg: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if cfg.module.trim().is_empty() {
        errors.push(ValidationError::EmptyModulePath);
    }

    let program = cfg.program_name();
    if program.trim().is_empty() || program.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidProgramName {
            program_name: program.to_string(),
        });
    }

    let fuel = &cfg.wasm.fuel;
    if fuel.get_minimum() > fuel.get_maximum() {
        errors.push(ValidationError::FuelBoundsInverted {
            minimum: fuel.get_minimum(),
            maximum: fuel.get_maximum(),
        });
    }

    for (field, value) in [
        ("max_module_size", cfg.max_module_size()),
        ("wasm.max_memory_bytes", cfg.wasm.max_memory_bytes()),
        ("wasm.capture_limit_bytes", cfg.wasm.capture_limit_bytes()),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroLimit { field });
        }
    }

    if let Some(commands) = &cfg.environment.crypto_commands {
        for command in commands {
            if command.trim().is_empty() {
                errors.push(ValidationError::EmptyCryptoCommand);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for error in &errors {
            tracing::warn!("{}", error);
        }
        Err(errors)
    }
}
