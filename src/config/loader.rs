// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::command::environment::DEFAULT_CRYPTO_COMMANDS;
use crate::config::consts::{
    DEFAULT_CAPTURE_LIMIT_BYTES, DEFAULT_FUEL_LEVEL, DEFAULT_MAX_MEMORY_BYTES,
    DEFAULT_MAX_MODULE_SIZE, DEFAULT_PROGRAM_NAME, MAX_FUEL_LEVEL, MIN_FUEL_LEVEL,
};
use crate::errors::{ConfigError, ValidationError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure for the command bridge.
///
/// Describes which tool binary to run, how to run it, and how each command's
/// environment is prepared. It is typically loaded from a YAML file.
///
/// # Fields
/// * `module` - Path to the WASI Preview 1 build of the tool
/// * `program_name` - Expected argv[0] (optional, defaults to `openssl`)
/// * `max_module_size` - Size limit for the tool binary in bytes (optional)
/// * `wasm` - Execution limits (optional)
/// * `environment` - Per-command environment preparation (optional)
///
/// # Example
/// ```yaml
/// module: wasm/openssl.wasm
/// program_name: openssl
/// wasm:
///   fuel:
///     default: 20000000000
///   max_memory_bytes: 536870912
/// environment:
///   inject_entropy: true
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    pub module: String,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub max_module_size: Option<usize>,
    #[serde(default)]
    pub wasm: WasmConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

impl BridgeConfig {
    /// Configuration with defaults for everything but the module path.
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            program_name: None,
            max_module_size: None,
            wasm: WasmConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }

    pub fn program_name(&self) -> &str {
        self.program_name.as_deref().unwrap_or(DEFAULT_PROGRAM_NAME)
    }

    pub fn max_module_size(&self) -> usize {
        self.max_module_size.unwrap_or(DEFAULT_MAX_MODULE_SIZE)
    }
}

/// WASM execution limits.
///
/// # Fields
/// * `fuel` - Fuel budget per command
/// * `max_memory_bytes` - Linear memory ceiling per command
/// * `capture_limit_bytes` - Cap on captured stdout and on captured stderr
///
/// # Example
/// ```yaml
/// wasm:
///   fuel:
///     default: 20000000000
///     minimum: 1000000
///     maximum: 200000000000
///   capture_limit_bytes: 4194304
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WasmConfig {
    #[serde(default)]
    pub fuel: FuelConfig,
    pub max_memory_bytes: Option<usize>,
    pub capture_limit_bytes: Option<usize>,
}

impl WasmConfig {
    pub fn max_memory_bytes(&self) -> usize {
        self.max_memory_bytes.unwrap_or(DEFAULT_MAX_MEMORY_BYTES)
    }

    pub fn capture_limit_bytes(&self) -> usize {
        self.capture_limit_bytes.unwrap_or(DEFAULT_CAPTURE_LIMIT_BYTES)
    }
}

/// Fuel consumption configuration for WASM execution.
///
/// Fuel limits prevent runaway commands by bounding the number of instructions
/// a single invocation can execute. All values are optional and validated
/// against security bounds.
///
/// # Fields
/// * `default` - Fuel granted to each command (defaults to 20B)
/// * `minimum` - Minimum allowed fuel level (defaults to 1M)
/// * `maximum` - Maximum allowed fuel level (defaults to 200B) - security limit
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FuelConfig {
    pub default: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    /// Get the default fuel level, using built-in default if not configured.
    pub fn get_default(&self) -> u64 {
        self.default.unwrap_or(DEFAULT_FUEL_LEVEL)
    }

    /// Get the minimum fuel level, using built-in default if not configured.
    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    /// Get the maximum fuel level, using built-in default if not configured.
    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Clamp a fuel level to configured bounds.
    ///
    /// Fails instead of clamping when the bounds themselves are inverted.
    ///
    /// # Example
    /// ```
    /// use openssl_wasm_bridge::config::FuelConfig;
    ///
    /// let config = FuelConfig::default();
    /// let fuel = config.validate_and_clamp(1_000_000_000_000).unwrap(); // Too high
    /// assert_eq!(fuel, 200_000_000_000); // Clamped to maximum
    /// ```
    pub fn validate_and_clamp(&self, requested: u64) -> Result<u64, ValidationError> {
        let min = self.get_minimum();
        let max = self.get_maximum();
        if min > max {
            return Err(ValidationError::FuelBoundsInverted {
                minimum: min,
                maximum: max,
            });
        }
        if requested < min || requested > max {
            tracing::warn!(
                requested,
                min,
                max,
                "Fuel level out of bounds, clamping"
            );
        }
        Ok(requested.clamp(min, max))
    }

    /// The fuel each command actually receives.
    pub fn effective(&self) -> Result<u64, ValidationError> {
        self.validate_and_clamp(self.get_default())
    }
}

/// Per-command environment preparation.
///
/// # Fields
/// * `openssl_conf` - Replacement contents for the generated `openssl.cnf` (optional)
/// * `inject_entropy` - Seed crypto subcommands with fresh entropy (optional, defaults to true)
/// * `crypto_commands` - Subcommands treated as crypto commands (optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentConfig {
    pub openssl_conf: Option<String>,
    pub inject_entropy: Option<bool>,
    pub crypto_commands: Option<Vec<String>>,
}

impl EnvironmentConfig {
    pub fn inject_entropy(&self) -> bool {
        self.inject_entropy.unwrap_or(true)
    }

    pub fn crypto_commands(&self) -> Vec<String> {
        match &self.crypto_commands {
            Some(commands) => commands.clone(),
            None => DEFAULT_CRYPTO_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<BridgeConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let cfg: BridgeConfig = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<BridgeConfig, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
