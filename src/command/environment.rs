// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-command environment preparation.
//!
//! Before every dispatch the sandbox receives a minimal `openssl.cnf` and the
//! module gets `OPENSSL_CONF`/`RANDFILE` pointing into it. Subcommands that
//! consume randomness additionally get a fresh entropy seed and an explicit
//! `-rand` argument so they never depend on the guest's notion of a random
//! device.

use crate::command::ParsedCommand;
use crate::config::EnvironmentConfig;
use crate::fs::{FsResult, Workspace};
use rand::RngCore;
use std::collections::HashSet;

/// Sandbox-relative location of the generated configuration file.
pub const CONFIG_FILE: &str = "ssl/openssl.cnf";
/// Sandbox-relative location of the entropy seed.
pub const SEED_FILE: &str = "random.seed";
/// Size of the entropy seed written for crypto subcommands.
pub const ENTROPY_SEED_BYTES: usize = 4096;

/// Providers block plus an empty distinguished-name section so `req` works
/// without prompting.
pub const DEFAULT_OPENSSL_CNF: &str = "\
openssl_conf = openssl_init
[openssl_init]
providers = provider_sect
[provider_sect]
default = default_sect
legacy = legacy_sect
[default_sect]
activate = 1
[legacy_sect]
activate = 1
[req]
distinguished_name = req_distinguished_name
[req_distinguished_name]
";

/// Subcommands that get an entropy seed and `-rand` by default.
pub const DEFAULT_CRYPTO_COMMANDS: &[&str] = &[
    "genpkey", "req", "rand", "dgst", "enc", "cms", "ca", "x509", "verify", "sign", "spkac",
];

/// How a subcommand's environment is prepared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStrategy {
    /// Configuration file only; arguments passed through untouched.
    Base,
    /// Configuration file, entropy seed and `-rand /random.seed`.
    Crypto,
}

impl CommandStrategy {
    pub fn name(self) -> &'static str {
        match self {
            CommandStrategy::Base => "base",
            CommandStrategy::Crypto => "crypto",
        }
    }
}

/// Argument vector and environment ready for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCommand {
    pub strategy: CommandStrategy,
    pub argv: Vec<String>,
    pub env: Vec<(String, String)>,
}

pub struct Environment {
    openssl_cnf: String,
    crypto_commands: HashSet<String>,
    inject_entropy: bool,
}

impl Environment {
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self {
            openssl_cnf: config
                .openssl_conf
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENSSL_CNF.to_string()),
            crypto_commands: config.crypto_commands().into_iter().collect(),
            inject_entropy: config.inject_entropy(),
        }
    }

    pub fn strategy_for(&self, subcommand: &str) -> CommandStrategy {
        if self.inject_entropy && self.crypto_commands.contains(subcommand) {
            CommandStrategy::Crypto
        } else {
            CommandStrategy::Base
        }
    }

    /// Writes environment files into the sandbox and builds the final argv.
    pub fn prepare(&self, workspace: &Workspace, command: &ParsedCommand) -> FsResult<PreparedCommand> {
        let strategy = self.strategy_for(&command.subcommand);

        workspace.write_environment_file(CONFIG_FILE, self.openssl_cnf.as_bytes())?;

        let mut argv = Vec::with_capacity(command.args.len() + 4);
        argv.push(command.program.clone());
        argv.push(command.subcommand.clone());

        if strategy == CommandStrategy::Crypto {
            let mut seed = vec![0u8; ENTROPY_SEED_BYTES];
            rand::thread_rng().fill_bytes(&mut seed);
            workspace.write_environment_file(SEED_FILE, &seed)?;

            argv.push("-rand".to_string());
            argv.push(format!("/{}", SEED_FILE));
        }
        argv.extend(command.args.iter().cloned());

        Ok(PreparedCommand {
            strategy,
            argv,
            env: vec![
                ("OPENSSL_CONF".to_string(), format!("/{}", CONFIG_FILE)),
                ("RANDFILE".to_string(), format!("/{}", SEED_FILE)),
            ],
        })
    }
}
