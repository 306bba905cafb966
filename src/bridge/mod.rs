// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The caller-facing entry point.
//!
//! [`OpenSslBridge::execute`] checks the request synchronously, so misuse
//! (bad file names, unbalanced quotes) is reported without waiting behind
//! other commands, then hands it to the serializer and returns a
//! [`PendingResult`].
//!
//! # Example
//!
//! ```rust,no_run
//! use openssl_wasm_bridge::bridge::OpenSslBridge;
//! use openssl_wasm_bridge::config::load_and_validate_config;
//! use openssl_wasm_bridge::fs::VirtualFile;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_and_validate_config("bridge.yaml")?;
//! let bridge = OpenSslBridge::start(&config)?;
//!
//! let key = bridge
//!     .run("openssl genpkey -algorithm ML-DSA-44 -out signer.key", vec![])
//!     .await?;
//! let signer = key.file("signer.key").cloned().ok_or("no key produced")?;
//!
//! let signed = bridge
//!     .run(
//!         "openssl pkeyutl -sign -inkey signer.key -in msg.txt -out msg.sig",
//!         vec![signer, VirtualFile::from_text("msg.txt", "hello")],
//!     )
//!     .await?;
//! assert!(signed.is_success(), "{:?}", signed.error_message());
//! # Ok(())
//! # }
//! ```

mod result;

pub use crate::engine::PendingResult;
pub use result::CommandResult;

use crate::backends::wasm::WasiCommandRuntime;
use crate::command::{parse_command, Environment, ParsedCommand};
use crate::config::{validate_config, BridgeConfig};
use crate::engine::{Invoker, Serializer};
use crate::errors::{BridgeError, ConfigError};
use crate::fs::{validate_file_name, VirtualFile, Workspace};
use crate::observability::messages::bridge::CommandRejected;
use crate::observability::messages::StructuredLog;
use crate::traits::ToolRuntime;
use std::time::Duration;

pub struct OpenSslBridge {
    serializer: Serializer,
    program: String,
}

impl OpenSslBridge {
    /// Loads and compiles the configured module and starts the worker.
    ///
    /// Nothing is left running if this fails; it can simply be retried.
    pub fn start(config: &BridgeConfig) -> Result<Self, BridgeError> {
        validate_config(config)
            .map_err(|errors| BridgeError::Startup(ConfigError::Invalid(errors).to_string()))?;
        let runtime = WasiCommandRuntime::from_config(config)
            .map_err(|e| BridgeError::Startup(e.to_string()))?;
        Self::with_runtime(Box::new(runtime), config)
    }

    /// Starts the worker around an already constructed runtime.
    pub fn with_runtime(
        runtime: Box<dyn ToolRuntime>,
        config: &BridgeConfig,
    ) -> Result<Self, BridgeError> {
        let workspace = Workspace::new().map_err(|e| BridgeError::Startup(e.to_string()))?;
        let environment = Environment::from_config(&config.environment);
        let program = config.program_name().to_string();

        let invoker = Invoker::new(runtime, workspace, environment, program.clone());
        let serializer = Serializer::spawn(invoker)?;

        Ok(Self {
            serializer,
            program,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Validates and enqueues a command.
    ///
    /// `Err` means the request was rejected and never queued. Once queued,
    /// the command's own failures arrive inside the [`CommandResult`].
    pub fn execute(
        &self,
        command: &str,
        input_files: Vec<VirtualFile>,
    ) -> Result<PendingResult, BridgeError> {
        match self.check_request(command, &input_files) {
            Ok(parsed) => self.serializer.submit(parsed, input_files),
            Err(error) => {
                CommandRejected {
                    command,
                    error: &error,
                }
                .log();
                Err(error)
            }
        }
    }

    /// [`execute`](Self::execute) and wait for the result.
    pub async fn run(
        &self,
        command: &str,
        input_files: Vec<VirtualFile>,
    ) -> Result<CommandResult, BridgeError> {
        self.execute(command, input_files)?.await
    }

    /// Like [`run`](Self::run), but stops waiting after `timeout`.
    ///
    /// The command is not cancelled; it finishes in the background and its
    /// result is discarded.
    pub async fn run_with_timeout(
        &self,
        command: &str,
        input_files: Vec<VirtualFile>,
        timeout: Duration,
    ) -> Result<CommandResult, BridgeError> {
        let pending = self.execute(command, input_files)?;
        tokio::time::timeout(timeout, pending)
            .await
            .map_err(|_| BridgeError::Timeout(timeout))?
    }

    /// Runs everything already queued, then stops the worker.
    pub fn shutdown(self) {
        self.serializer.shutdown();
    }

    fn check_request(&self, command: &str, input_files: &[VirtualFile]) -> Result<ParsedCommand, BridgeError> {
        for file in input_files {
            validate_file_name(file.name()).map_err(BridgeError::from_staging)?;
        }
        Ok(parse_command(command, &self.program)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::ScriptedTool;
    use crate::errors::CommandFailure;

    fn bridge(tool: ScriptedTool) -> OpenSslBridge {
        OpenSslBridge::with_runtime(Box::new(tool), &BridgeConfig::new("unused.wasm")).unwrap()
    }

    #[tokio::test]
    async fn test_program_prefix_is_optional() {
        let tool = ScriptedTool::openssl_like();
        let calls = tool.calls();
        let bridge = bridge(tool);

        let with_prefix = bridge.run("openssl version", vec![]).await.unwrap();
        let without_prefix = bridge.run("version", vec![]).await.unwrap();

        assert_eq!(with_prefix.stdout, without_prefix.stdout);
        assert_eq!(calls.argvs()[0], calls.argvs()[1]);
        assert_eq!(calls.argvs()[0], vec!["openssl", "version"]);
    }

    #[tokio::test]
    async fn test_invalid_file_name_is_rejected_before_queueing() {
        let tool = ScriptedTool::openssl_like();
        let calls = tool.calls();
        let bridge = bridge(tool);

        let error = bridge
            .execute("dgst -sha256 a.txt", vec![VirtualFile::from_text("../a.txt", "x")])
            .err()
            .unwrap();

        assert!(matches!(error, BridgeError::InvalidFileName { ref name, .. } if name == "../a.txt"));
        bridge.run("version", vec![]).await.unwrap();
        assert_eq!(calls.subcommands(), vec!["version"]);
    }

    #[tokio::test]
    async fn test_reserved_names_are_rejected() {
        let bridge = bridge(ScriptedTool::openssl_like());
        for name in ["random.seed", "ssl", "tmp"] {
            let result = bridge.execute("version", vec![VirtualFile::from_text(name, "x")]);
            assert!(matches!(result, Err(BridgeError::InvalidFileName { .. })), "{}", name);
        }
    }

    #[tokio::test]
    async fn test_malformed_commands_are_rejected() {
        let bridge = bridge(ScriptedTool::openssl_like());

        assert!(matches!(bridge.execute("", vec![]), Err(BridgeError::MalformedCommand(_))));
        assert!(matches!(bridge.execute("openssl", vec![]), Err(BridgeError::MalformedCommand(_))));
        assert!(matches!(
            bridge.execute(r#"req -subj "/CN=unterminated"#, vec![]),
            Err(BridgeError::MalformedCommand(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_subcommand_is_a_tool_failure_not_an_error() {
        let bridge = bridge(ScriptedTool::openssl_like());

        let result = bridge.run("frobnicate", vec![]).await.unwrap();

        assert!(matches!(result.error, Some(CommandFailure::ToolExecution { status: 1, .. })));
        assert!(result.stderr.contains("frobnicate"));
    }

    #[tokio::test]
    async fn test_timeout_stops_waiting_but_not_running() {
        let tool = ScriptedTool::openssl_like();
        let calls = tool.calls();
        let bridge = bridge(tool);

        let result = bridge
            .run_with_timeout("sleep", vec![], Duration::from_millis(1))
            .await;
        assert!(matches!(result, Err(BridgeError::Timeout(_))));

        bridge.run("version", vec![]).await.unwrap();
        assert_eq!(calls.subcommands(), vec!["sleep", "version"]);
    }

    #[tokio::test]
    async fn test_start_fails_cleanly_for_missing_module() {
        let result = OpenSslBridge::start(&BridgeConfig::new("/nonexistent/openssl.wasm"));
        assert!(matches!(result, Err(BridgeError::Startup(_))));
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_config() {
        let mut config = BridgeConfig::new("wasm/openssl.wasm");
        config.program_name = Some("  ".to_string());

        match OpenSslBridge::start(&config) {
            Err(BridgeError::Startup(message)) => assert!(message.contains("Program name")),
            Err(other) => panic!("unexpected error {:?}", other),
            Ok(_) => panic!("invalid config accepted"),
        }
    }
}
