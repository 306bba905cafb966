// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One command's full lifecycle against the sandbox.
//!
//! ```text
//! arm teardown → reset → snapshot → stage → prepare environment → invoke → harvest
//!       ↓                                                                      ↓
//!   reset on drop  ←──────────────────── every exit path ────────────────────┘
//! ```

use crate::bridge::CommandResult;
use crate::command::{Environment, ParsedCommand};
use crate::errors::CommandFailure;
use crate::fs::{FsError, VirtualFile, Workspace};
use crate::observability::messages::bridge::{InvocationCompleted, InvocationQueued, PublicKeyHint};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExitStatus, ToolInvocation, ToolOutput, ToolRuntime};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

const PRIVATE_KEY_SUFFIX: &str = ".key";
const PUBLIC_KEY_SUFFIX: &str = ".pub";

/// Owns the runtime and the sandbox; runs one command at a time.
pub struct Invoker {
    runtime: Box<dyn ToolRuntime>,
    workspace: Workspace,
    environment: Environment,
    program: String,
}

impl Invoker {
    pub fn new(
        runtime: Box<dyn ToolRuntime>,
        workspace: Workspace,
        environment: Environment,
        program: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            workspace,
            environment,
            program: program.into(),
        }
    }

    pub fn runtime_type(&self) -> &'static str {
        self.runtime.runtime_type()
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs `command` with `inputs` staged and returns what it produced.
    ///
    /// Never fails as a whole: sandbox and module problems are reported in
    /// [`CommandResult::error`]. The sandbox is empty again when this returns.
    pub fn run(&mut self, ticket: u64, command: &ParsedCommand, inputs: &[VirtualFile]) -> CommandResult {
        let started = Instant::now();
        let span = InvocationQueued {
            ticket,
            subcommand: &command.subcommand,
        }
        .span("run");
        let _enter = span.enter();

        let result = {
            let _teardown = self.workspace.teardown_guard();
            run_staged(
                self.runtime.as_mut(),
                &self.workspace,
                &self.environment,
                &self.program,
                command,
                inputs,
            )
        };

        InvocationCompleted {
            ticket,
            subcommand: &command.subcommand,
            outcome: outcome_label(&result),
            file_count: result.files.len(),
            duration: started.elapsed(),
        }
        .log();

        if command.subcommand == "genpkey" && result.is_success() {
            suggest_public_key(&result.files);
        }

        result
    }
}

fn run_staged(
    runtime: &mut dyn ToolRuntime,
    workspace: &Workspace,
    environment: &Environment,
    program: &str,
    command: &ParsedCommand,
    inputs: &[VirtualFile],
) -> CommandResult {
    // A failed teardown on the previous run may have left entries behind.
    if let Err(error) = workspace.reset() {
        return CommandResult::failed(workspace_failure(&error));
    }
    let mut before = match workspace.snapshot() {
        Ok(snapshot) => snapshot,
        Err(error) => return CommandResult::failed(workspace_failure(&error)),
    };
    if let Err(error) = workspace.stage(inputs) {
        return CommandResult::failed(workspace_failure(&error));
    }
    before.absorb(inputs);

    let prepared = match environment.prepare(workspace, command) {
        Ok(prepared) => prepared,
        Err(error) => return CommandResult::failed(workspace_failure(&error)),
    };
    tracing::debug!(
        strategy = prepared.strategy.name(),
        argv = ?prepared.argv,
        "Prepared command environment"
    );

    let invocation = ToolInvocation {
        argv: &prepared.argv,
        env: &prepared.env,
        root: workspace.root(),
    };
    let output = match panic::catch_unwind(AssertUnwindSafe(|| runtime.invoke(&invocation))) {
        Ok(Ok(output)) => output,
        Ok(Err(failure)) => {
            return CommandResult::failed(CommandFailure::ModuleTrap {
                reason: failure.to_string(),
            })
        }
        Err(payload) => {
            return CommandResult::failed(CommandFailure::ModuleTrap {
                reason: format!("Tool runtime panicked: {}", panic_message(payload.as_ref())),
            })
        }
    };

    let harvested = workspace.harvest(&before);
    build_result(program, output, harvested)
}

fn build_result(
    program: &str,
    output: ToolOutput,
    harvested: Result<Vec<VirtualFile>, FsError>,
) -> CommandResult {
    let exit_status = output.status.code();
    let mut error = match output.status {
        ExitStatus::Exited(0) => None,
        ExitStatus::Exited(status) => Some(CommandFailure::ToolExecution {
            program: program.to_string(),
            status,
        }),
        ExitStatus::Trapped(reason) => Some(CommandFailure::ModuleTrap { reason }),
    };

    let files = match harvested {
        Ok(files) => files,
        Err(harvest_error) => {
            // The command's own failure, if any, is the more useful report.
            error.get_or_insert_with(|| workspace_failure(&harvest_error));
            Vec::new()
        }
    };

    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        files,
        error,
        exit_status,
    }
}

fn workspace_failure(error: &FsError) -> CommandFailure {
    CommandFailure::Workspace {
        message: error.to_string(),
    }
}

fn outcome_label(result: &CommandResult) -> &'static str {
    match &result.error {
        None => "success",
        Some(CommandFailure::ToolExecution { .. }) => "nonzero exit",
        Some(CommandFailure::ModuleTrap { .. }) => "trapped",
        Some(CommandFailure::Workspace { .. }) => "sandbox failure",
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

fn suggest_public_key(files: &[VirtualFile]) {
    for file in files {
        if let Some(stem) = file.name().strip_suffix(PRIVATE_KEY_SUFFIX) {
            let public_key = format!("{}{}", stem, PUBLIC_KEY_SUFFIX);
            tracing::info!(
                "{}",
                PublicKeyHint {
                    private_key: file.name(),
                    public_key: &public_key,
                }
            );
        }
    }
}
