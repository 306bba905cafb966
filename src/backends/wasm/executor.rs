// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Runs the WASI Preview 1 build of the tool.
//!
//! The module is compiled and pre-linked once. Every command then gets a
//! fresh [`Store`] with its own WASI context: argv and environment from the
//! invocation, in-memory stdout/stderr pipes, and the sandbox directory
//! preopened as `/`. Nothing survives from one store to the next.

use crate::backends::wasm::detector::{inspect_command, require_entry_point, COMMAND_ENTRY_POINT};
use crate::backends::wasm::engine::create_engine;
use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::backends::wasm::loader::load_wasm_bytes;
use crate::config::{BridgeConfig, WasmConfig};
use crate::observability::messages::wasm::{
    ExecutionCompleted, ExecutionStarted, ModuleCompiled, ModuleTrapped,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{ExitStatus, RuntimeFailure, ToolInvocation, ToolOutput, ToolRuntime};
use std::time::Instant;
use wasmtime::{Engine, InstancePre, Linker, Module, Store, StoreLimits, StoreLimitsBuilder, Trap};
use wasmtime_wasi::p1::{self, WasiP1Ctx};
use wasmtime_wasi::p2::pipe::MemoryOutputPipe;
use wasmtime_wasi::{DirPerms, FilePerms, I32Exit, WasiCtxBuilder};

/// Guest path the sandbox directory is mounted at.
pub const SANDBOX_GUEST_PATH: &str = "/";

/// Wording used when the module hits an `unreachable` instruction.
pub const UNREACHABLE_TRAP_MESSAGE: &str = "WASM crash: the operation reached unreachable code. \
This usually indicates a build incompatibility or a memory issue with this specific algorithm.";

/// Per-store host state.
struct CommandCtx {
    wasi: WasiP1Ctx,
    limits: StoreLimits,
}

/// [`ToolRuntime`] backed by wasmtime and WASI Preview 1.
pub struct WasiCommandRuntime {
    engine: Engine,
    instance_pre: InstancePre<CommandCtx>,
    fuel: u64,
    max_memory_bytes: usize,
    capture_limit_bytes: usize,
}

impl WasiCommandRuntime {
    /// Loads, validates and compiles the module named by the configuration.
    pub fn from_config(config: &BridgeConfig) -> WasmResult<Self> {
        let bytes = load_wasm_bytes(&config.module, config.max_module_size())?;
        Self::from_bytes(&config.module, &bytes, &config.wasm)
    }

    /// Validates and compiles an in-memory module.
    ///
    /// `module_path` is only used for logging and diagnostics.
    pub fn from_bytes(module_path: &str, bytes: &[u8], wasm: &WasmConfig) -> WasmResult<Self> {
        let start = Instant::now();

        let fuel = wasm
            .fuel
            .effective()
            .map_err(|e| WasmError::ValidationError(e.to_string()))?;

        let interface = inspect_command(bytes)?;
        require_entry_point(&interface)?;

        let engine = create_engine()?;
        let module =
            Module::new(&engine, bytes).map_err(|e| WasmError::ModuleError(e.to_string()))?;

        let mut linker: Linker<CommandCtx> = Linker::new(&engine);
        p1::add_to_linker_sync(&mut linker, |ctx| &mut ctx.wasi)
            .map_err(|e| WasmError::ModuleError(format!("Failed to link WASI: {}", e)))?;
        let instance_pre = linker
            .instantiate_pre(&module)
            .map_err(|e| WasmError::ModuleError(format!("Failed to pre-instantiate: {}", e)))?;

        tracing::info!(
            "{}",
            ModuleCompiled {
                module_path,
                wasi_import_count: interface.wasi_imports.len(),
                duration: start.elapsed(),
            }
        );

        Ok(Self {
            engine,
            instance_pre,
            fuel,
            max_memory_bytes: wasm.max_memory_bytes(),
            capture_limit_bytes: wasm.capture_limit_bytes(),
        })
    }

    pub fn fuel(&self) -> u64 {
        self.fuel
    }

    fn build_store(
        &self,
        invocation: &ToolInvocation<'_>,
        stdout: &MemoryOutputPipe,
        stderr: &MemoryOutputPipe,
    ) -> Result<Store<CommandCtx>, RuntimeFailure> {
        let mut builder = WasiCtxBuilder::new();
        builder
            .args(invocation.argv)
            .stdout(stdout.clone())
            .stderr(stderr.clone());
        for (key, value) in invocation.env {
            builder.env(key, value);
        }
        builder
            .preopened_dir(
                invocation.root,
                SANDBOX_GUEST_PATH,
                DirPerms::all(),
                FilePerms::all(),
            )
            .map_err(|e| RuntimeFailure(format!("Failed to mount sandbox: {}", e)))?;

        let ctx = CommandCtx {
            wasi: builder.build_p1(),
            limits: StoreLimitsBuilder::new()
                .memory_size(self.max_memory_bytes)
                .build(),
        };

        let mut store = Store::new(&self.engine, ctx);
        store.limiter(|ctx| &mut ctx.limits);
        store
            .set_fuel(self.fuel)
            .map_err(|e| RuntimeFailure(format!("Failed to set fuel: {}", e)))?;
        Ok(store)
    }
}

impl ToolRuntime for WasiCommandRuntime {
    fn invoke(&mut self, invocation: &ToolInvocation<'_>) -> Result<ToolOutput, RuntimeFailure> {
        let started = Instant::now();
        let subcommand = invocation.subcommand();
        ExecutionStarted {
            program: invocation.argv.first().map(String::as_str).unwrap_or_default(),
            subcommand,
            arg_count: invocation.argv.len().saturating_sub(2),
            fuel: self.fuel,
        }
        .log();

        let stdout = MemoryOutputPipe::new(self.capture_limit_bytes);
        let stderr = MemoryOutputPipe::new(self.capture_limit_bytes);
        let mut store = self.build_store(invocation, &stdout, &stderr)?;

        let instance = self
            .instance_pre
            .instantiate(&mut store)
            .map_err(|e| RuntimeFailure(format!("Failed to instantiate module: {:#}", e)))?;
        let entry = instance
            .get_typed_func::<(), ()>(&mut store, COMMAND_ENTRY_POINT)
            .map_err(|e| RuntimeFailure(format!("Failed to find entry point: {}", e)))?;

        let status = match entry.call(&mut store, ()) {
            Ok(()) => ExitStatus::Exited(0),
            Err(error) => classify_exit(&error, self.fuel),
        };
        drop(store);

        let output = ToolOutput {
            stdout: stdout.contents().to_vec(),
            stderr: stderr.contents().to_vec(),
            status,
        };
        match &output.status {
            ExitStatus::Exited(code) => ExecutionCompleted {
                subcommand,
                exit_status: *code,
                stdout_bytes: output.stdout.len(),
                stderr_bytes: output.stderr.len(),
                duration: started.elapsed(),
            }
            .log(),
            ExitStatus::Trapped(reason) => ModuleTrapped { subcommand, reason }.log(),
        }

        Ok(output)
    }

    fn runtime_type(&self) -> &'static str {
        "WASI Preview 1"
    }
}

/// Maps the error returned by `_start` onto an exit status.
///
/// `proc_exit` unwinds as an [`I32Exit`] error and is a normal exit, not a
/// trap.
fn classify_exit(error: &wasmtime::Error, fuel: u64) -> ExitStatus {
    if let Some(exit) = error.downcast_ref::<I32Exit>() {
        return ExitStatus::Exited(exit.0);
    }

    let reason = match error.downcast_ref::<Trap>() {
        Some(Trap::UnreachableCodeReached) => UNREACHABLE_TRAP_MESSAGE.to_string(),
        Some(Trap::OutOfFuel) => format!(
            "Execution budget exhausted after {} fuel units; the operation did not finish",
            fuel
        ),
        Some(trap) => format!("WASM trap: {}", trap),
        None => format!("WASM execution error: {:#}", error),
    };
    ExitStatus::Trapped(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FuelConfig;
    use tempfile::TempDir;

    fn runtime(wat_source: &str) -> WasiCommandRuntime {
        runtime_with_fuel(wat_source, None)
    }

    fn runtime_with_fuel(wat_source: &str, fuel: Option<u64>) -> WasiCommandRuntime {
        let bytes = wat::parse_str(wat_source).unwrap();
        let wasm = WasmConfig {
            fuel: FuelConfig {
                default: fuel,
                ..FuelConfig::default()
            },
            ..WasmConfig::default()
        };
        WasiCommandRuntime::from_bytes("test.wasm", &bytes, &wasm).unwrap()
    }

    fn invoke(runtime: &mut WasiCommandRuntime, root: &TempDir) -> ToolOutput {
        let argv = vec!["openssl".to_string(), "version".to_string()];
        let env = vec![("OPENSSL_CONF".to_string(), "/ssl/openssl.cnf".to_string())];
        runtime
            .invoke(&ToolInvocation {
                argv: &argv,
                env: &env,
                root: root.path(),
            })
            .unwrap()
    }

    const RETURNS: &str = r#"(module
        (memory (export "memory") 1)
        (func (export "_start")))"#;

    const EXITS_WITH_THREE: &str = r#"(module
        (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
        (memory (export "memory") 1)
        (func (export "_start") (call $proc_exit (i32.const 3))))"#;

    const TRAPS: &str = r#"(module
        (memory (export "memory") 1)
        (func (export "_start") unreachable))"#;

    const SPINS: &str = r#"(module
        (memory (export "memory") 1)
        (func (export "_start") (loop $forever (br $forever))))"#;

    // Writes "hello\n" to stdout, then "oops\n" to stderr, then traps.
    const PRINTS_THEN_TRAPS: &str = r#"(module
        (import "wasi_snapshot_preview1" "fd_write"
            (func $fd_write (param i32 i32 i32 i32) (result i32)))
        (memory (export "memory") 1)
        (data (i32.const 0) "\08\00\00\00\06\00\00\00")
        (data (i32.const 8) "hello\n")
        (data (i32.const 32) "\28\00\00\00\05\00\00\00")
        (data (i32.const 40) "oops\n")
        (func (export "_start")
            (drop (call $fd_write (i32.const 1) (i32.const 0) (i32.const 1) (i32.const 20)))
            (drop (call $fd_write (i32.const 2) (i32.const 32) (i32.const 1) (i32.const 20)))
            unreachable))"#;

    // Creates /artifact.bin in the preopened directory (fd 3) and writes to it.
    const WRITES_ARTIFACT: &str = r#"(module
        (import "wasi_snapshot_preview1" "path_open"
            (func $path_open (param i32 i32 i32 i32 i32 i64 i64 i32 i32) (result i32)))
        (import "wasi_snapshot_preview1" "fd_write"
            (func $fd_write (param i32 i32 i32 i32) (result i32)))
        (import "wasi_snapshot_preview1" "fd_close"
            (func $fd_close (param i32) (result i32)))
        (import "wasi_snapshot_preview1" "proc_exit" (func $proc_exit (param i32)))
        (memory (export "memory") 1)
        (data (i32.const 0) "\2c\01\00\00\0d\00\00\00")
        (data (i32.const 200) "artifact.bin")
        (data (i32.const 300) "wasm-artifact")
        (func (export "_start")
            (if (i32.ne
                    (call $path_open
                        (i32.const 3) (i32.const 0)
                        (i32.const 200) (i32.const 12)
                        (i32.const 9) (i64.const 64) (i64.const 0)
                        (i32.const 0) (i32.const 100))
                    (i32.const 0))
                (then (call $proc_exit (i32.const 42))))
            (if (i32.ne
                    (call $fd_write (i32.load (i32.const 100)) (i32.const 0) (i32.const 1) (i32.const 20))
                    (i32.const 0))
                (then (call $proc_exit (i32.const 43))))
            (drop (call $fd_close (i32.load (i32.const 100))))))"#;

    #[test]
    fn test_normal_return_is_exit_zero() {
        let root = TempDir::new().unwrap();
        let output = invoke(&mut runtime(RETURNS), &root);
        assert_eq!(output.status, ExitStatus::Exited(0));
        assert!(output.stdout.is_empty());
    }

    #[test]
    fn test_proc_exit_status_is_reported() {
        let root = TempDir::new().unwrap();
        let output = invoke(&mut runtime(EXITS_WITH_THREE), &root);
        assert_eq!(output.status, ExitStatus::Exited(3));
        assert!(!output.status.success());
    }

    #[test]
    fn test_unreachable_gets_crash_wording() {
        let root = TempDir::new().unwrap();
        let output = invoke(&mut runtime(TRAPS), &root);
        assert_eq!(
            output.status,
            ExitStatus::Trapped(UNREACHABLE_TRAP_MESSAGE.to_string())
        );
        assert_eq!(output.status.code(), None);
    }

    #[test]
    fn test_runaway_module_exhausts_fuel() {
        let root = TempDir::new().unwrap();
        let mut spinner = runtime_with_fuel(SPINS, Some(1_000_000));
        assert_eq!(spinner.fuel(), 1_000_000);

        let output = invoke(&mut spinner, &root);
        match output.status {
            ExitStatus::Trapped(reason) => assert!(reason.contains("budget exhausted")),
            other => panic!("expected fuel trap, got {:?}", other),
        }
    }

    #[test]
    fn test_output_before_trap_is_kept() {
        let root = TempDir::new().unwrap();
        let output = invoke(&mut runtime(PRINTS_THEN_TRAPS), &root);
        assert_eq!(output.stdout, b"hello\n");
        assert_eq!(output.stderr, b"oops\n");
        assert!(matches!(output.status, ExitStatus::Trapped(_)));
    }

    #[test]
    fn test_each_invocation_gets_fresh_capture() {
        let root = TempDir::new().unwrap();
        let mut printer = runtime(PRINTS_THEN_TRAPS);

        let first = invoke(&mut printer, &root);
        let second = invoke(&mut printer, &root);
        assert_eq!(first.stdout, second.stdout);
        assert_eq!(second.stdout, b"hello\n");
    }

    #[test]
    fn test_module_writes_into_sandbox_root() {
        let root = TempDir::new().unwrap();
        let output = invoke(&mut runtime(WRITES_ARTIFACT), &root);
        assert_eq!(output.status, ExitStatus::Exited(0));

        let written = std::fs::read(root.path().join("artifact.bin")).unwrap();
        assert_eq!(written, b"wasm-artifact");
    }

    #[test]
    fn test_module_without_start_is_rejected() {
        let bytes = wat::parse_str(r#"(module (func (export "main")))"#).unwrap();
        let result = WasiCommandRuntime::from_bytes("lib.wasm", &bytes, &WasmConfig::default());
        assert!(matches!(result, Err(WasmError::ValidationError(_))));
    }

    #[test]
    fn test_missing_module_fails_from_config() {
        let config = BridgeConfig::new("/nonexistent/openssl.wasm");
        assert!(matches!(
            WasiCommandRuntime::from_config(&config),
            Err(WasmError::IoError(_))
        ));
    }

    #[test]
    fn test_inverted_fuel_bounds_are_rejected_before_compiling() {
        let bytes = wat::parse_str(RETURNS).unwrap();
        let wasm = WasmConfig {
            fuel: FuelConfig {
                default: None,
                minimum: Some(50),
                maximum: Some(10),
            },
            ..WasmConfig::default()
        };

        let result = WasiCommandRuntime::from_bytes("test.wasm", &bytes, &wasm);
        match result {
            Err(WasmError::ValidationError(message)) => {
                assert!(message.contains("50"));
                assert!(message.contains("10"));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("inverted fuel bounds were accepted"),
        }
    }
}
