// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wasmtime engine configuration for the tool module.

use crate::backends::wasm::error::{WasmError, WasmResult};
use crate::observability::messages::wasm::EngineCreationStarted;
use wasmtime::{Config, Engine};

/// Creates the engine every command runs on.
///
/// Fuel metering is always on; each command gets its own budget through
/// `Store::set_fuel`.
pub fn create_engine() -> WasmResult<Engine> {
    tracing::debug!("{}", EngineCreationStarted { fuel_metering: true });

    let mut config = Config::new();

    config.wasm_component_model(false);
    config.wasm_threads(false); // No threading support
    // wasi-sdk builds of the tool may carry SIMD128 code paths
    config.wasm_simd(true);
    config.wasm_relaxed_simd(false);
    config.wasm_multi_memory(false); // Single memory instance only
    config.wasm_memory64(false); // 32-bit memory addressing only
    config.consume_fuel(true);
    config.epoch_interruption(false);

    Engine::new(&config).map_err(|e| WasmError::EngineError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasmtime::{Module, Store};

    #[test]
    fn test_engine_meters_fuel() {
        let engine = create_engine().unwrap();
        let mut store = Store::new(&engine, ());
        store.set_fuel(1_000).unwrap();
        assert_eq!(store.get_fuel().unwrap(), 1_000);
    }

    #[test]
    fn test_engine_rejects_threads() {
        let engine = create_engine().unwrap();
        let bytes = wat::parse_str("(module (memory 1 1 shared))").unwrap();
        assert!(Module::new(&engine, &bytes).is_err());
    }
}
