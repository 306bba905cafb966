/// Default fuel level for one command (20 billion instructions)
pub const DEFAULT_FUEL_LEVEL: u64 = 20_000_000_000;
/// Minimum allowed fuel level (1 million instructions)
pub const MIN_FUEL_LEVEL: u64 = 1_000_000;
/// Maximum allowed fuel level (200 billion instructions) - security limit
pub const MAX_FUEL_LEVEL: u64 = 200_000_000_000;
/// Program name expected as argv[0]
pub const DEFAULT_PROGRAM_NAME: &str = "openssl";
/// Maximum accepted size of the tool binary (64 MB)
pub const DEFAULT_MAX_MODULE_SIZE: usize = 64 * 1024 * 1024;
/// Linear memory ceiling per invocation (512 MB)
pub const DEFAULT_MAX_MEMORY_BYTES: usize = 512 * 1024 * 1024;
/// Per-stream stdout/stderr capture cap (4 MB)
pub const DEFAULT_CAPTURE_LIMIT_BYTES: usize = 4 * 1024 * 1024;
