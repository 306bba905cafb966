// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::{bail, Context, Result};
use openssl_wasm_bridge::bridge::{CommandResult, OpenSslBridge};
use openssl_wasm_bridge::config::load_and_validate_config;
use openssl_wasm_bridge::fs::VirtualFile;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT_DIR: &str = ".";

/// Parsed command line of the demo binary.
struct CliArgs {
    config: String,
    command: String,
    inputs: Vec<PathBuf>,
    output_dir: PathBuf,
    json: bool,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {0} <config.yaml> \"<openssl command>\" [input files...] [--out <dir>] [--json]\n\
         Example: {0} bridge.yaml \"openssl genpkey -algorithm ED25519 -out signer.key\"\n\
         Example: {0} bridge.yaml \"dgst -sha256 -sign signer.key -out msg.sig msg.txt\" signer.key msg.txt --out signed/",
        program
    )
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let program = args.first().map(String::as_str).unwrap_or("openssl-bridge");
    let mut positional = Vec::new();
    let mut output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
    let mut json = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--out" => {
                let dir = iter.next().with_context(|| usage(program))?;
                output_dir = PathBuf::from(dir);
            }
            "--json" => json = true,
            _ => positional.push(arg.clone()),
        }
    }

    if positional.len() < 2 {
        bail!(usage(program));
    }
    let config = positional.remove(0);
    let command = positional.remove(0);

    Ok(CliArgs {
        config,
        command,
        inputs: positional.into_iter().map(PathBuf::from).collect(),
        output_dir,
        json,
    })
}

/// Reads an input file from disk; the sandbox sees it under its bare file name.
fn read_input(path: &Path) -> Result<VirtualFile> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Input path has no usable file name: {}", path.display()))?;
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(VirtualFile::new(name, data))
}

fn write_outputs(result: &CommandResult, output_dir: &Path) -> Result<()> {
    if result.files.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    for file in &result.files {
        let target = output_dir.join(file.name());
        std::fs::write(&target, file.data())
            .with_context(|| format!("Failed to write {}", target.display()))?;
        println!("📄 {} ({} bytes)", target.display(), file.len());
    }
    Ok(())
}

fn print_report(result: &CommandResult, elapsed: std::time::Duration) {
    if !result.stdout.is_empty() {
        println!("── stdout ──");
        print!("{}", result.stdout);
    }
    if !result.stderr.is_empty() {
        println!("── stderr ──");
        print!("{}", result.stderr);
    }
    match result.error_message() {
        None => println!("✅ Succeeded in {:?}", elapsed),
        Some(message) => println!("❌ Failed in {:?}: {}", elapsed, message),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = parse_args(&args)?;

    let config = load_and_validate_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;
    let inputs = cli
        .inputs
        .iter()
        .map(|path| read_input(path))
        .collect::<Result<Vec<_>>>()?;

    let bridge = OpenSslBridge::start(&config)?;

    let started = Instant::now();
    let result = bridge.run(&cli.command, inputs).await?;
    let elapsed = started.elapsed();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&result, elapsed);
        write_outputs(&result, &cli.output_dir)?;
    }

    bridge.shutdown();

    if let Some(code) = result.exit_status.filter(|code| *code != 0) {
        std::process::exit(code);
    }
    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
