use std::fs;
use std::io::{self, Read};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Read input from file path or stdin.
/// - `Some("-")` reads from stdin
/// - `Some(path)` reads from file
/// - `None` yields `None`
pub fn read_optional_input(file: Option<&str>) -> anyhow::Result<Option<String>> {
    file.map(read_input).transpose()
}

pub fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Error reading from stdin")?;
        return Ok(buffer);
    }
    fs::read_to_string(file).with_context(|| format!("Error reading file {file}"))
}

/// Print JSON to stdout.
pub fn print_json(value: &impl serde::Serialize, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
