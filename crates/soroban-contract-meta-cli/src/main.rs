use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use soroban_contract_meta::{parse_contract_metadata, read_custom_sections, ParsedContractMeta};

#[derive(Parser)]
#[command(name = "soroban-meta")]
#[command(about = "Inspect contract interface metadata embedded in Soroban WASM binaries")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse the full contract interface and print it as JSON
    Inspect {
        /// Path to the input .wasm file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// List the custom sections present in the module
    Sections {
        /// Path to the input .wasm file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Show only the toolchain and interface versions
    Versions {
        /// Path to the input .wasm file
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { input } => {
            let wasm = read_wasm(&input)?;
            let parsed = parse_meta(&wasm, &input)?;
            println!("{}", serde_json::to_string_pretty(&parsed.interface)?);
        }
        Commands::Sections { input } => {
            let wasm = read_wasm(&input)?;
            let sections = read_custom_sections(&wasm)
                .with_context(|| format!("failed to scan sections of {}", input.display()))?;
            let rows: Vec<SectionRow> = sections
                .iter()
                .map(|s| SectionRow {
                    name: s.name.clone(),
                    size: s.contents.len(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        Commands::Versions { input } => {
            let wasm = read_wasm(&input)?;
            let parsed = parse_meta(&wasm, &input)?;
            let versions = VersionsRow {
                rust_version: parsed.interface.rust_version,
                sdk_version: parsed.interface.sdk_version,
                interface_version: parsed.interface.interface_version,
            };
            println!("{}", serde_json::to_string_pretty(&versions)?);
        }
    }

    Ok(())
}

/// One row of `sections` output.
#[derive(Serialize)]
struct SectionRow {
    name: String,
    size: usize,
}

/// Output of the `versions` command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionsRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    rust_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sdk_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    interface_version: Option<String>,
}

fn read_wasm(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Parse and print any non-fatal warnings to stderr, keeping stdout clean
/// for the JSON document.
fn parse_meta(wasm: &[u8], input: &Path) -> Result<ParsedContractMeta> {
    let parsed = parse_contract_metadata(wasm)
        .with_context(|| format!("failed to parse {}", input.display()))?;
    for warning in &parsed.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(parsed)
}
