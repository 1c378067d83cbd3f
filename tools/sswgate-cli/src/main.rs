//! SSW bridge command line tool
//!
//! Provides commands for working with quotation payloads offline:
//! - validate: normalize a JSON payload and report every violated rule
//! - envelope: print the masked wire envelope a payload would produce
//! - classify: extract and classify a saved raw reply body

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use sswgate_core::{
    normalize_collect, normalize_quote, validate_collect, validate_quote, NormalizeOptions,
};
use sswgate_wire::{collect_envelope, extract_reply, mask_envelope, quote_envelope, CallResult};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sswgate")]
#[command(version)]
#[command(about = "SSW bridge tool - validate payloads, inspect envelopes, classify replies")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize and validate a JSON payload file
    #[command(about = "Normalize a payload and report every violated rule")]
    Validate {
        /// Path to the JSON payload to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Treat the file as a collection request (default is quotation)
        #[arg(long, short)]
        collect: bool,
    },

    /// Print the wire envelope a payload would produce
    #[command(about = "Print the masked wire envelope for a payload")]
    Envelope {
        /// Path to the JSON payload
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Build the collection envelope (default is quotation)
        #[arg(long, short)]
        collect: bool,
    },

    /// Classify a saved raw reply body
    #[command(about = "Extract and classify a raw SOAP reply file")]
    Classify {
        /// Path to the raw reply body
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file, collect } => handle_validate(&file, collect),
        Commands::Envelope { file, collect } => handle_envelope(&file, collect),
        Commands::Classify { file } => handle_classify(&file),
    }
}

fn read_payload(file: &PathBuf) -> Result<serde_json::Value> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse {} as JSON", file.display()))
}

fn handle_validate(file: &PathBuf, collect: bool) -> Result<()> {
    let payload = read_payload(file)?;

    let violations = if collect {
        validate_collect(&normalize_collect(&payload))
    } else {
        validate_quote(&normalize_quote(&payload, &NormalizeOptions::default()))
    };

    if violations.is_empty() {
        println!("Valid {} payload", if collect { "collection" } else { "quotation" });
        return Ok(());
    }

    for violation in &violations {
        eprintln!("- {violation}");
    }
    anyhow::bail!("{} rule(s) violated", violations.len())
}

fn handle_envelope(file: &PathBuf, collect: bool) -> Result<()> {
    let payload = read_payload(file)?;

    let body = if collect {
        collect_envelope(&normalize_collect(&payload))
    } else {
        quote_envelope(&normalize_quote(&payload, &NormalizeOptions::default()))
    };

    println!("{}", mask_envelope(&body));
    Ok(())
}

fn handle_classify(file: &PathBuf) -> Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    let output = match extract_reply(&raw) {
        Ok(reply) => match sswgate_wire::classify(reply) {
            CallResult::Success(q) => {
                let mut body = json!({
                    "ok": true,
                    "freightValue": q.freight_value,
                    "deadlineDays": q.deadline_days,
                    "quotationNumber": q.quotation_number,
                    "token": q.token,
                    "message": q.message,
                });
                if !q.protocol.is_empty() {
                    body["protocol"] = json!(q.protocol);
                }
                body
            }
            CallResult::Business(f) => json!({
                "ok": false,
                "outcomeCode": f.code,
                "message": f.message,
                "authorization": f.authorization,
            }),
        },
        Err(err) => json!({
            "ok": false,
            "reason": err.to_string(),
        }),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
