//! rusty-safe-verify: check a Safe transaction hash and its owner signatures

mod cli;
mod output;

use std::process::ExitCode;

use clap::Parser;
use eyre::{bail, Result, WrapErr};
use rusty_safe_verify_adapters::{network_verifier, VerifyAdapterConfig};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // stderr keeps stdout clean for --json
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let mut cfg = VerifyAdapterConfig::from_env();
    if let Some(ms) = cli.timeout_ms {
        cfg.http_timeout_ms = ms;
    }
    if let Some(url) = cli.gateway_url {
        cfg.gateway_base_url = url;
    }
    cfg.rpc_overrides.extend(cli.rpc_urls);

    let verifier = network_verifier(cfg).wrap_err("failed to set up network clients")?;

    tracing::info!(reference = %cli.reference, "verifying Safe transaction");
    let result = tokio::select! {
        result = verifier.verify(&cli.reference) => {
            result.wrap_err_with(|| format!("cannot verify {}", cli.reference))?
        }
        _ = tokio::signal::ctrl_c() => bail!("verification cancelled"),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).wrap_err("failed to serialize result")?
        );
    } else {
        let mut report = String::new();
        output::write_report(&mut report, &result).wrap_err("failed to render report")?;
        print!("{report}");
    }

    Ok(if result.all_verified() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
