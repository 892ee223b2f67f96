use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use backprop::{sanity, SanityConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let paths: Vec<String> = env::args().skip(1).collect();
    let configs = if paths.is_empty() {
        SanityConfig::presets()
    } else {
        paths
            .iter()
            .map(|path| {
                SanityConfig::from_file(path).with_context(|| format!("loading config {path}"))
            })
            .collect::<Result<Vec<SanityConfig>>>()?
    };

    let mut failed = 0;
    for config in configs.iter() {
        let report = sanity::run(config)
            .with_context(|| format!("running sanity check {}", config.name))?;

        if report.passed() {
            info!("{}: {report}", config.name);
        } else {
            error!("{}: {report}", config.name);
            failed += 1;
        }
    }

    if failed > 0 {
        error!("{failed} of {} sanity checks failed", configs.len());
        return Ok(ExitCode::FAILURE);
    }

    info!("all {} sanity checks passed", configs.len());
    Ok(ExitCode::SUCCESS)
}
