//! termfreq - main entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use termfreq::{App, AppOptions, Cli, Command, Session};
use termfreq_common::init_logging;
use termfreq_config::{Config, ConfigLoader};
use tracing::info;

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(language) = &cli.language {
        config.language = language.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Logs go to stderr so stdout carries only results
    init_logging(&config.logging).context("Failed to initialize logging")?;
    info!("Starting termfreq {}", env!("CARGO_PKG_VERSION"));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Run {
            query,
            output,
            no_table,
            no_export,
        } => {
            let app = App::new(config, AppOptions::from(&output))?;
            let spec = app.query_spec(&query)?;
            app.run_once(&mut out, &spec, !no_table, !no_export).await?;
        }
        Command::Interactive { query, output } => {
            let app = App::new(config, AppOptions::from(&output))?;
            let spec = app.query_spec(&query)?;
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            Session::new(&app, spec).run(input, &mut out).await?;
        }
    }

    out.flush()?;
    Ok(())
}
