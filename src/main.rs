use std::process::exit;

use clap::Parser;
use gitlab_runners::client::GitlabApi;

use crate::{
    cli::{execute, Args, Command},
    config::{default_config_path, load_config, save_config, AppConfig},
    logging::{init_logging, LoggingConfig},
    result::AppError,
};

mod cli;
mod config;
mod logging;
mod result;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = args.config.unwrap_or_else(default_config_path);

    if args.print_config_path {
        println!("{}", config_path.display());
        exit(0);
    }

    let Some(command) = args.command else {
        eprintln!("No command given; see `glrunners --help`.");
        exit(2);
    };

    if let Command::Configure { url, token, log_level } = command {
        let config = AppConfig { gitlab_url: url, gitlab_token: token, log_level };
        config.validate().map_err(AppError::InvalidConfig)?;
        save_config(&config_path, &config)?;
        println!("Configuration written to {}", config_path.display());
        return Ok(());
    }

    let debug = std::env::var("GLRUNNERS_DEBUG").is_ok();
    let config = load_config(&config_path)?;

    let mut logging_config = LoggingConfig::from_env();
    if let Some(log_level) = &config.log_level {
        logging_config = logging_config.with_level(log_level);
    }
    let _log_guard = init_logging(logging_config)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), config = %config_path.display(), "glrunners starting up");

    let api = GitlabApi::new(config.client_config(debug)?).map_err(AppError::from)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::GeneralError(format!("Failed to create runtime: {e}")))?;

    let output = rt.block_on(execute(&api, command))?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
