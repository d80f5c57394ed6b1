use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use dsomig::banner::{AutoConfirm, Confirm, MSG_ABORTED, TermConfirm, confirm_start};
use dsomig::config::{CliArgs, FileConfig, MigrateConfig, resolve_log_filter};
use dsomig::migrator::Migrator;
use dsomig::paths::resolve_user_shortcut_path;
use dsomig_log as logger;

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let file_config = match &cli_args.config {
        Some(path) => FileConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => FileConfig::default(),
    };

    logger::init_console_logger(&resolve_log_filter(&cli_args, &file_config))
        .context("Failed to initialize console logger")?;

    if let Err(e) = ctrlc::set_handler(|| {
        logger::exception(MSG_ABORTED);
        process::exit(0);
    }) {
        logger::debug(&format!("Interrupt handler not installed: {e}"));
    }

    if let Err(e) = run_session(&cli_args, &file_config) {
        logger::exception(&format!("Unexpected error occurred: {e:#}"));
    }
    Ok(())
}

fn run_session(cli_args: &CliArgs, file_config: &FileConfig) -> Result<()> {
    let term = Term::stdout();
    let mut confirm: Box<dyn Confirm> = if cli_args.yes {
        Box::new(AutoConfirm)
    } else {
        Box::new(TermConfirm::new(term.clone()))
    };
    if !confirm_start(&term, confirm.as_mut()).context("Console interaction failed")? {
        return Ok(());
    }

    let config = MigrateConfig::resolve(cli_args, file_config, resolve_user_shortcut_path);
    let migrator = Migrator::new(&config.source, &config.destination, config.shortcut.clone())
        .with_options(config.migration_options());
    migrator.perform_migration();
    Ok(())
}
