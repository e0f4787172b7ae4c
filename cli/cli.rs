mod cli_args;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::process;

use cli_args::Cli;
use codepack_core::{self as core, AppError, Config, ConsoleReporter, NullReporter, ProgressReporter};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;
    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args) {
        Ok(_) => {
            log::info!("Run finished successfully.");
            0
        }
        Err(e) => {
            let core_err = e.downcast_ref::<AppError>();
            let exit_code = match core_err {
                // The only fatal pipeline condition: the artifact itself.
                Some(AppError::ArtifactWrite { .. }) => 2,
                Some(_) => 1,
                None => 1,
            };
            if !quiet || exit_code == 2 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Run failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli) -> Result<()> {
    let project_root = Config::determine_project_root(cli.project_root.as_ref())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = Config {
        output_dir: cli.output_dir.clone(),
        flat_structure: cli.flat_structure,
        ..Config::default()
    };

    let renderer = core::select_renderer(&config);
    let reporter: Box<dyn ProgressReporter> = if cli.quiet {
        Box::new(NullReporter)
    } else {
        Box::new(ConsoleReporter)
    };

    core::run(&project_root, &config, renderer.as_ref(), reporter.as_ref())
        .context("Context assembly failed")?;
    Ok(())
}
