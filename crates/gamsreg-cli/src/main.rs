use clap::Parser;
use gamsreg_cli::cli::{subcommand_usage, Cli};
use gamsreg_core::{load_config, ExitCode, GamsregConfig, ValidationError};
use std::process;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;

fn exit(code: ExitCode) -> ! {
    process::exit(code.into())
}

fn init_logging(cli: &Cli, config: &GamsregConfig) {
    let level = cli
        .log_level
        .or_else(|| config.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    // stdout carries --dry-run output, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

fn report(err: &anyhow::Error, subcommand: &str) {
    eprintln!("Error: {err:#}");
    if err.downcast_ref::<ValidationError>().is_some() {
        eprintln!();
        eprintln!("{}", subcommand_usage(subcommand));
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version are not failures; everything else is a
            // usage error and shares the validation exit status.
            let code = if err.use_stderr() {
                ExitCode::Failure
            } else {
                ExitCode::Success
            };
            let _ = err.print();
            exit(code);
        }
    };

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err}");
            exit(ExitCode::Failure);
        }
    };

    init_logging(&cli, &config);
    debug!(platform = %cli.platform, command = cli.command.name(), "starting");

    match commands::run(&cli, &config) {
        Ok(()) => exit(ExitCode::Success),
        Err(err) => {
            report(&err, cli.command.name());
            exit(ExitCode::Failure);
        }
    }
}
