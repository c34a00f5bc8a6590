use clap::{Args, CommandFactory, Parser, Subcommand, ValueHint};
use gamsreg_core::Platform;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gamsreg",
    author,
    version,
    about = "Register third-party solvers with a GAMS system directory",
    long_about = None
)]
pub struct Cli {
    /// Set the logging level (overrides the config file)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Configuration file (default: <config dir>/gamsreg/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// File naming convention of the GAMS system directory (unix, windows)
    #[arg(long, global = true, default_value_t = Platform::current())]
    pub platform: Platform,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add (or replace) a solver entry in the solver registry
    Install(InstallArgs),
    /// Remove a solver entry from the solver registry
    Uninstall(UninstallArgs),
    /// Rewrite a gamsconfig.yaml to reference installed libraries
    Resolve(ResolveArgs),
    /// List the solver entries of a registry
    List {
        /// GAMS system directory
        #[arg(value_hint = ValueHint::DirPath)]
        sysdir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// GAMS system directory
    #[arg(value_hint = ValueHint::DirPath)]
    pub sysdir: PathBuf,
    /// Solver library, or the libtool archive (.la) describing it
    #[arg(value_hint = ValueHint::FilePath)]
    pub library: PathBuf,
    /// Name under which to reach the solver in GAMS
    pub solver_name: String,
    /// 3-letter solver identifier
    pub solver_id: String,
    /// Model types the solver handles, e.g. "LP MIP RMIP"
    pub model_types: String,
    /// Dictionary type (5 = have dictionary, 0 = no dictionary) [default: 5]
    pub dict_type: Option<String>,
    /// Options definition file to install into the system directory
    #[arg(value_hint = ValueHint::FilePath)]
    pub optdef: Option<PathBuf>,
    /// Print the patched registry instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// GAMS system directory
    #[arg(value_hint = ValueHint::DirPath)]
    pub sysdir: PathBuf,
    /// Name of the solver to uninstall
    pub solver_name: String,
    /// Options definition file to remove from the system directory
    pub optdef: Option<PathBuf>,
    /// Print the patched registry instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Manifest to rewrite
    #[arg(value_hint = ValueHint::FilePath)]
    pub manifest: PathBuf,
    /// Directory receiving the rewritten gamsconfig.yaml
    #[arg(value_hint = ValueHint::DirPath)]
    pub install_dir: PathBuf,
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Install(_) => "install",
            Commands::Uninstall(_) => "uninstall",
            Commands::Resolve(_) => "resolve",
            Commands::List { .. } => "list",
        }
    }
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}

/// Usage line of one subcommand, for error reports.
pub fn subcommand_usage(name: &str) -> String {
    let mut command = build_cli_command();
    match command.find_subcommand_mut(name) {
        Some(sub) => sub.render_usage().to_string(),
        None => command.render_usage().to_string(),
    }
}
