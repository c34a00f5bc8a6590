pub mod cli;

pub use cli::{
    build_cli_command, subcommand_usage, Cli, Commands, InstallArgs, ResolveArgs, UninstallArgs,
};
