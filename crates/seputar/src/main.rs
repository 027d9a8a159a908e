//! Seputar CLI - documentation site checker.
//!
//! Provides commands for:
//! - `check`: Build the site model and report every problem
//! - `routes`: Print the route table
//! - `nav`: Print the navigation of a topic sidebar as JSON

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, NavArgs, RoutesArgs};
use output::Output;

/// Seputar - documentation site checker.
#[derive(Parser)]
#[command(name = "seputar", version, about)]
struct Cli {
    /// Enable verbose output (INFO level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check topics, sidebars, routes and links.
    Check(CheckArgs),
    /// Print the route table.
    Routes(RoutesArgs),
    /// Print the navigation of a topic sidebar as JSON.
    Nav(NavArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check(args) => args.execute(&output),
        Commands::Routes(args) => args.execute(&output),
        Commands::Nav(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["seputar", "check", "--verbose"]).unwrap();

        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Check(_)));
    }

    #[test]
    fn test_strict_and_permissive_conflict() {
        let result = Cli::try_parse_from(["seputar", "check", "--strict", "--permissive"]);

        assert!(result.is_err());
    }
}
