//! testdeck CLI - Main Entry Point

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use testdeck_cli::commands::{self, case, config, plan, resolve, script, Context};
use testdeck_cli::config::{expand_home, ConsoleConfig};
use testdeck_cli::output::{print_error, OutputFormat};

/// testdeck - test case, plan and script management console
#[derive(Parser)]
#[command(name = "testdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(long, env = "TESTDECK_CONFIG", default_value = "~/.testdeck/config.toml", global = true)]
    config: PathBuf,

    /// Store directory (overrides the config file)
    #[arg(long, env = "TESTDECK_STORE", global = true)]
    store: Option<PathBuf>,

    /// Output format (defaults to the config file's setting)
    #[arg(long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage test cases
    #[command(subcommand)]
    Case(case::CaseCommands),

    /// Order test cases by their preconditions
    Resolve(resolve::ResolveArgs),

    /// Manage test plans and runs
    #[command(subcommand)]
    Plan(plan::PlanCommands),

    /// Automation script batches
    #[command(subcommand)]
    Script(script::ScriptCommands),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(config::ConfigCommands),

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = expand_home(&cli.config);
    let mut config = ConsoleConfig::load(&config_path)?;
    if let Some(store) = cli.store {
        config.store_path = store;
    }
    config.store_path = expand_home(&config.store_path);
    debug!("Using store {}", config.store_path.display());

    let ctx = Context {
        format: cli.format.unwrap_or(config.default_format),
        config,
        config_path,
    };

    match cli.command {
        Commands::Case(cmd) => case::execute(cmd, &ctx)?,
        Commands::Resolve(args) => resolve::execute(args, &ctx)?,
        Commands::Plan(cmd) => plan::execute(cmd, &ctx)?,
        Commands::Script(cmd) => script::execute(cmd, &ctx)?,
        Commands::Config(cmd) => commands::config::execute(cmd, &ctx)?,
        Commands::Version => {
            println!("testdeck CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("testdeck-common v{}", testdeck_common::VERSION);
        }
    }

    Ok(())
}
