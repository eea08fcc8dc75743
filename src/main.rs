//! Clusterforge CLI
//!
//! Usage: clusterforge [--dir DIR] [--config FILE] [-v...] <COMMAND>
//!
//! Commands:
//!   create   Produce a target and everything it depends on
//!   targets  List the available targets

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clusterforge::config::{self, LoadedConfig};
use clusterforge::infrastructure::TerraformProvisioner;
use clusterforge::{CreateOptions, CreateUseCase, Environment, StockContext, Target};

/// Clusterforge - cluster asset compiler
#[derive(Parser, Debug)]
#[command(name = "clusterforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output directory (defaults to the config's output.dir)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Config file (defaults to ~/.config/clusterforge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Produce a target and everything it depends on
    Create {
        #[arg(value_enum)]
        target: Target,
    },

    /// List the available targets
    Targets,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let environment = Arc::new(Environment::from_process());

    let loaded = config::resolve(cli.config.as_deref(), &environment)?;
    init_tracing(cli.verbose, &loaded.config.log.level);
    for warning in &loaded.warnings {
        tracing::warn!("{warning}");
    }

    match cli.command {
        Commands::Create { target } => create(target, cli.dir, &loaded, environment),
        Commands::Targets => {
            for target in Target::ALL {
                println!("{:<16} {}", target.cli_name(), target.description());
            }
            Ok(())
        }
    }
}

fn create(
    target: Target,
    dir: Option<PathBuf>,
    loaded: &LoadedConfig,
    environment: Arc<Environment>,
) -> Result<()> {
    let config = &loaded.config;
    let output_dir = dir.unwrap_or_else(|| config.output.dir.clone());

    let use_case = CreateUseCase::new(StockContext {
        environment,
        provisioner: Arc::new(TerraformProvisioner::new(&config.provisioner.binary)),
        templates_dir: config.provisioner.templates_dir.clone(),
    });
    let options = CreateOptions::new(target).with_output_dir(&output_dir);

    let result = use_case
        .execute(&options)
        .with_context(|| format!("failed to create {target} in {}", output_dir.display()))?;

    for entry in result.entries() {
        println!("{:<40} {}", entry.name, entry.origin);
    }
    println!(
        "{target}: {} generated, {} on disk, {} skipped",
        result.generated(),
        result.on_disk(),
        result.skipped()
    );
    Ok(())
}

fn init_tracing(verbose: u8, default_level: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_new(default_level).unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
