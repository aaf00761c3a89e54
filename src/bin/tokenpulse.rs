//! tokenpulse – run the analyzers over an already-fetched JSON bundle

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use tokenpulse::config::{generate_commented_config_template, Config, DEFAULT_CONFIG_FILE};
use tokenpulse::engine::{AnalysisEngine, AnalysisRequest};
use tokenpulse::utils::fs::{read_json, write_json};
use tokenpulse::utils::init_logging;

#[derive(Debug, Parser)]
#[command(name = "tokenpulse", author, version, about = "On-chain token feature and anomaly scoring", long_about = None)]
struct Args {
    /// Print the default configuration to stdout and exit
    #[arg(long)]
    print_default_config: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a JSON request bundle and emit the report as JSON
    Analyze {
        /// Request bundle (JSON)
        #[arg(short, long, value_name = "JSON")]
        input: PathBuf,
        /// Write the report here instead of stdout
        #[arg(short, long, value_name = "JSON")]
        output: Option<PathBuf>,
        /// Configuration file (TOML); default locations are searched when omitted
        #[arg(short, long, env = "TOKENPULSE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
        /// Write the annotated template instead of the bare defaults
        #[arg(long)]
        commented: bool,
        /// Overwrite if the file already exists
        #[arg(short, long)]
        force: bool,
    },
    /// Load and validate a configuration file
    CheckConfig {
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        | Some(p) => Config::from_file(p)
            .with_context(|| format!("Failed to load configuration from {}", p.display()))?,
        | None => Config::load().context("Failed to load configuration")?,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn analyze(input: &Path, output: Option<&Path>, config: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    init_logging(&config.logging);

    let request: AnalysisRequest = read_json(input)?;
    let engine = AnalysisEngine::new(config)?;
    let report = engine
        .run(&request)
        .with_context(|| format!("Analysis of {} failed", input.display()))?;

    match output {
        | Some(path) => {
            write_json(path, &report)?;
            log::info!("report written to {}", path.display());
        }
        | None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn init(output: &Path, commented: bool, force: bool) -> Result<()> {
    if output.exists() && !force {
        bail!("Config file {} exists. Use --force to overwrite.", output.display());
    }

    if commented {
        generate_commented_config_template(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    } else {
        Config::default().save(output)?;
    }
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}

fn check_config(path: &Path) -> Result<()> {
    load_config(Some(path))?;
    println!("{} is valid", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        println!("{}", Config::default_toml()?);
        return Ok(());
    }

    match &args.command {
        | Some(Command::Analyze { input, output, config }) => {
            analyze(input, output.as_deref(), config.as_deref())
        }
        | Some(Command::Init { output, commented, force }) => init(output, *commented, *force),
        | Some(Command::CheckConfig { config }) => check_config(config),
        | None => {
            bail!("no command given; run `tokenpulse --help` for usage")
        }
    }
}
