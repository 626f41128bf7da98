use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use scpgen_core::config::{Config, ConfigPaths};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(
    name = "scpgen",
    version,
    about = "Derive service control policies from scanner usage reports"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        force: bool,
    },
    /// Generate a policy from a usage report
    Generate {
        /// Allow or Deny (any case)
        #[arg(long = "type", value_name = "MODE")]
        mode: Option<String>,
        /// Scanner usage report to read
        #[arg(long = "fileloc", value_name = "PATH")]
        input: Option<PathBuf>,
        /// Decision threshold for API call counts
        #[arg(long, allow_negative_numbers = true)]
        threshold: Option<i64>,
        /// Where to write the policy document
        #[arg(long)]
        output: Option<PathBuf>,
        /// Fail when the report file holds more than one report
        #[arg(long)]
        strict_single_report: bool,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    Config {
        #[arg(long)]
        print: bool,
    },
}

fn main() -> Result<()> {
    logging::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => init_config(path, force),
        Commands::Generate {
            mode,
            input,
            threshold,
            output,
            strict_single_report,
            json,
        } => commands::generate::execute(commands::generate::GenerateInputs {
            config_path: cli.config,
            overrides: commands::generate::Overrides {
                mode,
                input,
                threshold,
                output,
                strict_single_report,
            },
            json,
        }),
        Commands::Config { print } => {
            if print {
                commands::config::print_effective(cli.config)
            } else {
                Ok(())
            }
        }
    }
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => ConfigPaths::resolve()?.config_path,
    };
    if config_path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    let config = Config::default_config();
    config.save(&config_path)?;
    println!("Config written to {}", config_path.display());
    Ok(())
}
