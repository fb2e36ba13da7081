use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod corpus;
mod frontmatter;
mod index;
mod validator;

use config::Config;

#[derive(Parser)]
#[command(name = "aiprompts", version)]
#[command(about = "Validate and index AI prompt and rule files", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the prompt folder layout and metadata files
    Validate {
        /// Prompt root directory (default: from config, "prompts")
        #[arg(long)]
        root: Option<PathBuf>,

        /// Path to config file (defaults to ./aiprompts.toml or ~/.config/aiprompts/config.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Flatten all prompts into a single JSON index
    Build {
        /// Prompt root directory (default: from config, "prompts")
        #[arg(long)]
        root: Option<PathBuf>,

        /// Output file (default: from config, "dist/prompts.json")
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Path to config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run structure validation first and abort on errors
        #[arg(long)]
        validate: bool,
    },
    /// Print the parsed front matter and body of one markdown file
    Inspect {
        /// Markdown file to parse
        path: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Validate { root, config } => {
            let config = Config::load_with_path(config.as_deref())?.with_overrides(root, None);
            cli::validate::run(&config)?;
        }
        Commands::Build {
            root,
            output,
            config,
            validate,
        } => {
            let config = Config::load_with_path(config.as_deref())?.with_overrides(root, output);
            cli::build::run(&config, validate)?;
        }
        Commands::Inspect { path } => {
            cli::inspect::run(&path)?;
        }
    }

    Ok(())
}
