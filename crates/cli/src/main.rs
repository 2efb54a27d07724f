mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use prjcomp_lib::consts::ROOT_DESCRIPTOR_NAME;

use crate::output::OutputFormat;

/// prjcomp - compose native build descriptors into one resolved build plan
#[derive(Parser)]
#[command(name = "prjcomp")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable debug logging (RUST_LOG takes precedence)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Compose a root descriptor and print the resulting plan
  Plan {
    /// Path to the root descriptor
    #[arg(default_value = ROOT_DESCRIPTOR_NAME)]
    file: PathBuf,

    /// Active toolset name (e.g. gcc, clang)
    #[arg(short, long, env = "PRJCOMP_TOOLSET")]
    toolset: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
  },

  /// Show which built-in toolset rules fire for a toolset
  Rules {
    /// Active toolset name (e.g. gcc, clang)
    #[arg(short, long, env = "PRJCOMP_TOOLSET")]
    toolset: String,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Plan { file, toolset, format } => cmd::cmd_plan(&file, &toolset, format),
    Commands::Rules { toolset } => cmd::cmd_rules(&toolset),
  }
}
