mod commands;
mod logging;

use clap::{Parser, Subcommand};
use commands::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apigen")]
#[command(about = "Compile a type graph into an OpenAPI document")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the OpenAPI document
    Generate {
        /// Generator configuration
        #[arg(long, short, default_value = "apigen.toml")]
        config: PathBuf,

        /// Type graph (YAML or JSON)
        #[arg(long, short)]
        graph: PathBuf,

        /// Output file
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format; inferred from the output extension when omitted
        #[arg(long, short, value_enum)]
        format: Option<Format>,
    },

    /// Print scanned components, polymorphic bases and operations
    Inspect {
        /// Generator configuration
        #[arg(long, short, default_value = "apigen.toml")]
        config: PathBuf,

        /// Type graph (YAML or JSON)
        #[arg(long, short)]
        graph: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum Format {
    Json,
    Yaml,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Commands::Generate {
            config,
            graph,
            output,
            format,
        } => {
            generate::run(&config, &graph, output, format.map(Into::into))?;
        }
        Commands::Inspect { config, graph, json } => {
            inspect::run(&config, &graph, json)?;
        }
    }

    Ok(())
}

impl From<Format> for apigen::OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => apigen::OutputFormat::Json,
            Format::Yaml => apigen::OutputFormat::Yaml,
        }
    }
}
