//! Entry point for the declarative-to-C# compiler CLI.

use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use declcs::compiler;
use declcs::core::config::{CompilerConfig, PipelineStage};

/// Compiles a small XML-shaped declarative language into C# source files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the input declaration file.
    input_file: PathBuf,

    /// Directory generated C# files are written to.
    #[arg(short, long, default_value = "generated")]
    output_dir: PathBuf,

    /// Stop the pipeline after the named stage, for debugging.
    #[arg(long, value_enum)]
    max_function: Option<PipelineStage>,

    /// Turn debugging information on.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    info!("Starting compiler...");

    let config = CompilerConfig::new(cli.input_file, cli.output_dir, cli.max_function, cli.verbose);

    if let Err(err) = compiler::run(&config) {
        error!("{}", err);
        return Err(err.into());
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}
