mod config;
mod error;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use command_args_parser::TokenStream;
use serde::Serialize;
use tracing::info;

use crate::config::{load_document, load_validated};
use crate::error::{CliError, Result};

/// Output format for printed results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "args-probe")]
#[command(about = "Parse arguments against a command specification document")]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. debug, command_args_parser=trace).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse arguments against a specification document and print the result.
    Parse(ParseArgs),
    /// Validate one or more specification documents.
    Validate(ValidateArgs),
    /// Print the classified token stream for the given arguments.
    Tokens(TokensArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Specification document (JSON, or YAML by extension).
    #[arg(long)]
    spec: PathBuf,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to parse; put them after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Specification documents to check.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct TokensArgs {
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Arguments to classify; put them after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Validate(args) => run_validate(args),
        Command::Tokens(args) => run_tokens(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn run_parse(args: ParseArgs) -> Result<()> {
    let document = load_document(&args.spec)?;
    let parser = command_args_parser::Parser::new(document.command)?;
    info!(command = %parser.spec().name, count = args.args.len(), "parsing arguments");

    let parsed = parser.parse(args.args)?;
    print_output(&parsed, args.format)
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    for path in &args.inputs {
        let document = load_validated(path)?;
        info!(path = %path.display(), command = %document.command.name, "specification valid");
    }
    println!("Validated {} specification file(s).", args.inputs.len());
    Ok(())
}

fn run_tokens(args: TokensArgs) -> Result<()> {
    let stream = TokenStream::new(args.args);
    print_output(&stream, args.format)
}

fn print_output<T: Serialize>(value: &T, format: CliOutputFormat) -> Result<()> {
    let raw = match format {
        CliOutputFormat::Json => serde_json::to_string_pretty(value)?,
        CliOutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", raw.trim_end());
    Ok(())
}
