mod check;
mod schema;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use std::{fs, path::Path, path::PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use crate::schema::{DEFAULT_SCHEMA_NAME, LoadedSchema};

#[derive(Parser)]
#[command(name = "flagfold")]
#[command(version, about = "Parse argument lists against a typed defaults schema", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter flagfold.json schema
    Init(InitArgs),

    /// Parse tokens against a schema and print the result as JSON
    Parse(ParseArgs),

    /// Validate a schema and list every spelling it accepts
    Check(CheckArgs),
}

#[derive(Parser)]
struct InitArgs {
    /// Project directory (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Overwrite an existing schema
    #[arg(long)]
    force: bool,
}

#[derive(Parser)]
struct ParseArgs {
    /// Path to the schema (default: ./flagfold.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Print the result on a single line
    #[arg(long)]
    compact: bool,

    /// Tokens to parse, after `--`
    #[arg(last = true, value_name = "TOKENS")]
    tokens: Vec<String>,
}

#[derive(Parser)]
struct CheckArgs {
    /// Path to the schema (default: ./flagfold.json)
    #[arg(short, long, value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Only output JSON (no human-readable output)
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init(args) => init(args),
        Commands::Parse(args) => parse_command(args),
        Commands::Check(args) => check_command(args),
    }
}

fn init(args: InitArgs) -> Result<()> {
    tracing::debug!("executing init command");

    let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    if dir.join(DEFAULT_SCHEMA_NAME).exists() && !args.force {
        bail!("{DEFAULT_SCHEMA_NAME} already exists in {}", dir.display());
    }

    let path = schema::write_default_schema(&dir, args.force)?;

    eprintln!("Created: {}", path.display());
    eprintln!("\nNext steps:");
    eprintln!("  1. Edit {DEFAULT_SCHEMA_NAME} to describe your options");
    eprintln!("  2. Run: flagfold check");
    eprintln!("  3. Run: flagfold parse -- --dry-run input.txt");

    Ok(())
}

fn require_schema(path: Option<&Path>) -> Result<LoadedSchema> {
    schema::load_schema(path)?.ok_or_else(|| {
        anyhow!("no {DEFAULT_SCHEMA_NAME} found; run `flagfold init` or pass --schema")
    })
}

fn parse_command(args: ParseArgs) -> Result<()> {
    tracing::debug!("executing parse command");

    let loaded = require_schema(args.schema.as_deref())?;
    let schema = &loaded.schema;
    let parser = flagfold_argparse::Parser::new(&schema.defaults, &schema.options)
        .with_context(|| format!("invalid schema: {}", loaded.path.display()))?;
    tracing::debug!(
        fields = schema.defaults.len(),
        spellings = parser.names().len(),
        tokens = args.tokens.len(),
        "name table built"
    );

    let parsed = parser.parse(&args.tokens)?;

    let json = if args.compact {
        serde_json::to_string(&parsed)?
    } else {
        serde_json::to_string_pretty(&parsed)?
    };
    println!("{json}");

    Ok(())
}

fn check_command(args: CheckArgs) -> Result<()> {
    tracing::debug!("executing check command");

    let loaded = require_schema(args.schema.as_deref())?;
    let report = check::check_schema(&loaded)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    eprintln!();
    eprintln!("=== Schema Check Results ===");
    eprintln!("Schema: {} ({})", report.name, report.schema);
    eprintln!("Fields: {}", report.fields.len());
    for field in &report.fields {
        eprintln!("  {} ({}, default: {})", field.name, field.kind, field.default);
    }

    eprintln!();
    eprintln!("Spellings:");
    let width = report
        .spellings
        .iter()
        .map(|s| s.spelling.len())
        .max()
        .unwrap_or(0);
    for s in &report.spellings {
        if s.negated {
            eprintln!("  {:width$}  {} (negated)", s.spelling, s.field, width = width);
        } else {
            eprintln!("  {:width$}  {}", s.spelling, s.field, width = width);
        }
    }

    if !report.exclusives.is_empty() {
        eprintln!();
        eprintln!("Exclusive groups:");
        for group in &report.exclusives {
            eprintln!("  {}", group.join(", "));
        }
    }

    if !report.unknown_exclusive_fields.is_empty() {
        eprintln!();
        eprintln!(
            "WARNING: {} exclusive field(s) not among the defaults:",
            report.unknown_exclusive_fields.len()
        );
        for field in &report.unknown_exclusive_fields {
            eprintln!("  - {}", field);
        }
    }

    if !report.shadowed_aliases.is_empty() {
        eprintln!();
        eprintln!(
            "WARNING: {} alias(es) shadowed by existing spellings:",
            report.shadowed_aliases.len()
        );
        for alias in &report.shadowed_aliases {
            eprintln!("  - {}", alias);
        }
    } else {
        eprintln!();
        eprintln!("OK: schema is valid");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
