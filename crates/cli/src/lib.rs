//! # Apilens CLI
//!
//! `apilens` — reverse-engineer an API catalog from recorded traffic.
//!
//! Stdout is reserved for JSON results; all logging goes to stderr.

use anyhow::{Context, Result};
use apilens_analyzer::Analyzer;
use apilens_catalog::{load, save, synthesize, ServiceInfo};
use apilens_ingest::{har, TraceIngestor};
use apilens_protocol::{EndpointGroup, RecordedExchange};
use apilens_validator::{Credentials, EndpointValidator, ValidatorConfig};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "apilens")]
#[command(about = "Reverse-engineer API catalogs from recorded traffic", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a recording and merge the result into a catalog
    Analyze(AnalyzeArgs),

    /// Probe catalog endpoints read-only with real credentials (opt-in)
    Validate(ValidateArgs),

    /// Author-time extraction recipe tools
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Recording file: a JSON array of recorded exchanges, or HAR with --har
    input: PathBuf,

    /// Treat the input as a browser HAR file
    #[arg(long)]
    har: bool,

    /// Seed URL anchoring service naming to the site the user asked about
    #[arg(long)]
    seed_url: Option<String>,

    /// Catalog file to merge into (defaults to <service>.catalog.json,
    /// created when absent)
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args)]
struct ValidateArgs {
    /// Catalog file to validate
    catalog: PathBuf,

    /// Override the catalog's base URL
    #[arg(long)]
    base_url: Option<String>,

    /// JSON credentials file: {"headers": {...}, "cookies": {...}}
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// TOML limits file (max_endpoints, batch_size, timeouts)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum RecipeCommands {
    /// Statically validate a recipe file, reporting every violation
    Validate {
        /// Recipe JSON file
        recipe: PathBuf,
    },

    /// Apply a recipe to a response body file
    Apply {
        /// Recipe JSON file
        recipe: PathBuf,

        /// Response body JSON file
        body: PathBuf,
    },
}

fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "warn"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} at {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid {what} at {}", path.display()))
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Validate(args) => run_validate(args).await,
        Commands::Recipe { command } => run_recipe(command),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read recording at {}", args.input.display()))?;
    let raw: Vec<RecordedExchange> = if args.har {
        har::parse(&text).context("failed to parse HAR recording")?
    } else {
        serde_json::from_str(&text)
            .context("recording must be a JSON array of recorded exchanges")?
    };

    let bundle = TraceIngestor::new().ingest(&raw, args.seed_url.as_deref());
    let report = Analyzer::new().analyze(&bundle);

    let catalog_path = args
        .catalog
        .unwrap_or_else(|| PathBuf::from(format!("{}.catalog.json", bundle.service)));
    let existing = load(&catalog_path)?;

    let info = ServiceInfo {
        service: report.service.clone(),
        base_url: report.base_url.clone(),
        base_urls: report.base_urls.clone(),
        auth_method: report.auth_method.clone(),
    };
    let outcome = synthesize(existing.as_ref(), &info, &report.groups, &report.edges);
    save(&outcome.catalog, &catalog_path)?;

    print_stdout(&serde_json::to_string_pretty(&json!({
        "service": outcome.catalog.service,
        "catalog": catalog_path.display().to_string(),
        "endpoints": outcome.catalog.endpoint_count(),
        "edges": outcome.catalog.edges.len(),
        "version": outcome.version,
        "previous_version": outcome.catalog.previous_version,
        "changed": outcome.changed,
        "diff": outcome.diff,
    }))?)
}

async fn run_validate(args: ValidateArgs) -> Result<()> {
    let catalog = load(&args.catalog)?
        .with_context(|| format!("no catalog at {}", args.catalog.display()))?;

    let base_url = args.base_url.unwrap_or_else(|| catalog.base_url.clone());
    let credentials: Credentials = match &args.credentials {
        Some(path) => read_json(path, "credentials file")?,
        None => Credentials::default(),
    };
    let config: ValidatorConfig = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("invalid validator config at {}", path.display()))?
        }
        None => ValidatorConfig::default(),
    };

    let groups: Vec<EndpointGroup> = catalog.endpoints.values().cloned().collect();
    let evidence = EndpointValidator::new(config)?
        .validate(&base_url, &groups, &credentials)
        .await;

    print_stdout(&serde_json::to_string_pretty(&evidence)?)
}

fn run_recipe(command: RecipeCommands) -> Result<()> {
    match command {
        RecipeCommands::Validate { recipe } => {
            let value: serde_json::Value = read_json(&recipe, "recipe")?;
            let errors = apilens_recipe::validate(&value);
            print_stdout(&serde_json::to_string_pretty(&json!({
                "valid": errors.is_empty(),
                "errors": errors,
            }))?)
        }
        RecipeCommands::Apply { recipe, body } => {
            let value: serde_json::Value = read_json(&recipe, "recipe")?;
            let errors = apilens_recipe::validate(&value);
            if !errors.is_empty() {
                anyhow::bail!("invalid recipe: {}", errors.join("; "));
            }
            let recipe: apilens_protocol::ExtractionRecipe =
                serde_json::from_value(value).context("recipe failed to deserialize")?;
            let body: serde_json::Value = read_json(&body, "body")?;

            // Inapplicable recipes are a fallback signal, not an error.
            match apilens_recipe::apply(&body, &recipe) {
                Some(result) => print_stdout(&serde_json::to_string_pretty(&json!({
                    "applied": true,
                    "result": result,
                }))?),
                None => print_stdout(&serde_json::to_string_pretty(&json!({
                    "applied": false,
                }))?),
            }
        }
    }
}
