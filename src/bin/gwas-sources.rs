//! gwas-sources CLI — query GWAS evidence sources.
//!
//! Usage:
//!   gwas-sources sources
//!   gwas-sources run [--disease NAME]... [--iri IRI]... [--source NAME]...
//!   gwas-sources lookup --file PATH --snp RSID...
//!
//! Records are written to stdout as JSON; logs go to stderr.

use clap::{Parser, Subcommand};
use gwas_sources::{
    GwasConfig, HttpFetcher, OlsTermLookup, SourceQuery, SourceRegistry, SummaryStatsFile,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "gwas-sources",
    version,
    about = "Normalized GWAS associations from the GWAS Catalog and flat-file databases"
)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available sources
    Sources,
    /// Collect associations for diseases or EFO IRIs
    Run {
        /// Disease / trait name (repeatable)
        #[arg(long = "disease")]
        diseases: Vec<String>,
        /// EFO IRI (repeatable)
        #[arg(long = "iri")]
        iris: Vec<String>,
        /// Source display name, underscores for spaces (repeatable; default all)
        #[arg(long = "source")]
        sources: Vec<String>,
        /// Directory holding the flat-file databases
        #[arg(long)]
        databases_dir: Option<PathBuf>,
        /// Generic summary-statistics file
        #[arg(long)]
        summary_stats: Option<PathBuf>,
        /// P-value cutoff for summary statistics
        #[arg(long)]
        pvalue_cutoff: Option<f64>,
    },
    /// Look up specific SNPs in a summary-statistics file
    Lookup {
        /// Summary-statistics file
        #[arg(long)]
        file: PathBuf,
        /// dbSNP id (repeatable)
        #[arg(long = "snp", required = true)]
        snps: Vec<String>,
    },
}

/// Default configuration path (~/.config/gwas-sources/config.yaml)
fn default_config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"));
    config_dir.join("gwas-sources").join("config.yaml")
}

fn load_config(path: Option<PathBuf>) -> Result<GwasConfig, String> {
    match path {
        Some(path) => GwasConfig::load(&path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e)),
        None => {
            let path = default_config_path();
            if path.exists() {
                GwasConfig::load(&path)
                    .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))
            } else {
                Ok(GwasConfig::default())
            }
        }
    }
}

fn init_tracing(level: &str) -> Result<(), String> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn build_registry(config: &GwasConfig) -> Result<SourceRegistry, String> {
    let fetcher =
        Arc::new(HttpFetcher::new().map_err(|e| format!("Failed to build HTTP client: {}", e))?);
    let efo = Arc::new(OlsTermLookup::new(fetcher.clone(), config.ols_server.clone()));
    Ok(SourceRegistry::with_defaults(config, fetcher, efo))
}

fn cmd_sources(config: &GwasConfig) -> i32 {
    let registry = match build_registry(config) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    for name in registry.display_names() {
        println!("{}", name);
    }
    0
}

async fn cmd_run(config: &GwasConfig, query: &SourceQuery) -> i32 {
    let registry = match build_registry(config) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let result = registry.gather(config.sources.as_slice(), query).await;
    for (source, error) in &result.errors {
        eprintln!("Error: {}: {}", source, error);
    }
    if result.has_fatal() {
        return 1;
    }
    print_json(&result.associations)
}

async fn cmd_lookup(config: &GwasConfig, file: PathBuf, snps: Vec<String>) -> i32 {
    let source = SummaryStatsFile::new(
        Some(file),
        config.pvalue_cutoff,
        config.summary_stats_study.clone(),
    );
    let wanted: BTreeSet<String> = snps.into_iter().collect();

    match source.lookup(&wanted).await {
        Ok(lookup) => {
            for snp in &lookup.missing {
                eprintln!("Not found: {}", snp);
            }
            print_json(&lookup.found)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Sources => cmd_sources(&config),
        Commands::Run {
            diseases,
            iris,
            sources,
            databases_dir,
            summary_stats,
            pvalue_cutoff,
        } => {
            if let Some(dir) = databases_dir {
                config.databases_dir = dir;
            }
            if summary_stats.is_some() {
                config.summary_stats_file = summary_stats;
            }
            if let Some(cutoff) = pvalue_cutoff {
                config.pvalue_cutoff = cutoff;
            }
            if !sources.is_empty() {
                config.sources = sources;
            }
            cmd_run(&config, &SourceQuery::new(diseases, iris)).await
        }
        Commands::Lookup { file, snps } => cmd_lookup(&config, file, snps).await,
    };

    std::process::exit(code);
}
