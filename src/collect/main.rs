//! School collection CLI.
//!
//! Tiles a country, pages through the maps search for each tile, keeps
//! general-education schools and writes them to CSV and JSON.

mod interactive;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use school_collector::config::{DEFAULT_LANG, DEFAULT_QUERY, DEFAULT_REGION, DEFAULT_TILES_PER_AXIS};
use school_collector::export::{export_all, ExportPaths};
use school_collector::regions::find_region;
use school_collector::{
    run_collection, ApiKey, ClassifierRules, CollectionReport, CollectorConfig, FetchSettings,
    SchoolClassifier, YandexClient,
};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug, Clone)]
#[command(name = "collect")]
#[command(about = "Collect general-education schools from the Yandex Maps search API")]
struct Args {
    /// Country code to search
    #[arg(long, env = "COUNTRY", default_value = DEFAULT_REGION)]
    country: String,

    /// Tiles per axis (more tiles => more requests, better coverage)
    #[arg(long, env = "TILES_PER_AXIS", default_value_t = DEFAULT_TILES_PER_AXIS)]
    tiles: usize,

    /// Directory for the CSV/JSON output
    #[arg(long, env = "OUTPUT_DIR", default_value = "output")]
    output_dir: PathBuf,

    /// Keep only general-education schools (default on; STRICT_SCHOOL_FILTER=0 disables)
    #[arg(long, overrides_with = "no_strict")]
    strict: bool,

    /// Disable the school filter
    #[arg(long = "no-strict")]
    no_strict: bool,

    /// Yandex Maps Search API key
    #[arg(long, env = "YANDEX_MAPS_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Result language
    #[arg(long, env = "YANDEX_LANG", default_value = DEFAULT_LANG)]
    lang: String,

    /// Search text
    #[arg(long, default_value = DEFAULT_QUERY)]
    query: String,

    /// Results per page (max 50)
    #[arg(long, default_value = "50")]
    page_size: u32,

    /// Pages fetched per tile at most
    #[arg(long, default_value = "20")]
    max_pages: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// TOML file replacing the built-in classifier vocabulary
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Also reject schools whose address does not name the country
    #[arg(long)]
    enforce_address_country: bool,

    /// Choose country and options from prompts
    #[arg(long)]
    interactive: bool,
}

impl Args {
    fn strict(&self) -> bool {
        if self.no_strict {
            return false;
        }
        if self.strict {
            return true;
        }
        std::env::var("STRICT_SCHOOL_FILTER").map_or(true, |v| v.trim() != "0")
    }
}

/// A fully resolved collection run.
pub(crate) struct RunRequest {
    pub config: CollectorConfig,
    pub rules: ClassifierRules,
    pub output_dir: PathBuf,
    pub api_key: ApiKey,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let no_cli_args = std::env::args_os().len() == 1;
    let args = Args::parse();

    if args.interactive || no_cli_args {
        return interactive::run(&args).await;
    }

    let api_key = match ApiKey::from_option(args.api_key.clone()) {
        Ok(key) => key,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let request = RunRequest {
        config: collector_config(
            &args,
            args.country.clone(),
            args.tiles,
            args.strict(),
            args.lang.clone(),
        ),
        rules: load_rules(&args)?,
        output_dir: args.output_dir.clone(),
        api_key,
    };

    let (paths, report) = execute(request).await?;
    println!(
        "Done. Saved {} records to:\n- {}\n- {}",
        report.retained(),
        paths.csv.display(),
        paths.json.display()
    );

    Ok(())
}

fn collector_config(
    args: &Args,
    region: String,
    tiles_per_axis: usize,
    strict: bool,
    lang: String,
) -> CollectorConfig {
    CollectorConfig {
        region,
        tiles_per_axis,
        query: args.query.clone(),
        lang,
        strict,
        fetch: FetchSettings {
            page_size: args.page_size,
            max_pages: args.max_pages,
            request_timeout: Duration::from_secs(args.timeout_secs),
            ..FetchSettings::default()
        },
    }
}

fn load_rules(args: &Args) -> Result<ClassifierRules> {
    let mut rules = match &args.rules {
        Some(path) => ClassifierRules::load_from_file(path)?,
        None => ClassifierRules::default(),
    };
    if args.enforce_address_country {
        rules.enforce_address_country = true;
    }
    Ok(rules)
}

/// Run the pipeline and write both exports.
pub(crate) async fn execute(request: RunRequest) -> Result<(ExportPaths, CollectionReport)> {
    let RunRequest {
        config,
        rules,
        output_dir,
        api_key,
    } = request;

    // Fail on configuration problems before any request goes out.
    let region = find_region(&config.region)?;
    config.validate()?;

    info!("School collector");
    info!(
        "Country: {} ({}), {}x{} tiles",
        region.label, region.code, config.tiles_per_axis, config.tiles_per_axis
    );

    let client = YandexClient::new(api_key, &config.fetch)?;
    let classifier = SchoolClassifier::new(rules);

    let total = (config.tiles_per_axis * config.tiles_per_axis) as u64;
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tiles {msg}",
            )?
            .progress_chars("#>-"),
    );

    let mut kept_so_far = 0;
    let report = run_collection(&config, &client, &classifier, |summary| {
        kept_so_far += summary.kept;
        pb.set_message(format!("({} kept)", kept_so_far));
        pb.inc(1);
    })
    .await?;
    pb.finish_with_message(format!("({} kept before dedupe)", kept_so_far));

    for failure in &report.failed_tiles {
        warn!(
            "Skipped tile {} at page {}: {}",
            failure.error.tile() + 1,
            failure.error.page(),
            failure.error
        );
    }

    let paths = export_all(&output_dir, region.code, &report.records)
        .context("Failed to write export files")?;

    let elapsed = report.finished_at - report.started_at;
    info!(
        "Run finished in {}s: {} retained, {} duplicates, {} rejected, {}/{} tiles failed",
        elapsed.num_seconds(),
        report.retained(),
        report.duplicates_removed,
        report.rejected,
        report.failed_tiles.len(),
        report.tiles_total
    );

    Ok((paths, report))
}
