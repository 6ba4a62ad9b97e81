//! parade-dedupe: find and merge duplicate venue records
//!
//! Dry-run by default: prints the proposed groups and survivors without
//! touching the database. Pass `--execute` to commit the merges.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use parade_dedup::{BucketStrategy, DedupConfig, DedupEngine, RunReport};
use parade_store::SqliteStore;

#[derive(Debug, Parser)]
#[command(name = "parade-dedupe", version, about = "Deduplicate venue records")]
struct Cli {
    /// SQLite database holding the venue directory
    #[arg(long)]
    database: PathBuf,

    /// Bucketing strategies to run, in order (repeatable).
    /// One of: name-postcode, shared-website, city-name
    #[arg(long = "strategy", value_parser = parse_strategy)]
    strategies: Vec<BucketStrategy>,

    /// Commit the merges instead of only printing the plan
    #[arg(long)]
    execute: bool,

    /// Write the report as Markdown to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Load thresholds and weights from a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override: metres for a generic proximity match
    #[arg(long)]
    close_radius_m: Option<f64>,

    /// Override: metres when the bucket shares a canonical website
    #[arg(long)]
    url_radius_m: Option<f64>,

    /// Override: metres beyond which name evidence is distrusted
    #[arg(long)]
    name_cap_m: Option<f64>,

    /// Override: maximum Levenshtein distance between normalized names
    #[arg(long)]
    max_name_distance: Option<usize>,
}

fn parse_strategy(raw: &str) -> Result<BucketStrategy, String> {
    match raw {
        "name-postcode" => Ok(BucketStrategy::NamePostcode),
        "shared-website" => Ok(BucketStrategy::SharedWebsite),
        "city-name" => Ok(BucketStrategy::CityName),
        other => Err(format!(
            "unknown strategy '{other}' (expected name-postcode, shared-website, or city-name)"
        )),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => DedupConfig::from_json(&fs::read_to_string(path)?)?,
        None => DedupConfig::default(),
    };
    if let Some(v) = cli.close_radius_m {
        config.close_radius_m = v;
    }
    if let Some(v) = cli.url_radius_m {
        config.shared_url_radius_m = v;
    }
    if let Some(v) = cli.name_cap_m {
        config.name_distance_cap_m = v;
    }
    if let Some(v) = cli.max_name_distance {
        config.max_name_distance = v;
    }

    let store = SqliteStore::open(&cli.database)?;
    let mut engine = DedupEngine::new(&store, &store, config)?;
    if !cli.strategies.is_empty() {
        engine = engine.with_strategies(cli.strategies.clone());
    }

    let plan = engine.plan()?;
    let report = RunReport::from_plan(&plan);
    print!("{report}");

    if let Some(path) = &cli.report {
        fs::write(path, report.to_markdown())?;
        eprintln!("report written to {}", path.display());
    }

    if cli.execute {
        let summary = engine.execute(&plan);
        println!();
        println!(
            "Merged {} of {} group(s), {} failed.",
            summary.groups_merged, summary.groups_found, summary.groups_failed
        );
        println!(
            "Copied {} field(s), moved {} tenant(s), dropped {} colliding tenant(s).",
            summary.fields_copied, summary.tenants_moved, summary.tenants_dropped
        );
        for failure in &summary.failures {
            eprintln!(
                "group {} (survivor {}): {}",
                failure.group, failure.survivor, failure.error
            );
        }
        if summary.groups_failed > 0 {
            return Err("some groups failed to merge".into());
        }
    } else {
        println!();
        println!("Dry run: no changes written. Pass --execute to merge.");
    }

    Ok(())
}
