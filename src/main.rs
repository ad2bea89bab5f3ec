//! AccessRecon - functionality reconciliation and SoD risk review
//!
//! Command-line front end over the accessrecon library.

use accessrecon::audit;
use accessrecon::catalog::{available_modules, CatalogReader, CatalogStore};
use accessrecon::config::Config;
use accessrecon::core::{compare, import_rows, ReconcileReport};
use accessrecon::error::ReconError;
use accessrecon::risk::{analyze_risks_with, RiskStatus, Scenario};
use accessrecon::sources;
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a catalog sheet and make it the active catalog
    Activate { sheet: PathBuf },

    /// List modules available for comparison
    Modules,

    /// Reconcile a functionality list against one module of the catalog
    Compare {
        /// Module name, exactly as it appears in the catalog
        #[arg(short, long)]
        module: String,
        list: PathBuf,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Build profile import rows from a saved comparison report
    Import {
        #[arg(long)]
        report: PathBuf,
        #[arg(long)]
        profile_id: String,
        #[arg(long)]
        profile_name: String,
        /// Allow reports that still have divergences
        #[arg(long)]
        force: bool,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Extract SoD risks from a ticket analysis export
    Risks {
        grid: PathBuf,
        #[arg(short, long, value_enum)]
        scenario: ScenarioArg,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScenarioArg {
    Creation,
    Maintenance,
}

impl From<ScenarioArg> for Scenario {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::Creation => Scenario::Creation,
            ScenarioArg::Maintenance => Scenario::Maintenance,
        }
    }
}

/// Convert a library error into what the operator should see
fn user_facing(err: ReconError) -> anyhow::Error {
    if err.is_internal() {
        error!("{:?}", err);
    }
    anyhow!(err.user_message())
}

/// Keep file names to ASCII alphanumerics, `-` and `_`
fn safe_name(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    info!("💾 Wrote {}", path.display());
    Ok(())
}

fn record_activity(entry: &str) {
    if let Err(e) = audit::log(entry) {
        warn!("Could not write activity log: {}", e);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse::<Level>().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let store = CatalogStore::new(PathBuf::from(&config.database_path)).map_err(user_facing)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();

    match args.command {
        Commands::Activate { sheet } => {
            let records = sources::read_catalog_sheet(&sheet).map_err(user_facing)?;
            store.activate(&records).map_err(user_facing)?;
            record_activity(&format!(
                "Catalog activated: {} ({} functionalities)",
                sheet.display(),
                records.len()
            ));
            println!("Catalog '{}' activated.", sheet.display());
        }

        Commands::Modules => {
            let records = store.records().map_err(user_facing)?;
            for module in available_modules(&records) {
                println!("{}", module);
            }
        }

        Commands::Compare { module, list, out } => {
            let names = sources::read_name_list(&list).map_err(user_facing)?;
            let report = compare(&store, &names, &module, &config.match_settings())
                .map_err(user_facing)?;

            let out = out.unwrap_or_else(|| {
                PathBuf::from(&config.output_dir)
                    .join(format!("report_{}_{}.json", safe_name(&module), timestamp))
            });
            write_json(&report, &out)?;
            record_activity(&format!(
                "Comparison against '{}': {} matched, {} divergent",
                module, report.matched, report.divergent
            ));

            println!("{}", report.summary);
            if let Some(advisory) = &report.advisory {
                println!("{}", advisory);
            }
            for result in report.by_severity() {
                println!(
                    "{:?}\t{}\t{}\t{:.2}",
                    result.status,
                    result.input_text,
                    result.suggested_name.as_deref().unwrap_or(""),
                    result.score
                );
            }
        }

        Commands::Import {
            report,
            profile_id,
            profile_name,
            force,
            out,
        } => {
            let content = std::fs::read_to_string(&report)
                .with_context(|| format!("Comparison report not found: {}", report.display()))?;
            let saved: ReconcileReport = serde_json::from_str(&content)?;
            if !saved.is_perfect_match() && !force {
                bail!(
                    "Report still has {} divergent functionalities; pass --force to export anyway",
                    saved.divergent
                );
            }

            let rows = import_rows(&saved.results, &profile_id, &profile_name);
            let out = out.unwrap_or_else(|| {
                PathBuf::from(&config.output_dir)
                    .join(format!("import_{}_{}.json", safe_name(&profile_name), timestamp))
            });
            write_json(&rows, &out)?;
            println!("{} import rows written.", rows.len());
        }

        Commands::Risks {
            grid,
            scenario,
            out,
        } => {
            let sheet = sources::read_grid(&grid).map_err(user_facing)?;
            let scenario: Scenario = scenario.into();
            let outcome = analyze_risks_with(&sheet, scenario, &config.layout);
            record_activity(&format!(
                "Risk analysis ({}) for profile '{}': {:?}",
                scenario, outcome.profile, outcome.status
            ));

            match out {
                Some(path) => write_json(&outcome, &path)?,
                None => println!("{}", serde_json::to_string_pretty(&outcome)?),
            }
            if outcome.status == RiskStatus::Error {
                bail!(outcome.message);
            }
        }
    }

    Ok(())
}
