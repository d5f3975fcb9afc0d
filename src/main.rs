use clap::Parser;
use mimalloc::MiMalloc;
use sqlsync::{
    Config, DbPool, ObjectKind, ResourceBundle, SyncError, SyncReport, SyncService,
    resources::embedded, sync::cancel_pair, utils::logging::init_tracing,
};
use std::{path::PathBuf, process::ExitCode};
use tokio::signal;
use tracing::{error, info, warn};
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Synchronize bundled stored procedures, functions and views with a database.
#[derive(Parser)]
#[command(name = "sqlsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./sqlsync.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Database URL, e.g. postgres://user@host/db or sqlite://app.db
    #[arg(short, long)]
    database_url: Option<String>,

    /// Load SQL resources from this directory instead of the embedded bundle
    #[arg(short, long)]
    resources: Option<PathBuf>,

    /// Object kind to synchronize; repeat for several (default: all)
    #[arg(short, long = "kind")]
    kinds: Vec<ObjectKind>,

    /// Print the report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Fail when any object could not be synchronized
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut cfg = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }
    if let Some(dir) = cli.resources {
        cfg.resource_dir = Some(dir);
    }
    if !cli.kinds.is_empty() {
        cfg.kinds = cli.kinds;
    }
    if cli.strict {
        cfg.fail_on_error = true;
    }

    init_tracing(&cfg.loglevel);
    cfg.validate()?;

    info!(
        resource_dir = %cfg
            .resource_dir
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<embedded>".to_string()),
        default_schema = %cfg.default_schema.as_deref().unwrap_or("<backend>"),
        loglevel = %cfg.loglevel,
        kinds = ?cfg.kinds,
    );

    let pool = DbPool::connect(&cfg.database_url, cfg.max_connections).await?;
    let bundle = match cfg.resource_dir.as_ref() {
        Some(dir) => ResourceBundle::from_dir(dir).await?,
        None => embedded::for_backend(pool.backend()),
    };

    let (cancel, signal) = cancel_pair();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C received, stopping after the current statement");
            cancel.cancel();
        }
    });

    let service = SyncService::new((&cfg).into());
    let outcome = service
        .sync_pool(&pool, &bundle, &cfg.kinds, &signal)
        .await;
    pool.close().await;

    let report = match outcome {
        Ok(report) => report,
        Err(SyncError::Cancelled) => {
            error!("Synchronization cancelled");
            return Ok(ExitCode::from(130));
        }
        Err(e) => return Err(e.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }

    if cfg.fail_on_error && report.total.has_errors() {
        error!(errors = report.total.errors, "Synchronization finished with errors");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_summary(report: &SyncReport) {
    for entry in &report.kinds {
        let r = entry.result;
        println!(
            "{:<12} created={} altered={} dropped={} errors={}",
            entry.kind.plural_name(),
            r.created,
            r.altered,
            r.dropped,
            r.errors
        );
    }
    let t = report.total;
    println!(
        "{:<12} created={} altered={} dropped={} errors={}",
        "total", t.created, t.altered, t.dropped, t.errors
    );
}
