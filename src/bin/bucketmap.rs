//! `bucketmap` driver binary: parses CLI flags, opens the input file, and
//! runs the driver loop against a freshly created table.

use std::fs::File;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bucketmap::cli::CliArgs;
use bucketmap::driver::{self, DriverConfig};
use bucketmap::error::BucketMapError;
use bucketmap::{create_table, destroy_table};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let file = File::open(&args.input).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            BucketMapError::FileNotFound(args.input.clone())
        } else {
            BucketMapError::Io { path: args.input.clone(), source }
        }
    })?;

    let num_buckets = args.resolved_buckets();
    let num_threads = args.resolved_threads();
    let config = args.table_config();

    tracing::info!(
        variant = ?config.variant,
        num_buckets,
        num_threads,
        resize_enabled = config.resize_enabled,
        speed_test = config.speed_test,
        "starting run"
    );

    let table = create_table(num_buckets, num_threads, config);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build()
        .context("failed to build worker thread pool")?;

    let metrics = driver::run(&table, file, &pool, DriverConfig::default())
        .with_context(|| format!("driver loop failed reading {}", args.input.display()))?;

    if let Some(metrics) = metrics {
        println!("{metrics}");
    }

    destroy_table(table);
    Ok(())
}
