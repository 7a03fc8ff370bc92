//! `probedock publish` - Process a saved test run.

use anyhow::{Context, Result};
use probedock_core::{Client, Snapshot};
use tracing::debug;

use crate::cli::args::PublishArgs;
use crate::exit_codes;

pub async fn run(args: PublishArgs) -> Result<i32> {
    let client = Client::from_env()?;

    let Snapshot {
        test_run,
        mut config,
    } = client
        .load_test_run(&args.dump)
        .with_context(|| format!("failed to load test run: {}", args.dump.display()))?;
    debug!(
        path = %args.dump.display(),
        results = test_run.results.len(),
        dry_run = args.dry_run,
        "loaded test run"
    );

    if args.dry_run {
        config.publish = Some(false);
    }

    let outcome = client.process(&test_run, &config).await?;

    if !outcome.is_valid() {
        eprintln!("Test run not published:");
        for error in &outcome.errors {
            eprintln!("- {error}");
        }
        return Ok(exit_codes::VALIDATION_FAILED);
    }

    if let Some(path) = &outcome.saved_to {
        eprintln!("Payload saved to {}", path.display());
    }

    let results = outcome.payload.as_ref().map_or(0, |p| p.results.len());
    if outcome.published {
        eprintln!("Published {results} test result(s)");
    } else {
        eprintln!("Publishing disabled, {results} test result(s) not sent");
    }

    Ok(exit_codes::SUCCESS)
}
