use anyhow::{Context, Result, ensure};
use chrono::NaiveDate;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::client::{CurrentOptions, DaySummarySource, OpenWeatherClient};
use crate::model::Location;

/// Which One Call request a fetch run performs. Exactly one mode per run;
/// the CLI rejects flag combinations that would select more than one.
#[derive(Debug, Clone)]
pub enum FetchMode {
    /// Current conditions and forecast.
    Current(CurrentOptions),
    /// One historical reading at a unix timestamp.
    Timestamp(i64),
    /// Aggregated summary for one calendar date.
    DaySummary {
        date: NaiveDate,
        tz: Option<String>,
    },
    /// Daily summaries for every date in the inclusive range, one file each.
    DateRange {
        from: NaiveDate,
        to: NaiveDate,
        tz: Option<String>,
    },
}

/// Perform the requested fetch and persist the result under `output`.
pub async fn run(
    client: &OpenWeatherClient,
    location: &Location,
    mode: &FetchMode,
    output: &Path,
) -> Result<()> {
    match mode {
        FetchMode::Current(opts) => {
            let value = client.current(location, opts).await?;
            write_pretty_json(output, &value)
        }
        FetchMode::Timestamp(timestamp) => {
            let value = client.timemachine(location, *timestamp).await?;
            write_pretty_json(output, &value)
        }
        FetchMode::DaySummary { date, tz } => {
            let value = client.day_summary(location, *date, tz.as_deref()).await?;
            write_pretty_json(output, &value)
        }
        FetchMode::DateRange { from, to, tz } => {
            fetch_date_range(client, location, *from, *to, tz.as_deref(), output).await
        }
    }
}

/// Fetch a daily summary for every date in `[from, to]`, writing each to
/// `<output>-<date>.json`. Dates whose file already exists are skipped, so
/// an interrupted run can be resumed without repeating requests. A failed
/// date is logged and the loop moves on; the run errors at the end if any
/// date failed.
pub async fn fetch_date_range(
    source: &dyn DaySummarySource,
    location: &Location,
    from: NaiveDate,
    to: NaiveDate,
    tz: Option<&str>,
    output: &Path,
) -> Result<()> {
    ensure!(from <= to, "date range start {from} is after its end {to}");

    let mut failures = 0usize;

    for date in from.iter_days().take_while(|d| *d <= to) {
        let path = dated_output_path(output, date);

        if path.exists() {
            tracing::info!(
                message = "output file already exists, skipping fetch",
                date = %date,
                path = %path.display(),
            );
            continue;
        }

        match source.day_summary(location, date, tz).await {
            Ok(value) => write_pretty_json(&path, &value)?,
            Err(e) => {
                tracing::error!(message = "daily summary fetch failed", date = %date, error = %e);
                failures += 1;
            }
        }
    }

    ensure!(failures == 0, "{failures} daily summary request(s) failed");
    Ok(())
}

/// Per-date output path in date-range mode: `<output>-<date>.json`.
pub fn dated_output_path(output: &Path, date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}-{}.json", output.display(), date))
}

/// Serialize `value` as indented JSON and overwrite `path` with it.
pub fn write_pretty_json(path: &Path, value: &Value) -> Result<()> {
    let body = serde_json::to_string_pretty(value).context("Failed to serialize response body")?;

    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(message = "wrote response", path = %path.display());
    Ok(())
}
