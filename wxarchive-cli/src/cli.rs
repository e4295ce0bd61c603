use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::Level;

use wxarchive_core::client::{CurrentOptions, OpenWeatherClient};
use wxarchive_core::model::Location;
use wxarchive_core::{Config, FetchMode, config, fetch, transform};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "wxarchive", version, about = "Fetch and reshape OpenWeatherMap data")]
pub struct Cli {
    /// Logging verbosity: trace, debug, info, warn or error (case insensitive).
    #[arg(long, global = true, default_value_t = Level::INFO)]
    pub log_level: Level,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch weather data and write it to a JSON file.
    Fetch(FetchArgs),

    /// Reshape fetched data into per-hour temperature records.
    Transform(TransformArgs),
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Output file path.
    #[arg(long, default_value = "data.json")]
    pub output: PathBuf,

    /// Unix timestamp for a single historical fetch.
    #[arg(long, conflicts_with_all = ["date", "from", "to"])]
    pub timestamp: Option<i64>,

    /// Date (YYYY-MM-DD) for a single daily summary fetch.
    #[arg(long, conflicts_with_all = ["timestamp", "from", "to"])]
    pub date: Option<NaiveDate>,

    /// First date (YYYY-MM-DD) of a daily summary range.
    #[arg(long, requires = "to", conflicts_with_all = ["timestamp", "date"])]
    pub from: Option<NaiveDate>,

    /// Last date (YYYY-MM-DD) of a daily summary range, inclusive.
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,

    /// Timezone in the ±HH:MM format for daily summary calls.
    #[arg(long)]
    pub tz: Option<String>,

    /// Override the configured latitude.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Override the configured longitude.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Override the configured location display name.
    #[arg(long)]
    pub location_name: Option<String>,

    /// Comma-separated response parts to exclude (current mode only).
    #[arg(long, conflicts_with_all = ["timestamp", "date", "from", "to"])]
    pub exclude: Option<String>,

    /// Unit system: standard, metric or imperial (current mode only).
    #[arg(long, conflicts_with_all = ["timestamp", "date", "from", "to"])]
    pub units: Option<String>,

    /// Response language code (current mode only).
    #[arg(long, conflicts_with_all = ["timestamp", "date", "from", "to"])]
    pub lang: Option<String>,
}

impl FetchArgs {
    /// Request mode selected by the flags; none of them means current
    /// conditions. Clap rejects combinations selecting more than one.
    fn mode(&self) -> FetchMode {
        if let Some(timestamp) = self.timestamp {
            FetchMode::Timestamp(timestamp)
        } else if let Some(date) = self.date {
            FetchMode::DaySummary {
                date,
                tz: self.tz.clone(),
            }
        } else if let (Some(from), Some(to)) = (self.from, self.to) {
            FetchMode::DateRange {
                from,
                to,
                tz: self.tz.clone(),
            }
        } else {
            FetchMode::Current(CurrentOptions {
                exclude: self.exclude.clone(),
                units: self.units.clone(),
                lang: self.lang.clone(),
            })
        }
    }

    /// Configured location with any CLI overrides applied on top.
    fn location(&self, config: &Config) -> Location {
        let mut location = config.location_or_default();

        if let Some(lat) = self.lat {
            location.lat = lat;
        }
        if let Some(lon) = self.lon {
            location.lon = lon;
        }
        if let Some(name) = &self.location_name {
            location.name = name.clone();
        }

        location
    }
}

#[derive(Debug, Args)]
pub struct TransformArgs {
    /// Output file path.
    #[arg(long, default_value = "transform.jsonl")]
    pub output: PathBuf,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Fetch(args) => run_fetch(args).await,
            Command::Transform(args) => run_transform(&args),
        }
    }
}

async fn run_fetch(args: FetchArgs) -> Result<()> {
    // The key check comes first so a misconfigured run fails before any
    // request is attempted.
    let api_key = config::api_key_from_env()?;
    let config = Config::load()?;

    let location = args.location(&config);
    let mode = args.mode();
    tracing::debug!(message = "starting fetch", location = ?location, mode = ?mode);

    let client = OpenWeatherClient::new(api_key);
    fetch::run(&client, &location, &mode, &args.output).await
}

fn run_transform(args: &TransformArgs) -> Result<()> {
    transform::run(Path::new(transform::DATA_FILE), &args.output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    fn fetch_args(cli: Cli) -> FetchArgs {
        match cli.command {
            Command::Fetch(args) => args,
            other => panic!("expected fetch command, got {other:?}"),
        }
    }

    #[test]
    fn no_mode_flags_selects_current() {
        let args = fetch_args(parse(&["wxarchive", "fetch"]));
        assert_eq!(args.output, PathBuf::from("data.json"));
        assert!(matches!(args.mode(), FetchMode::Current(_)));
    }

    #[test]
    fn timestamp_selects_timemachine() {
        let args = fetch_args(parse(&["wxarchive", "fetch", "--timestamp", "1700000000"]));
        assert!(matches!(args.mode(), FetchMode::Timestamp(1700000000)));
    }

    #[test]
    fn date_selects_day_summary_with_tz() {
        let args = fetch_args(parse(&[
            "wxarchive", "fetch", "--date", "2023-11-14", "--tz", "+02:00",
        ]));

        match args.mode() {
            FetchMode::DaySummary { date, tz } => {
                assert_eq!(date.to_string(), "2023-11-14");
                assert_eq!(tz.as_deref(), Some("+02:00"));
            }
            other => panic!("expected day summary mode, got {other:?}"),
        }
    }

    #[test]
    fn from_and_to_select_date_range() {
        let args = fetch_args(parse(&[
            "wxarchive", "fetch", "--from", "2023-11-14", "--to", "2023-11-16",
        ]));

        assert!(matches!(args.mode(), FetchMode::DateRange { .. }));
    }

    #[test]
    fn timestamp_and_date_conflict() {
        let result = Cli::try_parse_from([
            "wxarchive", "fetch", "--timestamp", "1700000000", "--date", "2023-11-14",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn current_only_flags_conflict_with_other_modes() {
        let result = Cli::try_parse_from([
            "wxarchive", "fetch", "--date", "2023-11-14", "--units", "metric",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "wxarchive", "fetch", "--timestamp", "1700000000", "--exclude", "minutely",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn current_mode_accepts_its_optional_flags() {
        let args = fetch_args(parse(&[
            "wxarchive", "fetch", "--exclude", "minutely", "--units", "metric", "--lang", "en",
        ]));

        match args.mode() {
            FetchMode::Current(opts) => {
                assert_eq!(opts.exclude.as_deref(), Some("minutely"));
                assert_eq!(opts.units.as_deref(), Some("metric"));
                assert_eq!(opts.lang.as_deref(), Some("en"));
            }
            other => panic!("expected current mode, got {other:?}"),
        }
    }

    #[test]
    fn from_requires_to() {
        let result = Cli::try_parse_from(["wxarchive", "fetch", "--from", "2023-11-14"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_flags_override_configured_location() {
        let args = fetch_args(parse(&[
            "wxarchive", "fetch", "--lat", "51.5072", "--lon", "-0.1276", "--location-name",
            "London",
        ]));

        let location = args.location(&Config::default());
        assert_eq!(location.lat, 51.5072);
        assert_eq!(location.lon, -0.1276);
        assert_eq!(location.name, "London");
    }

    #[test]
    fn defaults_fall_back_to_builtin_location() {
        let args = fetch_args(parse(&["wxarchive", "fetch"]));
        let location = args.location(&Config::default());
        assert_eq!(location.name, "Seattle");
    }

    #[test]
    fn transform_defaults_output() {
        let cli = parse(&["wxarchive", "transform"]);
        match cli.command {
            Command::Transform(args) => {
                assert_eq!(args.output, PathBuf::from("transform.jsonl"));
            }
            other => panic!("expected transform command, got {other:?}"),
        }
    }
}
