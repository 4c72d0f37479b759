//! CLI entry point for the rainwatch logger.
//!
//! Provides subcommands for appending a single forecast sample and for
//! polling the feed continuously on its 5-minute refresh cadence.

use anyhow::Result;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use rainwatch::{
    align::{PredictionRow, PredictionWindow},
    fetch::{BasicClient, Coordinates, fetch_text},
    output::{append_row, init_table, print_pretty},
    parser::parse_feed,
    schedule::time_until_next_poll,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Endpoint documented to refresh its prediction window every 5 minutes.
const FEED_URL: &str = "https://gps.buienradar.nl/getrr.php";

#[derive(Parser)]
#[command(name = "rainwatch")]
#[command(about = "Logs rain nowcasts into a time-aligned CSV table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append a single forecast row from a file or URL
    Sample {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to append the row to
        #[arg(short, long, default_value = "predictions.csv")]
        output: String,
    },
    /// Poll the feed each refresh window, appending one row per cycle
    Watch {
        /// Feed endpoint
        #[arg(long, default_value = FEED_URL)]
        url: String,

        /// Latitude of the forecast location
        #[arg(long, default_value_t = 52.110425)]
        lat: f64,

        /// Longitude of the forecast location
        #[arg(long, default_value_t = 5.1434641)]
        lon: f64,

        /// CSV file to write the table to (truncated on start)
        #[arg(short, long, default_value = "predictions.csv")]
        output: String,

        /// Number of rows to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        num_samples: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rainwatch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rainwatch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { source, output } => {
            let text = fetcher(&source).await?;
            let lookup = parse_feed(&text)?;
            let window = PredictionWindow::starting_after(Local::now().naive_local());
            let row = PredictionRow::from_lookup(&window, &lookup);

            if !Path::new(&output).exists() {
                init_table(&output)?;
            }
            append_row(&output, &row)?;
        }
        Commands::Watch {
            url,
            lat,
            lon,
            output,
            num_samples,
        } => {
            watch(&url, lat, lon, &output, num_samples).await?;
        }
    }

    Ok(())
}

/// Loads feed text from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &str) -> Result<String> {
    let text = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_text(&client, source).await?
    } else {
        std::fs::read_to_string(source)?
    };
    Ok(text)
}

/// Runs the sequential poll loop: sleep until the feed has refreshed its
/// window, fetch, decode, align, append.
///
/// Every failure is fatal for the process; restarting is left to an external
/// supervisor. A termination mid-cycle at worst loses that cycle's row.
#[tracing::instrument(skip(url), fields(output, num_samples))]
async fn watch(url: &str, lat: f64, lon: f64, output: &str, num_samples: usize) -> Result<()> {
    let client = Coordinates {
        inner: BasicClient::new(),
        lat,
        lon,
    };

    init_table(output)?;

    if num_samples == 0 {
        info!("Sampling infinitely. Press Ctrl+C to stop.");
    } else {
        info!(num_samples, "Starting sample collection");
    }

    let mut sample_count = 0;

    loop {
        if num_samples > 0 && sample_count >= num_samples {
            break;
        }

        sample_count += 1;

        let sleep = time_until_next_poll(Utc::now());
        info!(
            sample = sample_count,
            sleep_secs = sleep.as_secs_f64(),
            "Waiting for the next feed window"
        );
        tokio::time::sleep(sleep).await;

        let text = fetch_text(&client, url).await?;
        debug!(bytes = text.len(), "Feed body received, parsing");

        let lookup = parse_feed(&text)?;
        let window = PredictionWindow::starting_after(Local::now().naive_local());
        let row = PredictionRow::from_lookup(&window, &lookup);
        print_pretty(&row);

        append_row(output, &row)?;
        info!(
            timestamp = %row.timestamp.format("%Y-%m-%d %H:%M"),
            predicted = row.rates.iter().filter(|r| r.is_some()).count(),
            "Row appended"
        );
    }

    info!(output, "Finished collecting samples");
    Ok(())
}
