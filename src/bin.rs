//! Binary entry point for `weather-assistant`.
//!
//! Reads one question from standard input, answers it, and exits. Standard
//! output carries only the answer (or the error line); logs go to stderr.

use std::process::ExitCode;

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tokio::io::BufReader;
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};
use weather_assistant::{
    base::{
        config::Config,
        types::{Outcome, Res},
    },
    interaction::question::read_question,
};

/// Weather-assistant – ask about the weather in plain language.
///
/// Configuration can come from `.env`, `config.toml`, or `WEATHER_ASSISTANT_*`
/// environment variables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Override the config file path (optional).
    ///
    /// By default, the assistant will look for a config file at `.hidden/config.toml`
    /// in the current directory.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Increase log verbosity (-v, -vv, etc.).
    ///
    /// Use multiple times to increase verbosity:
    /// - No flag: INFO level
    /// - -v: DEBUG level
    /// - -vv or more: TRACE level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Export spans over OTLP/HTTP.
    #[arg(long)]
    otlp: bool,
    /// Override the deadline for each LLM call, in seconds.
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

/// Main entry point for the weather-assistant binary.
///
/// Sets up logging based on verbosity, loads configuration, and answers one question.
#[tokio::main]
async fn main() -> Res<ExitCode> {
    let args = Args::parse();

    // Construct the level filter.

    let level = match args.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    let level_filter = tracing_subscriber::filter::LevelFilter::from_level(level);

    // Prepare the log layer.

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_ansi(true)
        .with_level(true)
        .with_file(false)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    // Prepare the otlp layer.

    let otel = if args.otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("weather-assistant");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stderr).init();

    // Load the configuration.

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            println!("Error loading configuration: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let config = match args.timeout {
        Some(secs) => config.with_llm_timeout_secs(secs),
        None => config,
    };

    // Read the question.

    eprintln!("Ask about the weather");

    let question = match read_question(BufReader::new(tokio::io::stdin())).await {
        Ok(Some(question)) => question,
        Ok(None) => {
            println!("No question provided");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => {
            println!("Error reading your question: {err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    // Answer it.

    match weather_assistant::start(config, question).await {
        Ok(Outcome::Answered(answer)) => {
            println!("{answer}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(Outcome::NoCity) => {
            println!("Could not extract city from your input");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            println!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
