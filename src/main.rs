//! Stuntguard CLI: one-shot family risk prediction.
//!
//! Reads a JSON object mapping indicator names to booleans (from a file or
//! stdin), runs the inference pipeline against the exported weight files,
//! and prints the assessment as JSON.
//!
//! # Usage
//!
//! ```bash
//! stuntguard [--model-dir <dir>] [--input <file.json>] [--policy three|two]
//! ```

use std::collections::HashMap;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use stuntguard::adapters::textfile::{StandardScaler, TextWeightStore, SCALER_FILE};
use stuntguard::{InferenceService, ThresholdPolicy};

struct Args {
    model_dir: PathBuf,
    input: Option<PathBuf>,
    policy: ThresholdPolicy,
}

fn usage() -> ! {
    eprintln!(
        "Usage: stuntguard [--model-dir <dir>] [--input <file.json>] [--policy three|two]\n\
         \n\
         Reads an indicator map as JSON from --input or stdin and prints the\n\
         risk assessment. The model directory must contain the exported\n\
         weight files and scaler.txt (defaults to $STUNTGUARD_MODEL_DIR or ./model)."
    );
    std::process::exit(2);
}

fn parse_args() -> Result<Args> {
    let mut model_dir = std::env::var("STUNTGUARD_MODEL_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("model"));
    let mut input = None;
    let mut policy = ThresholdPolicy::ThreeBand;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--model-dir" => match args.next() {
                Some(dir) => model_dir = PathBuf::from(dir),
                None => usage(),
            },
            "--input" => match args.next() {
                Some(path) => input = Some(PathBuf::from(path)),
                None => usage(),
            },
            "--policy" => match args.next().as_deref() {
                Some("three") => policy = ThresholdPolicy::ThreeBand,
                Some("two") => policy = ThresholdPolicy::TwoBand,
                _ => usage(),
            },
            "--help" | "-h" => usage(),
            other => bail!("Unknown argument: {other}"),
        }
    }

    Ok(Args {
        model_dir,
        input,
        policy,
    })
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Default behavior:
    // - interactive TTY: log to stderr so JSON output on stdout stays clean
    // - otherwise: honor STUNTGUARD_LOG_FILE when set
    let log_mode =
        std::env::var("STUNTGUARD_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let interactive = std::io::stdout().is_terminal();
    let use_file = match log_mode.as_str() {
        "file" => true,
        "stderr" => false,
        // auto
        _ => !interactive && std::env::var("STUNTGUARD_LOG_FILE").is_ok(),
    };

    let (writer, guard) = if use_file {
        let log_file = std::env::var("STUNTGUARD_LOG_FILE")
            .unwrap_or_else(|_| "stuntguard.log".to_string());

        if let Some(parent) = std::path::Path::new(&log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stderr())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    Ok(guard)
}

fn read_indicators(input: Option<&PathBuf>) -> Result<HashMap<String, bool>> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read indicators from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Input must be a JSON object of indicator name -> bool")
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let _guard = init_logging()?;

    tracing::info!(model_dir = %args.model_dir.display(), "Starting stuntguard");

    let indicators = read_indicators(args.input.as_ref())?;

    let store = TextWeightStore::new(&args.model_dir);
    let scaler = StandardScaler::from_file(args.model_dir.join(SCALER_FILE))
        .context("Failed to load feature scaler")?;

    let service = InferenceService::load(&store, scaler, args.policy)
        .context("Failed to initialize inference service")?;

    let assessment = service.predict_map(&indicators)?;

    if assessment.contributing_factors.is_empty() {
        tracing::info!("No risk factors identified");
    }

    println!("{}", serde_json::to_string_pretty(&assessment)?);
    Ok(())
}
