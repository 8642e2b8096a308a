//! J2735 Translator CLI Application
//!
//! This is the command-line ingestion front end for the j2735-translator
//! library. It adds:
//! - Batch polling of decoded elements from JSON-lines files or stdin
//! - Parallel translation of each batch
//! - Per-message failure isolation with logging
//! - JSON-lines output and a run summary

use anyhow::{Context, Result};
use clap::Parser;
use j2735_translator::{ElementType, Translator};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

mod config;
mod ingest;
mod report;

use config::{AppConfig, OutputFormat};
use ingest::{IngestLoop, JsonLinesSink, JsonLinesSource, RecordSink};
use report::IngestStats;

/// J2735 Translator - Turn decoded J2735 elements into labeled JSON records
#[derive(Parser, Debug)]
#[command(name = "j2735-cli")]
#[command(about = "Translate decoded J2735 message elements into JSON status records", long_about = None)]
#[command(version)]
struct Args {
    /// JSON-lines file(s) of decoded elements (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Vec<PathBuf>,

    /// Output file for translated records (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only translate these element types (can be repeated)
    #[arg(short, long, value_name = "TYPE")]
    element: Vec<ElementType>,

    /// Messages per batch
    #[arg(long, value_name = "COUNT")]
    batch_size: Option<usize>,

    /// Stop after this many batches
    #[arg(long, value_name = "COUNT")]
    max_batches: Option<usize>,

    /// Worker threads for translation
    #[arg(long, value_name = "COUNT")]
    threads: Option<usize>,

    /// Pretty-print output records
    #[arg(long)]
    pretty: bool,

    /// List supported element types and exit
    #[arg(long)]
    list_elements: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("J2735 Translator CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using translator library v{}", j2735_translator::VERSION);

    if args.list_elements {
        list_elements();
        return Ok(());
    }

    let config = resolve_config(&args)?;
    let stats = run(&config)?;

    if !args.quiet {
        stats.print_summary();
    }

    Ok(())
}

/// Load the config file (if any) and apply command line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if !args.input.is_empty() {
        config.input.files = args.input.clone();
    }
    if args.output.is_some() {
        config.output.path = args.output.clone();
    }
    if !args.element.is_empty() {
        config.translator.element_filter = Some(args.element.clone());
    }
    if let Some(batch_size) = args.batch_size {
        config.ingest.batch_size = batch_size;
    }
    if args.max_batches.is_some() {
        config.ingest.max_batches = args.max_batches;
    }
    if args.threads.is_some() {
        config.ingest.threads = args.threads;
    }
    if args.pretty {
        config.output.format = OutputFormat::Pretty;
    }

    config.validate()?;
    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Run the ingest loop over every configured input
fn run(config: &AppConfig) -> Result<IngestStats> {
    let translator = Translator::with_config(config.translator.clone());
    let ingest = IngestLoop::new(translator, config.ingest.batch_size)
        .with_max_batches(config.ingest.max_batches)
        .with_threads(config.ingest.threads)?;

    let writer: Box<dyn Write> = match &config.output.path {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let pretty = config.output.format == OutputFormat::Pretty;
    let mut sink = JsonLinesSink::new(BufWriter::new(writer), pretty);

    let mut total = IngestStats::new();

    if config.input.files.is_empty() {
        let mut source = JsonLinesSource::new("stdin", io::stdin().lock());
        total.merge(&ingest.run(&mut source, &mut sink)?);
    } else {
        let shutdown = ingest.shutdown_handle();
        for path in &config.input.files {
            if !shutdown.is_running() {
                log::info!("Stopped before {:?}", path);
                break;
            }
            let file = File::open(path)
                .with_context(|| format!("Failed to open input file: {:?}", path))?;
            let mut source = JsonLinesSource::new(path.display().to_string(), BufReader::new(file));
            total.merge(&ingest.run(&mut source, &mut sink)?);
        }
    }

    sink.flush()?;
    log::info!(
        "Translated {} of {} message(s), {} failed",
        total.translated,
        total.messages,
        total.failed
    );
    Ok(total)
}

/// Print the supported element types with their fields
fn list_elements() {
    let stats = Translator::new().definition_stats();
    println!("Supported elements ({}):", stats.num_elements);
    for element in ElementType::ALL {
        let fields: Vec<String> = element
            .definition()
            .fields
            .iter()
            .map(|f| {
                if f.required {
                    f.name.to_string()
                } else {
                    format!("{}?", f.name)
                }
            })
            .collect();
        println!("  {:<20} {}", element.name(), fields.join(", "));
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::parse_from([
            "j2735-cli",
            "--element",
            "WiperSet",
            "--batch-size",
            "5",
            "--pretty",
        ]);
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.translator.element_filter, Some(vec![ElementType::WiperSet]));
        assert_eq!(config.ingest.batch_size, 5);
        assert_eq!(config.output.format, OutputFormat::Pretty);
    }

    #[test]
    fn test_unknown_element_argument_rejected() {
        let result = Args::try_parse_from(["j2735-cli", "--element", "PathHistory"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_over_files() {
        let mut input = NamedTempFile::new().unwrap();
        writeln!(
            input,
            r#"{{"elementType":"GnssStatus","fields":{{"status":[128]}}}}"#
        )
        .unwrap();
        writeln!(input, r#"{{"elementType":"GnssStatus","fields":{{"status":[1, 2]}}}}"#).unwrap();
        input.flush().unwrap();
        let output = NamedTempFile::new().unwrap();

        let mut config = AppConfig::default();
        config.input.files = vec![input.path().to_path_buf()];
        config.output.path = Some(output.path().to_path_buf());

        let stats = run(&config).unwrap();
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.translated, 1);
        assert_eq!(stats.failed, 1);

        let text = std::fs::read_to_string(output.path()).unwrap();
        let record: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(record["record"]["status"]["unavailable"], true);
        assert_eq!(record["record"]["status"]["isHealthy"], false);
    }
}
