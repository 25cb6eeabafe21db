use clap::Parser;
use odb_reader::config::runtime::RuntimeConfig;
use odb_reader::pipeline::{self, LoadReport};
use odb_reader::sink::MemoryDatabase;
use odb_reader::{logging, DatabaseSummary};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

/// Load a MacSHAPA Open Database file and report what was read
#[derive(Parser, Debug)]
#[command(name = "odb_reader", version, about = "MacSHAPA Open Database reader")]
struct Cli {
    /// Path to the .odb file
    file: PathBuf,

    /// Warnings allowed before the load is abandoned
    #[arg(long)]
    max_warnings: Option<u32>,

    /// Errors allowed before scanning stops
    #[arg(long)]
    max_errors: Option<u32>,

    /// Runtime preferences in TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print every diagnostic with its line number
    #[arg(long)]
    listing: bool,

    /// Emit log events as JSON lines
    #[arg(long)]
    structured_logs: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    file: String,
    report: &'a LoadReport,
    database: DatabaseSummary,
}

fn runtime_config(cli: &Cli) -> Result<RuntimeConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };
    if let Some(max_warnings) = cli.max_warnings {
        config.reader.max_warnings = max_warnings;
    }
    if let Some(max_errors) = cli.max_errors {
        config.reader.max_errors = max_errors;
    }
    if cli.structured_logs {
        config.logging.use_structured_logging = true;
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = runtime_config(&cli)?;

    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    if let Err(message) = pipeline::validate_pipeline() {
        logging::safe_log_error(logging::codes::system::INITIALIZATION_FAILURE, &message);
        process::exit(2);
    }

    let mut db = MemoryDatabase::new();
    let report = match pipeline::load_file(&cli.file, &mut db, &config) {
        Ok(report) => report,
        Err(error) => {
            eprintln!("FAILED [{}]: {}", error.error_code(), error);
            process::exit(2);
        }
    };

    if cli.json {
        let json = JsonReport {
            file: cli.file.display().to_string(),
            report: &report,
            database: db.summary(),
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        print_report(&cli, &report, &db);
    }

    if report.is_aborted() {
        process::exit(1);
    }
    Ok(())
}

fn print_report(cli: &Cli, report: &LoadReport, db: &MemoryDatabase) {
    if cli.listing && !report.diagnostics.is_empty() {
        print!("{}", report.listing());
        println!();
    }

    let summary = db.summary();
    println!("File: {}", cli.file.display());
    if let Some(name) = &summary.name {
        println!("Database: {}", name);
    }
    println!("Outcome: {:?}", report.outcome);
    println!("Abort level: {}", report.abort_level.as_str());
    println!("Warnings: {}  Errors: {}", report.warnings, report.errors);
    println!(
        "Read {} lines, {} tokens in {:.2}ms",
        report.lines,
        report.metrics.total_tokens,
        report.duration.as_secs_f64() * 1000.0
    );
    println!(
        "Loaded {} predicates, {} columns, {} cells",
        summary.user_predicates, summary.columns, summary.cells
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_limits() {
        let cli = Cli::parse_from([
            "odb_reader",
            "study.odb",
            "--max-warnings",
            "5",
            "--max-errors",
            "2",
            "--structured-logs",
        ]);
        let config = runtime_config(&cli).unwrap();
        assert_eq!(config.reader.max_warnings, 5);
        assert_eq!(config.reader.max_errors, 2);
        assert!(config.logging.use_structured_logging);
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["odb_reader", "study.odb"]);
        assert!(!cli.json);
        assert!(!cli.listing);
        assert!(cli.max_warnings.is_none());
    }
}
