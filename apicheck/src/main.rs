//! Command-line verifier for the sales service's JSON contracts.
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use apicheck_common::checks::sales::default_suite_for_today;
use apicheck_common::config::user_config_path;
use apicheck_common::schema::sales;
use apicheck_common::schema_export::export_schemas;
use apicheck_common::{
    LogConfig, LogFormat, Overrides, RenderOptions, ReportDocument, RequestClient, TestRunner,
    VerifierConfig, init_logging, render_text,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

/// Every check passed.
const EXIT_CLEAN: u8 = 0;
/// At least one check failed.
const EXIT_FAILURES: u8 = 1;
/// Configuration or check definitions are broken; results are partial.
const EXIT_ABORTED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "apicheck",
    version,
    about = "Verify a running sales service against its declared JSON contracts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the verification suite and write the report
    Run {
        /// Service base URL (default http://localhost:8080)
        #[arg(long)]
        base_url: Option<String>,

        /// Config file (default ./apicheck.toml, then the user config dir)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Where to write the JSON report
        #[arg(long)]
        report: Option<PathBuf>,

        /// Per-request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Only run these categories (repeatable)
        #[arg(long = "category", value_name = "NAME")]
        categories: Vec<String>,
    },

    /// List the registered interface schemas
    Schemas,

    /// Show the effective configuration and where each value came from
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write the report JSON Schema and failure code catalog
    ExportSchema {
        /// Output directory
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env();
    if cli.verbose {
        log_config = log_config.with_level("debug");
    }
    if cli.log_json {
        log_config = log_config.with_format(LogFormat::Json);
    }
    log_config = log_config.with_ansi(!cli.no_color && std::io::stderr().is_terminal());
    if cli.no_color {
        colored::control::set_override(false);
    }
    if let Err(err) = init_logging(&log_config) {
        eprintln!("warning: {err}");
    }

    let result = match cli.command {
        Commands::Run {
            base_url,
            config,
            report,
            timeout_ms,
            categories,
        } => run(
            Overrides {
                config_path: config,
                base_url,
                timeout_ms,
                report_path: report,
                categories,
            },
            cli.no_color,
        ),
        Commands::Schemas => list_schemas(),
        Commands::Config { config } => show_config(Overrides {
            config_path: config,
            ..Overrides::default()
        }),
        Commands::ExportSchema { dir } => export(dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(EXIT_ABORTED)
        }
    }
}

fn run(overrides: Overrides, no_color: bool) -> Result<u8> {
    let config = VerifierConfig::load(&overrides).context("invalid configuration")?;
    for (key, value, source) in config.describe() {
        debug!(key, value = %value, source = %source, "config");
    }

    let registry = sales::registry().context("built-in schemas are inconsistent")?;
    let mut suite = default_suite_for_today().filtered(&config.categories.value)?;
    suite.apply_budget_overrides(&config.budgets.value);

    let base_url = config.base_url.value.as_str();
    info!(base_url, checks = suite.check_count(), "verifying service");
    let client = RequestClient::new(base_url, config.timeout());
    let summary = TestRunner::new(&registry, &client).run(&suite);
    let report = summary.report();

    let options = RenderOptions {
        color: !no_color && std::io::stdout().is_terminal(),
    };
    print!("{}", render_text(&report, base_url, options));

    let report_path = &config.report_path.value;
    ReportDocument::new(base_url, report.clone(), summary.aborted.as_ref())
        .write_to(report_path)?;
    println!("\nReport written to {}", report_path.display());

    if let Some(err) = &summary.aborted {
        eprintln!("{} {err}", "aborted:".red().bold());
        return Ok(EXIT_ABORTED);
    }
    Ok(if report.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_FAILURES
    })
}

fn list_schemas() -> Result<u8> {
    let registry = sales::registry()?;
    for schema in registry.iter() {
        println!("{}", schema.name().bold());
        println!("  required: {}", schema.required_fields().join(", "));
        if !schema.optional_fields().is_empty() {
            println!("  optional: {}", schema.optional_fields().join(", "));
        }
        let kinds: Vec<String> = schema
            .field_kinds()
            .iter()
            .map(|(field, kind)| format!("{field}:{kind}"))
            .collect();
        if !kinds.is_empty() {
            println!("  types:    {}", kinds.join(", "));
        }
    }
    Ok(EXIT_CLEAN)
}

fn show_config(overrides: Overrides) -> Result<u8> {
    let config = VerifierConfig::load(&overrides).context("invalid configuration")?;
    match &config.config_file {
        Some(path) => println!("config file: {}", path.display()),
        None => println!("config file: (none)"),
    }
    if let Some(path) = user_config_path() {
        println!("user config: {}", path.display());
    }
    for (key, value, source) in config.describe() {
        println!("{key:<12} = {value}  [{source}]");
    }
    Ok(EXIT_CLEAN)
}

fn export(dir: PathBuf) -> Result<u8> {
    let result = export_schemas(&dir)
        .with_context(|| format!("failed to export schemas to {}", dir.display()))?;
    for file in &result.files {
        println!("{file}");
    }
    println!("{} files written to {}", result.files_generated, result.output_dir);
    Ok(EXIT_CLEAN)
}
