//! fcreport CLI - Sales Forecast Report Generator
//!
//! Reads the sales/forecast workbook, computes per-SKU metrics and writes the
//! multi-sheet Excel report. Runs with no arguments as a batch job.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use fcreport_core::{MissingValuePolicy, ReportDate, DEFAULT_TOP_N};
use fcreport_engine::ReportBuilder;
use fcreport_render::ExcelRenderer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "fcreport")]
#[command(author, version, about = "Sales forecast vs. actuals report generator", long_about = None)]
struct Cli {
    /// Input workbook path
    #[arg(
        value_name = "INPUT",
        env = "FCREPORT_INPUT",
        default_value = "Commander_Data.xlsx"
    )]
    input: PathBuf,

    /// Output workbook path
    #[arg(
        short,
        long,
        env = "FCREPORT_OUTPUT",
        default_value = "Final_Sales_Report_Generated.xlsx"
    )]
    output: PathBuf,

    /// Report date (YYYY-MM-DD), defaults to today
    #[arg(long, env = "FCREPORT_DATE", value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// How to treat empty numeric cells
    #[arg(long, value_enum, default_value_t = MissingArg::Zero)]
    missing: MissingArg,

    /// Rows per overselling/underselling table
    #[arg(long, value_name = "N", default_value_t = DEFAULT_TOP_N)]
    top: usize,

    /// Print a per-group summary after writing
    #[arg(long, value_enum, default_value_t = SummaryFormat::Off)]
    summary: SummaryFormat,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MissingArg {
    /// Count empty cells as zero
    Zero,
    /// Fail on the first empty numeric cell
    Reject,
}

impl From<MissingArg> for MissingValuePolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Zero => MissingValuePolicy::Zero,
            MissingArg::Reject => MissingValuePolicy::Reject,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SummaryFormat {
    Text,
    Json,
    #[value(name = "none")]
    Off,
}

fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(cli.verbose)));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let date = ReportDate::new(cli.date.unwrap_or_else(|| Local::now().date_naive()));
    info!(%date, input = %cli.input.display(), "Generating report");

    let table = fcreport_loader::load_workbook(&cli.input)
        .with_context(|| format!("Failed to load {}", cli.input.display()))?;

    let report = ReportBuilder::new(date)
        .missing_values(cli.missing.into())
        .top_n(cli.top)
        .build(table)
        .context("Failed to compute report")?;

    ExcelRenderer::new()
        .save(&report, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    println!("Report saved successfully as {}", cli.output.display());

    let summary = report.summary();
    match cli.summary {
        SummaryFormat::Text => print!("{}", summary.to_text()),
        SummaryFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        SummaryFormat::Off => {}
    }

    Ok(())
}
