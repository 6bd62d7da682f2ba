use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use eod_report::error::EodResult;
use eod_report::{cli, logging};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eod-report")]
#[command(about = "Fill an end-of-day tour report template from a dispatch sheet")]
#[command(long_about = "EOD Report - dispatch sheet in, formatted end-of-day report out

Reads tour dispatch rows, sums adult and child counts per tour, and writes
one copy of the template's repeating section per tour. Every font, border,
merge and number format of the template is kept.

COMMANDS:
  generate        - Produce a filled report
  extract         - Show the per-tour records found in a dispatch file
  check-template  - Confirm a template matches the layout
  layout          - Print the default layout as YAML

EXAMPLES:
  eod-report generate -d dispatch.xlsx -t template.xlsx -o eod.xlsx
  eod-report extract dispatch.xlsx --json
  eod-report layout > layout.yaml")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Produce a filled EOD report.

The first tour is written into the template block itself; each further tour
gets a copy of the block directly below the previous one. Totals go to the
layout's total cells. Nothing is written if the run fails.

LAYOUT:
  Block rows, placeholder tokens, total cells and header aliases come from a
  YAML layout (see 'eod-report layout'). Without one the built-in layout is
  used: rows 17-25, columns A-H, totals in C10 and E10.")]
    /// Produce a filled report
    Generate {
        /// Dispatch spreadsheet (.xlsx, .xls, .ods) or JSON export
        #[arg(short, long)]
        dispatch: PathBuf,

        /// Report template (.xlsx)
        #[arg(short, long)]
        template: PathBuf,

        /// Output report file (.xlsx)
        #[arg(short, long)]
        output: PathBuf,

        /// Layout YAML file
        #[arg(short, long, env = "EOD_LAYOUT")]
        layout: Option<PathBuf>,

        /// Report date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Show verbose steps and debug logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show the per-tour records found in a dispatch file
    Extract {
        /// Dispatch spreadsheet or JSON export
        dispatch: PathBuf,

        /// Layout YAML file (for header aliases)
        #[arg(short, long, env = "EOD_LAYOUT")]
        layout: Option<PathBuf>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Confirm a template matches the layout
    CheckTemplate {
        /// Report template (.xlsx)
        template: PathBuf,

        /// Layout YAML file
        #[arg(short, long, env = "EOD_LAYOUT")]
        layout: Option<PathBuf>,
    },

    /// Print the default layout as YAML
    Layout,
}

fn main() -> EodResult<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Generate { verbose: true, .. });
    logging::init(verbose);

    match cli.command {
        Commands::Generate {
            dispatch,
            template,
            output,
            layout,
            date,
            verbose,
        } => cli::generate(dispatch, template, output, layout, date, verbose),

        Commands::Extract {
            dispatch,
            layout,
            json,
        } => cli::extract(dispatch, layout, json),

        Commands::CheckTemplate { template, layout } => cli::check_template(template, layout),

        Commands::Layout => cli::layout(),
    }
}
