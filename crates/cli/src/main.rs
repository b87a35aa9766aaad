// tally - reconcile a bookkeeping ledger against a bank statement

mod commands;
mod config;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tally_export::OutputFormat;
use tally_reconcile::{MatchStrategy, ReconcileMode};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
/// `check` found dates that needed an adjustment or a placeholder.
pub const EXIT_UNRECONCILED: u8 = 2;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Reconcile a bookkeeping ledger against a bank statement")]
#[command(version)]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile and write the Matches, Bookkeeping and Bank collections
    #[command(after_help = "\
Examples:
  tally run ledgers.xlsx
  tally run ledgers.xlsx --format csv -o out/
  tally run --bookkeeping books.csv --bank statement.csv --strategy grouped")]
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Output path (a directory for csv)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'f')]
        format: Option<FormatArg>,
    },

    /// Reconcile and print the summary; exit 2 when any date needed a synthetic record
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Print the default run profile as TOML
    Profile,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Workbook holding one sheet per ledger
    #[arg(required_unless_present_all = ["bookkeeping", "bank"], conflicts_with_all = ["bookkeeping", "bank"])]
    pub workbook: Option<PathBuf>,

    /// Bookkeeping ledger as CSV
    #[arg(long, requires = "bank")]
    pub bookkeeping: Option<PathBuf>,

    /// Bank statement as CSV
    #[arg(long, requires = "bookkeeping")]
    pub bank: Option<PathBuf>,

    /// Run profile (TOML)
    #[arg(long, short = 'c', env = "TALLY_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub strategy: Option<StrategyArg>,

    #[arg(long)]
    pub mode: Option<ModeArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Xlsx,
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StrategyArg {
    /// One bookkeeping record per bank record
    Exact,
    /// Also match small bookkeeping subsets to one bank record
    Grouped,
}

impl From<StrategyArg> for MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Exact => MatchStrategy::Exact,
            StrategyArg::Grouped => MatchStrategy::Grouped,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Match per date and book the difference as a System record
    Summation,
    /// Match on date and amount only; no synthetic records
    Direct,
}

impl From<ModeArg> for ReconcileMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Summation => ReconcileMode::Summation,
            ModeArg::Direct => ReconcileMode::Direct,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { input, output, format } => commands::cmd_run(&input, output, format.map(Into::into)),
        Commands::Check { input } => commands::cmd_check(&input),
        Commands::Profile => commands::cmd_profile(),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
