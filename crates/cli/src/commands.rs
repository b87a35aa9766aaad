use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tally_export::{write_result, OutputFormat};
use tally_core::LedgerSide;
use tally_import::{import_csv_file, import_workbook, ImportProfile, Ledgers};
use tally_reconcile::{Reconciler, ReconciliationResult, RunSummary};
use tracing::info;

use crate::config::Config;
use crate::{InputArgs, EXIT_SUCCESS, EXIT_UNRECONCILED};

pub fn cmd_run(input: &InputArgs, output: Option<PathBuf>, format: Option<OutputFormat>) -> Result<u8> {
    let config = resolve_config(input)?;
    let result = reconcile_inputs(input, &config)?;

    let format = format.unwrap_or(config.output.format);
    let path = output.unwrap_or_else(|| default_output_path(input, format));
    write_result(&result, format, &path)
        .with_context(|| format!("Failed to write {} output to {}", format, path.display()))?;
    info!(path = %path.display(), format = %format, "wrote reconciliation");

    print!("{}", render_summary(&result.summary()));
    println!("written: {}", path.display());
    Ok(EXIT_SUCCESS)
}

pub fn cmd_check(input: &InputArgs) -> Result<u8> {
    let config = resolve_config(input)?;
    let result = reconcile_inputs(input, &config)?;

    print!("{}", render_summary(&result.summary()));
    Ok(if result.is_clean() { EXIT_SUCCESS } else { EXIT_UNRECONCILED })
}

pub fn cmd_profile() -> Result<u8> {
    print!("{}", Config::default().to_toml()?);
    Ok(EXIT_SUCCESS)
}

fn resolve_config(input: &InputArgs) -> Result<Config> {
    let mut config = Config::load(input.config.as_deref()).with_context(|| {
        format!(
            "Failed to load config {}",
            input.config.as_deref().map(|p| p.display().to_string()).unwrap_or_default()
        )
    })?;
    apply_overrides(&mut config, input);
    Ok(config)
}

/// Command-line flags take precedence over the profile.
fn apply_overrides(config: &mut Config, input: &InputArgs) {
    if let Some(strategy) = input.strategy {
        config.reconcile.strategy = strategy.into();
    }
    if let Some(mode) = input.mode {
        config.reconcile.mode = mode.into();
    }
}

fn reconcile_inputs(input: &InputArgs, config: &Config) -> Result<ReconciliationResult> {
    let ledgers = load_ledgers(input, &config.import)?;
    info!(
        bookkeeping = ledgers.bookkeeping.len(),
        bank = ledgers.bank.len(),
        "ledgers loaded"
    );
    Ok(Reconciler::new(config.reconcile.clone()).run(&ledgers.bookkeeping, &ledgers.bank))
}

fn load_ledgers(input: &InputArgs, profile: &ImportProfile) -> Result<Ledgers> {
    if let Some(workbook) = &input.workbook {
        return import_workbook(workbook, profile)
            .with_context(|| format!("Failed to read workbook {}", workbook.display()));
    }

    let (Some(bookkeeping), Some(bank)) = (&input.bookkeeping, &input.bank) else {
        bail!("Either a workbook or both --bookkeeping and --bank are required");
    };
    let read = |path: &Path, side: LedgerSide| {
        import_csv_file(path, side, profile).with_context(|| format!("Failed to read {} ledger {}", side, path.display()))
    };
    Ok(Ledgers {
        bookkeeping: read(bookkeeping.as_path(), LedgerSide::Bookkeeping)?,
        bank: read(bank.as_path(), LedgerSide::Bank)?,
    })
}

/// `<stem>.reconciled.<ext>` next to a workbook; `reconciled[.<ext>]` next to
/// the bookkeeping CSV. CSV output is a directory, so it gets no extension.
fn default_output_path(input: &InputArgs, format: OutputFormat) -> PathBuf {
    let (dir, stem) = match (&input.workbook, &input.bookkeeping) {
        (Some(workbook), _) => (
            workbook.parent(),
            format!(
                "{}.reconciled",
                workbook.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default()
            ),
        ),
        (None, Some(bookkeeping)) => (bookkeeping.parent(), "reconciled".to_string()),
        (None, None) => (None, "reconciled".to_string()),
    };

    let name = match format.extension() {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    };
    dir.unwrap_or_else(|| Path::new("")).join(name)
}

fn render_summary(summary: &RunSummary) -> String {
    format!(
        "dates:            {}\n\
         matches:          {} ({} grouped)\n\
         adjustments:      {} (total {})\n\
         placeholders:     {}\n\
         unvisited dates:  {}\n\
         remaining:        {} bookkeeping, {} bank\n",
        summary.dates_processed,
        summary.matches,
        summary.grouped_matches,
        summary.adjustments,
        summary.adjustment_total,
        summary.placeholders,
        summary.unvisited_dates,
        summary.remaining_bookkeeping,
        summary.remaining_bank,
    )
}
