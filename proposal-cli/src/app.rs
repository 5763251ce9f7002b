//! The `proposal` subcommands, kept out of `main` so they can be tested.

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use proposal_core::{DerivedRecord, ProposalEngine, ProposalStatus, folder_name};
use proposal_data::{
    FormFields, SheetGrid, decode_form,
    document::{output_stem, placeholders, render_file},
    encode_record, loader,
    sheet::{read_profit_summary, write_profit_summary},
};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::logging::log_task_error;

// ─── Recalculation ──────────────────────────────────────────────────────────

/// Decodes and recalculates every row, logging one summary line per proposal.
pub fn recalculate_rows(
    engine: &ProposalEngine,
    rows: &[FormFields],
) -> Vec<DerivedRecord> {
    rows.iter()
        .map(|fields| {
            let submission = decode_form(fields);
            let record = engine.recalculate(&submission.current, &submission.previous);
            log_summary(&record);
            record
        })
        .collect()
}

fn log_summary(record: &DerivedRecord) {
    info!(
        customer = %record.site.customer_name,
        street = %record.site.street_address,
        total_10 = %record.total_price.ten,
        profit = %record.profit,
        daily_profit = %record.daily_profit,
        "recalculated proposal"
    );
}

fn write_output(
    records: &[DerivedRecord],
    output: Option<&Path>,
) -> Result<()> {
    let encoded: Vec<FormFields> = records.iter().map(encode_record).collect();
    match output {
        Some(path) => loader::write_records_to_file(path, &encoded)
            .with_context(|| format!("cannot write '{}'", path.display())),
        None => loader::write_records(io::stdout().lock(), &encoded)
            .context("cannot write to stdout"),
    }
}

/// `proposal recalc`: returns the number of rows processed.
pub fn recalc(
    engine: &ProposalEngine,
    input: &Path,
    output: Option<&Path>,
) -> Result<usize> {
    let rows = loader::load_from_file(input)?;
    let records = recalculate_rows(engine, &rows);
    write_output(&records, output)?;
    Ok(records.len())
}

/// `proposal import`: recalculates a saved profit summary as a fresh revision.
pub fn import(
    engine: &ProposalEngine,
    sheet: &Path,
    output: Option<&Path>,
) -> Result<DerivedRecord> {
    let grid = SheetGrid::load(sheet)?;
    let inputs = read_profit_summary(&grid)?;
    let record = engine.recalculate_imported(&inputs);
    log_summary(&record);
    write_output(std::slice::from_ref(&record), output)?;
    Ok(record)
}

// ─── Rendering ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub input: PathBuf,
    pub template: PathBuf,
    pub out_dir: PathBuf,
    pub sheet_template: Option<PathBuf>,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub written: usize,
    pub failed: usize,
}

/// Writes the proposal document and profit summary for one record.
fn write_artefacts(
    record: &DerivedRecord,
    template: &Path,
    out_dir: &Path,
    base_grid: &SheetGrid,
    date: NaiveDate,
) -> Result<()> {
    let street = &record.site.street_address;

    let document = out_dir.join(format!("{}.txt", output_stem(record.product, street)));
    render_file(template, &document, &placeholders(record, date))?;

    let mut grid = base_grid.clone();
    write_profit_summary(&mut grid, &encode_record(record))?;
    grid.save(&out_dir.join(format!("Profit Summary - {street}.csv")))?;

    debug!(street = %street, "wrote proposal artefacts");
    Ok(())
}

/// `proposal render`: one blocking worker per proposal.
///
/// Worker failures are logged and counted; they do not stop the other
/// workers.
pub async fn render(
    engine: &ProposalEngine,
    options: RenderOptions,
) -> Result<RenderSummary> {
    if !options.template.is_file() {
        bail!("template '{}' does not exist", options.template.display());
    }
    std::fs::create_dir_all(&options.out_dir)
        .with_context(|| format!("cannot create '{}'", options.out_dir.display()))?;

    let base_grid = match &options.sheet_template {
        Some(path) => SheetGrid::load(path)?,
        None => SheetGrid::new(),
    };
    let base_grid = Arc::new(base_grid);
    let template = Arc::new(options.template);
    let out_dir = Arc::new(options.out_dir);

    let rows = loader::load_from_file(&options.input)?;
    let mut workers = JoinSet::new();
    for record in recalculate_rows(engine, &rows) {
        let base_grid = Arc::clone(&base_grid);
        let template = Arc::clone(&template);
        let out_dir = Arc::clone(&out_dir);
        let date = options.date;
        workers.spawn_blocking(move || {
            write_artefacts(&record, &template, &out_dir, &base_grid, date)
                .with_context(|| format!("proposal for '{}'", record.site.street_address))
        });
    }

    let mut summary = RenderSummary::default();
    while let Some(joined) = workers.join_next().await {
        let result = joined.map_err(anyhow::Error::from).and_then(|r| r);
        if result.is_ok() {
            summary.written += 1;
        } else {
            summary.failed += 1;
        }
        log_task_error("render", result);
    }

    info!(written = summary.written, failed = summary.failed, "render finished");
    Ok(summary)
}

// ─── Lifecycle ──────────────────────────────────────────────────────────────

/// `proposal transition`: lists the folders that would move from `from` to `to`.
pub fn transition(
    input: &Path,
    from: &str,
    to: &str,
) -> Result<Vec<String>> {
    let from = ProposalStatus::parse(from)?;
    let to = from.move_to(ProposalStatus::parse(to)?)?;

    let rows = loader::load_from_file(input)?;
    let lines = rows
        .iter()
        .map(|fields| {
            let site = decode_form(fields).current.site;
            format!("{}: {from} -> {to}", folder_name(&site))
        })
        .collect::<Vec<_>>();
    info!(count = lines.len(), %from, %to, "planned status change");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proposal_data::form::field;
    use rust_decimal_macros::dec;

    use super::*;

    const FORMS_CSV: &str = "\
customer_name,street_address,current_roof,product,warranty_incl,submitted_by,squares
Harbor Storage,12 Dock Rd,TPO/EPDM,Gaco,Yes,Vern Abbott,100
Ridge Farms,400 Orchard Ln,Mod Bit,Gaco,No,David Estes,47
";

    const TEMPLATE: &str = "[[CustomerName]] owes $[[10YrTotalPrice]] on [[Date]]\n";

    /// A fresh directory under the system temp dir, unique to this test.
    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("proposal-cli-{}-{test}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("scratch dir should be creatable");
        dir
    }

    fn write_forms(dir: &Path) -> PathBuf {
        let path = dir.join("forms.csv");
        std::fs::write(&path, FORMS_CSV).unwrap();
        path
    }

    // =========================================================================
    // recalc / import tests
    // =========================================================================

    #[test]
    fn recalc_writes_echo_back_file() {
        let dir = scratch_dir("recalc");
        let output = dir.join("out.csv");

        let count = recalc(&ProposalEngine::default(), &write_forms(&dir), Some(&output)).unwrap();

        assert_eq!(count, 2);
        let rows = loader::load_from_file(&output).unwrap();
        assert_eq!(rows[0][field::TOTAL_PRICE_10], "34000");
        assert_eq!(rows[1][field::TOTAL_PRICE_10], "15980");
        assert_eq!(rows[1][field::PREVIOUS_SQUARES], "47");
    }

    #[test]
    fn oversized_row_does_not_abort_the_batch() {
        let csv = "\
customer_name,current_roof,product,squares,gaco_patch_units,gaco_patch_price,previous_squares,previous_roof_type,previous_product
Harbor Storage,TPO/EPDM,Gaco,100,100000000000000000000,100000000000000000000,100,TPO/EPDM,Gaco
Ridge Farms,Mod Bit,Gaco,47,,,,,
";
        let rows = loader::load_from_str(csv).unwrap();

        let records = recalculate_rows(&ProposalEngine::default(), &rows);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].patch.total, rust_decimal::Decimal::MAX);
        assert_eq!(records[1].patch.units, dec!(5));
    }

    #[test]
    fn recalc_missing_input_is_an_error() {
        let result = recalc(&ProposalEngine::default(), Path::new("no/such/forms.csv"), None);
        assert!(result.is_err());
    }

    #[test]
    fn import_recalculates_saved_summary() {
        let dir = scratch_dir("import");
        let engine = ProposalEngine::default();
        let rows = loader::load_from_str(FORMS_CSV).unwrap();
        let record = &recalculate_rows(&engine, &rows)[0];

        let mut grid = SheetGrid::new();
        write_profit_summary(&mut grid, &encode_record(record)).unwrap();
        let sheet = dir.join("summary.csv");
        grid.save(&sheet).unwrap();

        let imported = import(&engine, &sheet, Some(&dir.join("imported.csv"))).unwrap();

        assert_eq!(imported.total_price.ten, dec!(34000));
        assert_eq!(imported.profit, record.profit);
        assert!(dir.join("imported.csv").is_file());
    }

    // =========================================================================
    // render tests
    // =========================================================================

    #[tokio::test]
    async fn render_writes_document_and_summary_per_row() {
        let dir = scratch_dir("render");
        let template = dir.join("template.txt");
        std::fs::write(&template, TEMPLATE).unwrap();
        let out_dir = dir.join("out");

        let summary = render(
            &ProposalEngine::default(),
            RenderOptions {
                input: write_forms(&dir),
                template,
                out_dir: out_dir.clone(),
                sheet_template: None,
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            },
        )
        .await
        .unwrap();

        assert_eq!(summary, RenderSummary { written: 2, failed: 0 });
        let document =
            std::fs::read_to_string(out_dir.join("Gaco S42 Proposal - 12 Dock Rd.txt")).unwrap();
        assert_eq!(document, "Harbor Storage owes $34,000 on March 05, 2024\n");
        assert!(out_dir.join("Profit Summary - 400 Orchard Ln.csv").is_file());
    }

    #[tokio::test]
    async fn render_without_template_fails_before_spawning() {
        let dir = scratch_dir("render-missing");

        let result = render(
            &ProposalEngine::default(),
            RenderOptions {
                input: write_forms(&dir),
                template: dir.join("missing.txt"),
                out_dir: dir.join("out"),
                sheet_template: None,
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            },
        )
        .await;

        assert!(result.is_err());
        assert!(!dir.join("out").exists());
    }

    // =========================================================================
    // transition tests
    // =========================================================================

    #[test]
    fn transition_lists_folders() {
        let dir = scratch_dir("transition");

        let lines = transition(&write_forms(&dir), "open", "under-contract").unwrap();

        assert_eq!(
            lines,
            vec![
                "Harbor Storage - 12 Dock Rd: open -> under-contract".to_string(),
                "Ridge Farms - 400 Orchard Ln: open -> under-contract".to_string(),
            ]
        );
    }

    #[test]
    fn illegal_transition_fails_without_reading_input() {
        let result = transition(Path::new("no/such/forms.csv"), "dead", "open");

        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("cannot move a proposal from dead to open"));
    }
}
