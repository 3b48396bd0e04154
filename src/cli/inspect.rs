use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::extract::{extract, Extraction};
use crate::parsing::xlsx::{self, SourceSheet};

#[derive(Args)]
pub struct InspectArgs {
    /// Input workbook (.xlsx)
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute inspect subcommand
///
/// Shows where each heuristic landed: the header row, the antigen columns
/// with the worksheet column each one reads from, and the auto control row.
///
/// # Errors
///
/// Returns an error if the workbook cannot be read or decoded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: InspectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let sheet = xlsx::load(&args.input)?;

    if verbose {
        eprintln!("Grid contents:");
        for index in 0..sheet.grid.row_count() {
            eprintln!("  {:>3}: {}", index + 1, sheet.grid.row(index).join(" | "));
        }
    }

    let extraction = extract(&sheet.grid, &sheet.sheet_name);

    match format {
        OutputFormat::Text => print_text_results(&args, &sheet, &extraction),
        OutputFormat::Json => print_json_results(&args, &sheet, &extraction)?,
        OutputFormat::Tsv => print_tsv_results(&extraction),
    }

    Ok(())
}

fn print_text_results(args: &InspectArgs, sheet: &SourceSheet, extraction: &Extraction) {
    let trace = &extraction.trace;
    let meta = &extraction.panel.meta;

    println!("Workbook: {}", args.input.display());
    println!(
        "Sheet:    {} ({} rows)",
        sheet.sheet_name,
        sheet.grid.row_count()
    );
    println!();

    // Sheet rows and columns are 1-based here, matching what a spreadsheet shows.
    println!(
        "Header:   sheet row {} via {}",
        trace.header_row + 1,
        trace.header_strategy
    );
    println!(
        "Meta:     brand={:?} lot={:?} expiry={:?}",
        meta.brand, meta.lot, meta.expiry
    );
    match trace.auto_row {
        Some(row) => println!("Auto:     sheet row {}", row + 1),
        None => println!("Auto:     not found"),
    }
    println!("Cells:    {}", trace.data_rows);
    println!();

    println!("Antigen columns ({}):", trace.antigen_strategy);
    if trace.antigen_columns.is_empty() {
        println!("  (none)");
    }
    for column in &trace.antigen_columns {
        println!("  {:<8} sheet column {}", column.label, column.column + 1);
    }
}

fn print_json_results(
    args: &InspectArgs,
    sheet: &SourceSheet,
    extraction: &Extraction,
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "file": args.input.display().to_string(),
        "sheet": sheet.sheet_name,
        "rows": sheet.grid.row_count(),
        "trace": extraction.trace,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv_results(extraction: &Extraction) {
    println!("label\tcolumn");
    for column in &extraction.trace.antigen_columns {
        println!("{}\t{}", column.label, column.column);
    }
}
