use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::extract::{extract, Extraction};
use crate::parsing::xlsx;

#[derive(Args)]
pub struct ExtractArgs {
    /// Input workbook (.xlsx)
    #[arg(required = true)]
    pub input: PathBuf,
}

/// Execute extract subcommand
///
/// # Errors
///
/// Returns an error if the workbook cannot be read or decoded.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExtractArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let sheet = xlsx::load(&args.input)?;

    if verbose {
        eprintln!(
            "Read {} rows from sheet '{}'",
            sheet.grid.row_count(),
            sheet.sheet_name
        );
    }

    let extraction = extract(&sheet.grid, &sheet.sheet_name);

    if verbose {
        eprintln!(
            "Header on sheet row {} ({}), {} antigen columns ({})",
            extraction.trace.header_row + 1,
            extraction.trace.header_strategy,
            extraction.trace.antigen_columns.len(),
            extraction.trace.antigen_strategy,
        );
    }

    match format {
        OutputFormat::Text => print_text_results(&extraction),
        OutputFormat::Json => print_json_results(&extraction)?,
        OutputFormat::Tsv => print_tsv_results(&extraction),
    }

    Ok(())
}

fn print_text_results(extraction: &Extraction) {
    let panel = &extraction.panel;

    println!("Brand:  {}", or_dash(&panel.meta.brand));
    println!("Lot:    {}", or_dash(&panel.meta.lot));
    println!("Expiry: {}", or_dash(&panel.meta.expiry));
    println!("Sheet:  {}", panel.source_sheet_name);
    println!();

    if panel.cells.is_empty() {
        println!("No panel rows found.");
    } else {
        // Antigen order comes from the trace; the per-cell maps sort their keys.
        let labels: Vec<&str> = extraction
            .trace
            .antigen_columns
            .iter()
            .map(|c| c.label.as_str())
            .collect();

        let sel_width = width_of("Sel", panel.cells.iter().map(|c| c.sel.as_str()));
        let ref_width = width_of("Ref", panel.cells.iter().map(|c| c.reference.as_str()));
        let widths: Vec<usize> = labels
            .iter()
            .map(|label| {
                width_of(
                    label,
                    panel.cells.iter().map(|c| reaction(&c.antigen, label)),
                )
            })
            .collect();

        print!("{:<sel_width$}  {:<ref_width$}", "Sel", "Ref");
        for (label, width) in labels.iter().zip(widths.iter().copied()) {
            print!("  {label:<width$}");
        }
        println!();

        for cell in &panel.cells {
            print!("{:<sel_width$}  {:<ref_width$}", cell.sel, cell.reference);
            for (label, width) in labels.iter().zip(widths.iter().copied()) {
                print!("  {:<width$}", reaction(&cell.antigen, label));
            }
            println!();
        }
    }

    println!();
    if panel.auto.is_empty() {
        println!("No auto control row found.");
    } else {
        println!(
            "Auto control: 20C={}  37C={}  IAT={}  GEL={}",
            or_dash(&panel.auto.phase_20c),
            or_dash(&panel.auto.phase_37c),
            or_dash(&panel.auto.iat),
            or_dash(&panel.auto.gel),
        );
    }
}

fn print_json_results(extraction: &Extraction) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&extraction.panel)?);
    Ok(())
}

fn print_tsv_results(extraction: &Extraction) {
    let labels: Vec<&str> = extraction
        .trace
        .antigen_columns
        .iter()
        .map(|c| c.label.as_str())
        .collect();

    let mut columns = vec!["sel", "ref"];
    columns.extend(labels.iter().copied());
    println!("{}", columns.join("\t"));

    for cell in &extraction.panel.cells {
        let mut fields = vec![cell.sel.as_str(), cell.reference.as_str()];
        fields.extend(labels.iter().map(|label| reaction(&cell.antigen, label)));
        println!("{}", fields.join("\t"));
    }
}

fn reaction<'a>(antigen: &'a BTreeMap<String, String>, label: &str) -> &'a str {
    antigen.get(label).map_or("", String::as_str)
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn width_of<'a>(heading: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values
        .map(|value| value.chars().count())
        .fold(heading.chars().count(), usize::max)
}
