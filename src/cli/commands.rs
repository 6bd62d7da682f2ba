use crate::config::ReportLayout;
use crate::core::ReportGenerator;
use crate::error::{EodError, EodResult};
use crate::excel::{DispatchImporter, ReportExporter, TemplateLoader};
use crate::types::{RecordSet, ReportSummary};
use crate::workbook::column_letter;
use chrono::NaiveDate;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Load the layout file if one was given, otherwise the built-in layout
pub fn load_layout(path: Option<&Path>) -> EodResult<ReportLayout> {
    match path {
        Some(path) => ReportLayout::from_file(path),
        None => Ok(ReportLayout::default()),
    }
}

/// Execute the generate command
pub fn generate(
    dispatch: PathBuf,
    template: PathBuf,
    output: PathBuf,
    layout: Option<PathBuf>,
    date: Option<NaiveDate>,
    verbose: bool,
) -> EodResult<()> {
    println!("{}", "📋 EOD Report - Generating report".bold().green());
    println!("   Dispatch: {}", dispatch.display());
    println!("   Template: {}", template.display());
    println!("   Output:   {}\n", output.display());

    let layout = load_layout(layout.as_deref())?;
    let mut generator = ReportGenerator::new(layout);
    if let Some(date) = date {
        generator = generator.with_report_date(date);
    }

    if verbose {
        println!("{}", "📖 Reading dispatch file...".cyan());
    }
    let data = DispatchImporter::new(&dispatch).import()?;
    if verbose {
        println!(
            "   Found {} sheets, {} rows\n",
            data.sheets.len(),
            data.row_count()
        );
        println!("{}", "📖 Loading template...".cyan());
    }
    let mut workbook = TemplateLoader::load(&template)?;

    let summary = match generator.generate(&data, &mut workbook) {
        Ok(summary) => summary,
        Err(e) => {
            print_failure(&e);
            return Err(e);
        }
    };

    if verbose {
        println!("{}", "💾 Writing report...".cyan());
    }
    let anomalies = ReportExporter::new(&workbook).export(&output)?;

    print_summary(&summary);
    if anomalies > 0 {
        println!(
            "{}",
            format!(
                "⚠️  {} formatting attribute(s) could not be carried over (see log)",
                anomalies
            )
            .yellow()
        );
    }
    println!("{}", "✅ Report generated".bold().green());
    println!("   Report file: {}\n", output.display());
    Ok(())
}

/// Execute the extract command
pub fn extract(dispatch: PathBuf, layout: Option<PathBuf>, json: bool) -> EodResult<()> {
    let layout = load_layout(layout.as_deref())?;
    let data = DispatchImporter::new(&dispatch).import()?;
    let records = ReportGenerator::new(layout).extract(&data)?;

    if json {
        let list: Vec<_> = records.values().collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    println!("{}", "📋 EOD Report - Dispatch records".bold().green());
    println!("   File: {}\n", dispatch.display());
    print_records(&records);
    Ok(())
}

/// Execute the check-template command
pub fn check_template(template: PathBuf, layout: Option<PathBuf>) -> EodResult<()> {
    println!("{}", "🔍 EOD Report - Checking template".bold().green());
    println!("   File: {}\n", template.display());

    let layout = load_layout(layout.as_deref())?;
    layout.validate()?;
    let workbook = TemplateLoader::load(&template)?;
    let located = match ReportGenerator::new(layout).locate(&workbook) {
        Ok(located) => located,
        Err(e) => {
            print_failure(&e);
            return Err(e);
        }
    };

    let block = located.block;
    println!("   Sheet: {}", located.sheet_name.bright_blue().bold());
    println!(
        "   Block: rows {}-{}, columns {}-{} ({} rows per section)",
        block.start_row,
        block.end_row,
        column_letter(block.first_col),
        column_letter(block.last_col),
        block.height()
    );
    println!("   Placeholders:");
    for token in &located.placeholders {
        println!(
            "      {}{} → {}",
            column_letter(token.col),
            token.row,
            token.kind.to_string().cyan()
        );
    }
    println!("\n{}", "✅ Template is usable".bold().green());
    Ok(())
}

/// Execute the layout command
pub fn layout() -> EodResult<()> {
    print!("{}", ReportLayout::default().to_yaml()?);
    Ok(())
}

fn print_records(records: &RecordSet) {
    if records.is_empty() {
        println!("{}", "⚠️  No tour records found".yellow());
        return;
    }
    for record in records.values() {
        println!(
            "   🚌 {}: {} adult(s), {} child(ren)",
            record.tour_name.bright_blue().bold(),
            record.adult_count,
            record.child_count
        );
    }
    println!("\n   {} tour(s)", records.len());
}

fn print_summary(summary: &ReportSummary) {
    if summary.sections.is_empty() {
        println!(
            "{}",
            "⚠️  No tour records found; template block left as is".yellow()
        );
    }
    for section in &summary.sections {
        println!(
            "   🚌 {} → rows {}-{}",
            section.tour_name.bright_blue().bold(),
            section.start_row,
            section.end_row
        );
    }
    println!(
        "\n   Totals: {} adult(s), {} child(ren)\n",
        summary.totals.adult.to_string().bold(),
        summary.totals.child.to_string().bold()
    );
}

fn print_failure(error: &EodError) {
    println!("{}", format!("❌ {}", error).bold().red());
    if error.is_user_facing() {
        println!(
            "{}",
            "   Check the uploaded files and the layout, then try again.".yellow()
        );
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
