// driveupload/src/source/delimited.rs
use csv::ReaderBuilder;

use super::Row;
use crate::config::SourceConfig;
use crate::errors::AppError;

/// Reads a headerless CSV file. Records may have any number of fields.
pub fn read_csv_rows(source_config: &SourceConfig) -> Result<Vec<Row>, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&source_config.spreadsheet_path)?;

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        // Line numbers keep diagnostics pointing at the right line even when blank lines are skipped.
        let number = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(index + 1);
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        rows.push(Row::from_cells(number, &cells, source_config));
    }

    log::debug!(
        "Read {} rows from {}",
        rows.len(),
        source_config.spreadsheet_path.display()
    );
    Ok(rows)
}
