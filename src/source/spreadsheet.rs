// driveupload/src/source/spreadsheet.rs
use calamine::{Data, Reader, open_workbook_auto};

use super::Row;
use crate::config::SourceConfig;
use crate::errors::AppError;

/// Reads one worksheet of an Excel/ODS workbook as text rows.
///
/// Uses the configured sheet, or the first sheet of the workbook.
pub fn read_workbook_rows(source_config: &SourceConfig) -> Result<Vec<Row>, AppError> {
    let path = &source_config.spreadsheet_path;
    let mut workbook = open_workbook_auto(path)?;

    let sheet_name = match &source_config.sheet_name {
        Some(name) => name.clone(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| AppError::Config(format!("Workbook {} has no sheets", path.display())))?,
    };
    log::debug!("Reading sheet '{}' from {}", sheet_name, path.display());

    let range = workbook.worksheet_range(&sheet_name)?;
    // The range only covers used cells, so it may not start at A1.
    let (first_row, first_col) = range.start().unwrap_or((0, 0));

    let rows = range
        .rows()
        .enumerate()
        .map(|(offset, cells)| {
            let cells = row_texts(first_col as usize, cells);
            Row::from_cells(first_row as usize + offset + 1, &cells, source_config)
        })
        .collect::<Vec<_>>();

    log::debug!("Read {} rows from sheet '{}'", rows.len(), sheet_name);
    Ok(rows)
}

/// Renders a worksheet row as text, padded so index 0 is column A.
fn row_texts(first_col: usize, cells: &[Data]) -> Vec<String> {
    std::iter::repeat_n(String::new(), first_col)
        .chain(cells.iter().map(cell_to_text))
        .collect()
}

/// Text form of a cell. Whole-number floats drop the fraction so numeric
/// folder codes read back as typed (`101.0` becomes `"101"`).
pub(crate) fn cell_to_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        other => other.to_string(),
    }
}
