// driveupload/src/source/mod.rs
pub(crate) mod delimited;
pub(crate) mod spreadsheet;

use std::path::Path;

use crate::config::SourceConfig;
use crate::errors::AppError;

/// One spreadsheet row, reduced to the two columns the upload needs.
///
/// Missing cells are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based position in the sheet.
    pub number: usize,
    pub codes_field: String,
    pub link_field: String,
}

impl Row {
    pub fn new(number: usize, codes_field: impl Into<String>, link_field: impl Into<String>) -> Self {
        Row {
            number,
            codes_field: codes_field.into(),
            link_field: link_field.into(),
        }
    }

    /// Builds a row from all cells of a record, picking the configured columns.
    pub(crate) fn from_cells(number: usize, cells: &[String], source_config: &SourceConfig) -> Self {
        let cell = |index: usize| cells.get(index).cloned().unwrap_or_default();
        Row::new(number, cell(source_config.code_column), cell(source_config.link_column))
    }
}

/// Reads every row of the input file, in sheet order, with no header row.
pub fn read_rows(source_config: &SourceConfig) -> Result<Vec<Row>, AppError> {
    let path = source_config.spreadsheet_path.as_path();
    match extension_of(path).as_deref() {
        Some("csv") => delimited::read_csv_rows(source_config),
        Some("xlsx" | "xlsm" | "xls" | "xlsb" | "ods") => spreadsheet::read_workbook_rows(source_config),
        _ => Err(AppError::UnsupportedSource {
            path: path.to_path_buf(),
        }),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
