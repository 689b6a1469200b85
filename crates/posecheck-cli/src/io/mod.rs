pub mod euroc;
pub mod kitti;
pub mod tum;

pub use euroc::read_euroc_csv_trajectory;
pub use kitti::read_kitti_poses_file;
pub use tum::read_tum_trajectory_file;

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::errors::{CliError, Result};

/// One parsed data line: its 1-based line number and numeric columns.
pub(crate) struct Row {
    pub line: usize,
    pub values: Vec<f64>,
}

/// Reads a whitespace separated numeric matrix with `#` comment lines.
///
/// Every data line must hold exactly `columns` values.
pub(crate) fn read_rows(path: &Path, format: &'static str, columns: usize) -> Result<Vec<Row>> {
    let file = File::open(path)
        .map_err(|_| CliError::TrajectoryFileNotFound(path.display().to_string()))?;

    let mut reader = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);

        let fields: Vec<&str> = record.iter().filter(|field| !field.is_empty()).collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != columns {
            return Err(CliError::FileFormat {
                format,
                line,
                message: format!("expected {columns} columns, found {}", fields.len()),
            });
        }

        let values = fields
            .iter()
            .map(|field| {
                field.parse::<f64>().map_err(|e| CliError::FileFormat {
                    format,
                    line,
                    message: format!("invalid number '{field}': {e}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        rows.push(Row { line, values });
    }

    if rows.is_empty() {
        return Err(CliError::FileFormat {
            format,
            line: 0,
            message: format!("no poses found in {}", path.display()),
        });
    }
    Ok(rows)
}
