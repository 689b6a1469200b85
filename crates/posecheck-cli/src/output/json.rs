use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::{info, warn};
use posecheck_core::result::EvalResult;

use crate::errors::{CliError, Result};

/// Writes `result` as pretty JSON.
///
/// With `confirm_overwrite` an existing file is left alone and reported as
/// [`CliError::OutputExists`]; otherwise it is replaced.
pub fn save_result_file(path: &Path, result: &EvalResult, confirm_overwrite: bool) -> Result<()> {
    if path.exists() {
        if confirm_overwrite {
            return Err(CliError::OutputExists(path.display().to_string()));
        }
        warn!("Overwriting {}", path.display());
    }
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, result)?;
    writer.flush()?;
    info!("Saved results to {}", path.display());
    Ok(())
}

pub fn load_result_file(path: &Path) -> Result<EvalResult> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
