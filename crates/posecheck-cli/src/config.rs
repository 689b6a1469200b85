use std::fs;
use std::path::Path;

use log::{debug, warn};
use posecheck_eval::ApeConfig;
use serde_json::Value;

use crate::cli::Command;
use crate::errors::{CliError, Result};

/// Builds the run configuration from the command line, then lets keys of
/// the `--config` file (if any) override it.
pub fn resolve_config(command: &Command) -> Result<ApeConfig> {
    let config = config_from_args(command);
    match &command.common().config {
        Some(path) => {
            let overrides = load_config_file(path)?;
            merge_config(config, overrides)
        }
        None => Ok(config),
    }
}

fn config_from_args(command: &Command) -> ApeConfig {
    let common = command.common();
    let (ref_file, est_file) = command.files();
    let mut config = ApeConfig {
        pose_relation: common.pose_relation,
        align: common.align,
        correct_scale: common.correct_scale,
        n_to_align: common.n_to_align,
        align_origin: common.align_origin,
        ref_name: ref_file.display().to_string(),
        est_name: est_file.display().to_string(),
        ..ApeConfig::default()
    };
    if let Some(sync) = command.sync() {
        config.t_max_diff = sync.t_max_diff;
        config.t_offset = sync.t_offset;
        config.t_start = sync.t_start;
        config.t_end = sync.t_end;
    }
    config
}

/// Reads a JSON object, or YAML when the extension says so.
pub fn load_config_file(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)?;
    let value: Value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml" | "yml") => serde_yaml::from_str(&contents)?,
        _ => serde_json::from_str(&contents)?,
    };
    if !value.is_object() {
        return Err(CliError::InvalidConfig(format!(
            "{} must contain a mapping of option names to values",
            path.display()
        )));
    }
    debug!("Loaded config overrides from {}", path.display());
    Ok(value)
}

/// Overlays the keys of `overrides` onto `config`.
pub fn merge_config(config: ApeConfig, overrides: Value) -> Result<ApeConfig> {
    let mut merged = serde_json::to_value(config)?;
    if let (Some(target), Value::Object(source)) = (merged.as_object_mut(), overrides) {
        for (key, value) in source {
            if !target.contains_key(&key) {
                warn!("Ignoring unknown config key '{key}'");
                continue;
            }
            target.insert(key, value);
        }
    }
    Ok(serde_json::from_value(merged)?)
}
