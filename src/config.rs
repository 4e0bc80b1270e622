//! Parameter-file loading for the command-line tools.

use std::fs;
use std::path::Path;

use crate::detector::BathyParams;

/// Load classifier parameters from a JSON file.
///
/// Absent keys fall back to their defaults, so a parameter file only needs
/// to name the knobs it changes. The loaded record is validated before use.
pub fn load_params(path: &Path) -> Result<BathyParams, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("failed to read params {}: {e}", path.display()))?;
    let params: BathyParams = serde_json::from_str(&contents)
        .map_err(|e| format!("failed to parse params {}: {e}", path.display()))?;
    params.validate()?;
    Ok(params)
}
