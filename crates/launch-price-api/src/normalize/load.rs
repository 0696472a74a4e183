use std::path::Path;

use super::{RawScaler, ScalerParams};
use crate::error::ArtifactError;

pub fn from_json_str(s: &str, path: &Path) -> Result<ScalerParams, ArtifactError> {
    let raw: RawScaler = serde_json::from_str(s).map_err(|e| ArtifactError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    ScalerParams::from_raw(raw).map_err(|e| ArtifactError::invalid(path, e.to_string()))
}

pub fn load_from_file(path: &Path) -> Result<ScalerParams, ArtifactError> {
    let content = crate::artifacts::read_artifact(path)?;
    from_json_str(&content, path)
}
