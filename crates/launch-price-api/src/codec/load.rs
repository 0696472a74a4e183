use std::path::Path;

use super::{RawVocabulary, Vocabulary};
use crate::error::ArtifactError;

pub fn from_json_str(s: &str, path: &Path) -> Result<Vocabulary, ArtifactError> {
    let raw: RawVocabulary = serde_json::from_str(s).map_err(|e| ArtifactError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Vocabulary::from_classes(raw.classes).map_err(|e| ArtifactError::invalid(path, e.to_string()))
}

pub fn load_from_file(path: &Path) -> Result<Vocabulary, ArtifactError> {
    let content = crate::artifacts::read_artifact(path)?;
    from_json_str(&content, path)
}
