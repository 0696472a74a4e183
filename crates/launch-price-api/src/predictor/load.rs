use std::path::Path;

use super::{DecisionTreeScorer, RawTree};
use crate::error::ArtifactError;

pub fn from_json_str(s: &str, path: &Path) -> Result<DecisionTreeScorer, ArtifactError> {
    let raw: RawTree = serde_json::from_str(s).map_err(|e| ArtifactError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    DecisionTreeScorer::from_raw(raw).map_err(|e| ArtifactError::invalid(path, e.to_string()))
}

pub fn load_from_file(path: &Path) -> Result<DecisionTreeScorer, ArtifactError> {
    let content = crate::artifacts::read_artifact(path)?;
    from_json_str(&content, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::Scorer;

    #[test]
    fn parse_tree() {
        let json = r#"{
            "n_features": 5,
            "children_left": [1, -1, -1],
            "children_right": [2, -1, -1],
            "feature": [2, -2, -2],
            "threshold": [0.5, -2.0, -2.0],
            "value": [70.0, 164.0, 50.0]
        }"#;
        let tree = from_json_str(json, Path::new("decision_tree.json")).expect("parse ok");
        assert_eq!(tree.n_features(), 5);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn structural_fault_is_invalid() {
        let json = r#"{
            "n_features": 5,
            "children_left": [1, -1],
            "children_right": [5, -1],
            "feature": [0, -2],
            "threshold": [0.5, -2.0],
            "value": [0.0, 1.0]
        }"#;
        let err = from_json_str(json, Path::new("decision_tree.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }), "got {err:?}");
    }
}
