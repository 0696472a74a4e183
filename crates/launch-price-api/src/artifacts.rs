//! Artifact bundle loading.
//!
//! A bundle is a directory holding `manifest.toml`, four vocabularies, the
//! year scaler and the exported tree. Everything is read once at startup; any
//! missing, unreadable or inconsistent file aborts loading.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codec::{self, CategoricalField, CategoryCodec};
use crate::error::ArtifactError;
use crate::features::{FEATURE_COUNT, FEATURE_ORDER};
use crate::normalize::{self, Normalizer};
use crate::predictor::{self, DecisionTreeScorer, Scorer};

pub const MANIFEST_FILE: &str = "manifest.toml";
pub const SUPPORTED_SCHEMA_VERSION: u32 = 1;

/// Bundle descriptor tying the artifacts to one feature layout and model version.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    pub schema_version: u32,
    pub model_version: String,
    pub feature_order: Vec<String>,
    #[serde(default)]
    pub files: ArtifactFiles,
}

/// File names inside the bundle directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArtifactFiles {
    pub organisation: String,
    pub rocket_status: String,
    pub mission_status: String,
    pub country: String,
    pub year_scaler: String,
    pub predictor: String,
}

impl Default for ArtifactFiles {
    fn default() -> Self {
        Self {
            organisation: "le_organisation.json".to_string(),
            rocket_status: "le_rocket_status.json".to_string(),
            mission_status: "le_mission_status.json".to_string(),
            country: "le_country.json".to_string(),
            year_scaler: "scaler_year.json".to_string(),
            predictor: "decision_tree.json".to_string(),
        }
    }
}

impl ArtifactFiles {
    pub fn vocabulary(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::Organisation => &self.organisation,
            CategoricalField::RocketStatus => &self.rocket_status,
            CategoricalField::MissionStatus => &self.mission_status,
            CategoricalField::Country => &self.country,
        }
    }
}

impl Manifest {
    pub fn from_toml_str(s: &str, path: &Path) -> Result<Self, ArtifactError> {
        toml::from_str(s).map_err(|e| ArtifactError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Refuse bundles whose layout differs from what this build assembles.
    pub fn check_compatible(&self, path: &Path) -> Result<(), ArtifactError> {
        let mismatch = |message: String| ArtifactError::ManifestMismatch {
            path: path.to_path_buf(),
            message,
        };
        if self.schema_version != SUPPORTED_SCHEMA_VERSION {
            return Err(mismatch(format!(
                "schema_version {} is not supported (expected {})",
                self.schema_version, SUPPORTED_SCHEMA_VERSION
            )));
        }
        if self.model_version.trim().is_empty() {
            return Err(mismatch("model_version must not be empty".to_string()));
        }
        if self.feature_order.len() != FEATURE_COUNT
            || self
                .feature_order
                .iter()
                .zip(FEATURE_ORDER.iter())
                .any(|(declared, expected)| declared != expected)
        {
            return Err(mismatch(format!(
                "feature_order {:?} differs from serving order {:?}",
                self.feature_order, FEATURE_ORDER
            )));
        }
        Ok(())
    }
}

/// Everything the pipeline needs, fully validated.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub manifest: Manifest,
    pub codec: CategoryCodec,
    pub normalizer: Normalizer,
    pub scorer: DecisionTreeScorer,
}

impl ArtifactBundle {
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        tracing::info!("loading artifact bundle from {}", dir.display());

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = Manifest::from_toml_str(&read_artifact(&manifest_path)?, &manifest_path)?;
        manifest.check_compatible(&manifest_path)?;
        tracing::info!(
            schema_version = manifest.schema_version,
            model_version = %manifest.model_version,
            "manifest accepted"
        );

        let load_vocab = |field: CategoricalField| -> Result<codec::Vocabulary, ArtifactError> {
            let path = dir.join(manifest.files.vocabulary(field));
            let vocab = codec::load_from_file(&path)?;
            tracing::info!(
                "loaded {} vocabulary ({} labels) from {}",
                field,
                vocab.len(),
                path.display()
            );
            Ok(vocab)
        };
        let codec = CategoryCodec::new(
            load_vocab(CategoricalField::Organisation)?,
            load_vocab(CategoricalField::RocketStatus)?,
            load_vocab(CategoricalField::MissionStatus)?,
            load_vocab(CategoricalField::Country)?,
        );

        let scaler_path = dir.join(&manifest.files.year_scaler);
        let year = normalize::load_from_file(&scaler_path)?;
        tracing::info!(
            "loaded year scaler (kind={}, training_range={:?}) from {}",
            year.kind_name(),
            year.training_range,
            scaler_path.display()
        );
        let normalizer = Normalizer::new(year);

        let tree_path = dir.join(&manifest.files.predictor);
        let scorer = predictor::load_from_file(&tree_path)?;
        if scorer.n_features() != FEATURE_COUNT {
            return Err(ArtifactError::invalid(
                &tree_path,
                format!(
                    "predictor was fit with {} features, serving assembles {}",
                    scorer.n_features(),
                    FEATURE_COUNT
                ),
            ));
        }
        tracing::info!(
            "loaded decision tree ({} nodes, {} leaves) from {}",
            scorer.node_count(),
            scorer.leaf_count(),
            tree_path.display()
        );

        Ok(Self {
            manifest,
            codec,
            normalizer,
            scorer,
        })
    }
}

pub(crate) fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    std::fs::read_to_string(path).map_err(|source| {
        let path = PathBuf::from(path);
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::MissingFile { path }
        } else {
            ArtifactError::Io { path, source }
        }
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::write_bundle;
    use super::*;

    #[test]
    fn loads_complete_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        let bundle = ArtifactBundle::load(dir.path()).expect("bundle loads");
        assert_eq!(bundle.manifest.model_version, "test-tree-1");
        assert_eq!(
            bundle.codec.encode(CategoricalField::Country, "USA"),
            Ok(4)
        );
        assert_eq!(bundle.scorer.node_count(), 5);
    }

    #[test]
    fn missing_country_vocabulary_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        std::fs::remove_file(dir.path().join("le_country.json")).unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingFile { .. }), "got {err:?}");
        assert!(err.path().ends_with("le_country.json"));
    }

    #[test]
    fn missing_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        std::fs::remove_file(dir.path().join(MANIFEST_FILE)).unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(err.path().ends_with(MANIFEST_FILE));
    }

    #[test]
    fn corrupt_scaler_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        std::fs::write(dir.path().join("scaler_year.json"), "{ not json").unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn reordered_features_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        let swapped = fixtures::MANIFEST.replace(
            r#""Organisation_encoded", "Rocket_Status_encoded""#,
            r#""Rocket_Status_encoded", "Organisation_encoded""#,
        );
        assert_ne!(swapped, fixtures::MANIFEST);
        std::fs::write(dir.path().join(MANIFEST_FILE), swapped).unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::ManifestMismatch { .. }), "got {err:?}");
    }

    #[test]
    fn unsupported_schema_version_is_rejected() {
        let m = Manifest::from_toml_str(
            &fixtures::MANIFEST.replace("schema_version = 1", "schema_version = 2"),
            Path::new(MANIFEST_FILE),
        )
        .unwrap();
        assert!(matches!(
            m.check_compatible(Path::new(MANIFEST_FILE)),
            Err(ArtifactError::ManifestMismatch { .. })
        ));
    }

    #[test]
    fn tree_with_wrong_feature_count_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        std::fs::write(
            dir.path().join("decision_tree.json"),
            fixtures::TREE.replace(r#""n_features": 5"#, r#""n_features": 6"#),
        )
        .unwrap();
        let err = ArtifactBundle::load(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Invalid { .. }), "got {err:?}");
    }

    #[test]
    fn custom_file_names_are_honoured() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        std::fs::rename(
            dir.path().join("le_country.json"),
            dir.path().join("countries.json"),
        )
        .unwrap();
        let manifest = format!("{}\n[files]\ncountry = \"countries.json\"\n", fixtures::MANIFEST);
        std::fs::write(dir.path().join(MANIFEST_FILE), manifest).unwrap();
        let bundle = ArtifactBundle::load(dir.path()).expect("bundle loads");
        assert_eq!(bundle.manifest.files.country, "countries.json");
        assert_eq!(bundle.manifest.files.organisation, "le_organisation.json");
    }
}
