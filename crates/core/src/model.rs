//! Boundary to the externally trained price model.
//!
//! The model is opaque to the rest of the system: it publishes the
//! [`FeatureSchema`] it was fitted with and maps a [`FeatureVector`] of that
//! schema to a price. The artifact shipped with the service is a linear
//! regression serialized as JSON; other model kinds only need to implement
//! [`PriceModel`].

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::normalizer::FeatureVector;
use crate::schema::FeatureSchema;

/// Point estimate returned by a model, in SAR.
///
/// Non-negative by convention; the value is not clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionResult(pub f64);

impl PredictionResult {
    pub fn price(self) -> f64 {
        self.0
    }
}

pub trait PriceModel: Send + Sync + std::fmt::Debug {
    /// Schema the model was trained on.
    fn schema(&self) -> Arc<FeatureSchema>;

    /// Predict a price for a vector produced by [`PriceModel::schema`].
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, CoreError>;
}

/// Reject a vector that was not produced by `schema`.
pub fn check_vector(schema: &FeatureSchema, features: &FeatureVector) -> Result<(), CoreError> {
    if features.schema_version() != schema.version {
        return Err(CoreError::SchemaMismatch(format!(
            "vector built with schema '{}' but model expects '{}'",
            features.schema_version(),
            schema.version
        )));
    }
    if features.names() != schema.features.as_slice() {
        return Err(CoreError::SchemaMismatch(format!(
            "vector has {} features in a different layout than the model's {}",
            features.len(),
            schema.len()
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Linear model artifact
// ---------------------------------------------------------------------------

/// On-disk form of a [`LinearModel`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    pub schema: FeatureSchema,
    pub intercept: f64,
    pub coefficients: BTreeMap<String, f64>,
}

/// Ordinary least-squares model: `intercept + Σ weight·feature`.
#[derive(Debug, Clone)]
pub struct LinearModel {
    schema: Arc<FeatureSchema>,
    intercept: f64,
    /// Weights in schema feature order.
    weights: Vec<f64>,
}

impl LinearModel {
    /// Read and validate a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let bytes = std::fs::read(path).map_err(|e| {
            CoreError::Model(format!("cannot read model artifact {}: {e}", path.display()))
        })?;
        let artifact: LinearModelArtifact = serde_json::from_slice(&bytes).map_err(|e| {
            CoreError::Model(format!("cannot parse model artifact {}: {e}", path.display()))
        })?;
        let model = Self::from_artifact(artifact)?;
        tracing::info!(
            path = %path.display(),
            schema = %model.schema.version,
            features = model.weights.len(),
            "Loaded price model"
        );
        Ok(model)
    }

    /// Every schema feature needs a coefficient and every coefficient must
    /// name a schema feature.
    pub fn from_artifact(artifact: LinearModelArtifact) -> Result<Self, CoreError> {
        artifact.schema.validate()?;

        if let Some(unknown) = artifact
            .coefficients
            .keys()
            .find(|k| !artifact.schema.features.contains(*k))
        {
            return Err(CoreError::SchemaMismatch(format!(
                "coefficient '{unknown}' is not a schema feature"
            )));
        }

        let weights = artifact
            .schema
            .features
            .iter()
            .map(|name| {
                artifact.coefficients.get(name).copied().ok_or_else(|| {
                    CoreError::SchemaMismatch(format!("no coefficient for feature '{name}'"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if !artifact.intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(CoreError::Model("model parameters must be finite".into()));
        }

        Ok(Self {
            schema: Arc::new(artifact.schema),
            intercept: artifact.intercept,
            weights,
        })
    }
}

impl PriceModel for LinearModel {
    fn schema(&self) -> Arc<FeatureSchema> {
        Arc::clone(&self.schema)
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, CoreError> {
        check_vector(&self.schema, features)?;

        let price = self.intercept
            + self
                .weights
                .iter()
                .zip(features.values())
                .map(|(w, x)| w * x)
                .sum::<f64>();

        if !price.is_finite() {
            return Err(CoreError::Model(format!("model produced a non-finite price: {price}")));
        }
        if price < 0.0 {
            tracing::warn!(price, "Model produced a negative price");
        }
        Ok(PredictionResult(price))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;

    use super::*;
    use crate::normalizer::{FeatureNormalizer, NormalizationMode, RawRecord};

    fn small_schema() -> FeatureSchema {
        FeatureSchema {
            version: "small".into(),
            features: vec!["area".into(), "beds".into()],
            encodings: vec![],
        }
    }

    fn small_artifact() -> LinearModelArtifact {
        LinearModelArtifact {
            schema: small_schema(),
            intercept: 1000.0,
            coefficients: BTreeMap::from([("area".to_string(), 10.0), ("beds".to_string(), 500.0)]),
        }
    }

    fn vector(schema: FeatureSchema, area: f64, beds: f64) -> FeatureVector {
        let mut raw = RawRecord::new();
        raw.set_number("area", area).set_number("beds", beds);
        FeatureNormalizer::new(Arc::new(schema), NormalizationMode::Strict)
            .unwrap()
            .normalize(&raw)
            .unwrap()
    }

    #[test]
    fn predicts_intercept_plus_weighted_sum() {
        let model = LinearModel::from_artifact(small_artifact()).unwrap();
        let price = model.predict(&vector(small_schema(), 200.0, 3.0)).unwrap();
        assert_eq!(price.price(), 1000.0 + 2000.0 + 1500.0);
    }

    #[test]
    fn rejects_vector_from_other_schema_version() {
        let model = LinearModel::from_artifact(small_artifact()).unwrap();
        let other = FeatureSchema {
            version: "other".into(),
            ..small_schema()
        };
        let err = model.predict(&vector(other, 1.0, 1.0)).unwrap_err();
        assert_matches!(err, CoreError::SchemaMismatch(_));
    }

    #[test]
    fn rejects_vector_with_different_layout() {
        let model = LinearModel::from_artifact(small_artifact()).unwrap();
        let swapped = FeatureSchema {
            features: vec!["beds".into(), "area".into()],
            ..small_schema()
        };
        let err = model.predict(&vector(swapped, 1.0, 1.0)).unwrap_err();
        assert_matches!(err, CoreError::SchemaMismatch(_));
    }

    #[test]
    fn artifact_missing_a_coefficient_is_rejected() {
        let mut artifact = small_artifact();
        artifact.coefficients.remove("beds");
        assert_matches!(
            LinearModel::from_artifact(artifact),
            Err(CoreError::SchemaMismatch(msg)) if msg.contains("beds")
        );
    }

    #[test]
    fn artifact_with_stray_coefficient_is_rejected() {
        let mut artifact = small_artifact();
        artifact.coefficients.insert("pool".into(), 1.0);
        assert_matches!(
            LinearModel::from_artifact(artifact),
            Err(CoreError::SchemaMismatch(msg)) if msg.contains("pool")
        );
    }

    #[test]
    fn loads_artifact_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&small_artifact()).unwrap().as_bytes())
            .unwrap();

        let model = LinearModel::load(file.path()).unwrap();
        assert_eq!(model.schema().version, "small");
    }

    #[test]
    fn missing_artifact_is_a_model_error() {
        let err = LinearModel::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert_matches!(err, CoreError::Model(_));
    }

    #[test]
    fn bundled_artifact_matches_default_schema() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../model/price_model.json");
        let model = LinearModel::load(&path).unwrap();
        assert_eq!(*model.schema(), FeatureSchema::default());
    }
}
