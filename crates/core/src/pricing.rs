//! End-to-end price estimation for one form submission.
//!
//! Validate the record, resolve the district, normalize against the model's
//! schema, then ask the model. A failure at any step stops the pipeline, so
//! an unknown district never reaches the model.

use std::sync::Arc;

use serde::Serialize;

use crate::directory::DistrictDirectory;
use crate::error::CoreError;
use crate::model::{PredictionResult, PriceModel};
use crate::normalizer::{FeatureNormalizer, FeatureVector, NormalizationMode, RawRecord};
use crate::record::PropertyRecord;
use crate::types::{CityId, DistrictId};

/// Result of a successful estimation.
#[derive(Debug, Clone, Serialize)]
pub struct Estimate {
    pub price: PredictionResult,
    pub district: String,
    pub district_id: DistrictId,
    pub city: String,
    pub city_id: CityId,
    pub features: FeatureVector,
}

/// Shared estimation component used by every dashboard page.
#[derive(Debug, Clone)]
pub struct PriceEstimator {
    directory: Arc<DistrictDirectory>,
    normalizer: FeatureNormalizer,
    model: Arc<dyn PriceModel>,
}

impl PriceEstimator {
    pub fn new(
        directory: Arc<DistrictDirectory>,
        model: Arc<dyn PriceModel>,
        mode: NormalizationMode,
    ) -> Result<Self, CoreError> {
        let normalizer = FeatureNormalizer::new(model.schema(), mode)?;
        Ok(Self {
            directory,
            normalizer,
            model,
        })
    }

    pub fn estimate(&self, record: &PropertyRecord) -> Result<Estimate, CoreError> {
        record.validate()?;

        let entry = self.directory.entry(&record.district)?;
        if let Some(city) = record.city.as_deref() {
            if city != entry.city {
                return Err(CoreError::Validation(format!(
                    "district '{}' belongs to '{}', not '{city}'",
                    record.district, entry.city
                )));
            }
        }
        let resolved = self.directory.resolve(&record.district)?;

        let raw = RawRecord::from_property(record, resolved);
        let features = self.normalizer.normalize(&raw)?;
        let price = self.model.predict(&features)?;

        tracing::debug!(
            district_id = resolved.district_id,
            city_id = resolved.city_id,
            price = price.price(),
            "Estimated property price"
        );

        Ok(Estimate {
            price,
            district: entry.name.clone(),
            district_id: resolved.district_id,
            city: entry.city.clone(),
            city_id: resolved.city_id,
            features,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
