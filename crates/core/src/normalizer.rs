//! Feature normalizer: raw record → fixed-order model input.
//!
//! Normalization runs in two steps. Categorical values are first expanded
//! through the encodings declared by the [`FeatureSchema`], then every
//! expected feature is read in schema order. Record fields outside the
//! schema are dropped. Expected features with no value are zero-filled in
//! [`NormalizationMode::Lenient`] and rejected in
//! [`NormalizationMode::Strict`].

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::directory::ResolvedDistrict;
use crate::error::CoreError;
use crate::record::PropertyRecord;
use crate::schema::FeatureSchema;

// ---------------------------------------------------------------------------
// Raw record
// ---------------------------------------------------------------------------

/// A single value of a raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

/// Name → value map handed to the normalizer. Field order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(BTreeMap<String, FeatureValue>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_number(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.0.insert(name.into(), FeatureValue::Number(value));
        self
    }

    pub fn set_category(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), FeatureValue::Category(value.into()));
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<FeatureValue> {
        self.0.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Combine a validated form record with its resolved identifiers.
    pub fn from_property(record: &PropertyRecord, resolved: ResolvedDistrict) -> Self {
        let mut raw = Self::new();
        raw.set_number("beds", f64::from(record.beds))
            .set_number("livings", f64::from(record.livings))
            .set_number("wc", f64::from(record.wc))
            .set_number("area", record.area)
            .set_number("street_width", f64::from(record.street_width.meters()))
            .set_number("age", f64::from(record.age))
            .set_category("street_direction", record.street_direction.as_str())
            .set_number("ketchen", bool_slot(record.ketchen))
            .set_number("furnished", bool_slot(record.furnished))
            .set_number("lat", record.lat)
            .set_number("lng", record.lng)
            .set_category("district", record.district.as_str())
            .set_number("district_id", resolved.district_id as f64)
            .set_number("city_id", resolved.city_id as f64);
        if let Some(city) = &record.city {
            raw.set_category("city", city.as_str());
        }
        raw
    }
}

impl FromIterator<(String, FeatureValue)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, FeatureValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn bool_slot(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Feature vector
// ---------------------------------------------------------------------------

/// Ordered numeric model input produced by one schema version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    schema_version: String,
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Turn the vector back into a raw record of numeric fields.
    pub fn to_raw(&self) -> RawRecord {
        self.iter()
            .map(|(name, value)| (name.to_string(), FeatureValue::Number(value)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Normalizer
// ---------------------------------------------------------------------------

/// What to do when an expected feature is absent from the record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Fill the slot with 0.
    #[default]
    Lenient,
    /// Fail with [`CoreError::SchemaMismatch`].
    Strict,
}

#[derive(Debug, Clone)]
pub struct FeatureNormalizer {
    schema: Arc<FeatureSchema>,
    mode: NormalizationMode,
}

impl FeatureNormalizer {
    pub fn new(schema: Arc<FeatureSchema>, mode: NormalizationMode) -> Result<Self, CoreError> {
        schema.validate()?;
        Ok(Self { schema, mode })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Produce the model input for `raw`.
    pub fn normalize(&self, raw: &RawRecord) -> Result<FeatureVector, CoreError> {
        let expanded = self.expand(raw)?;

        let mut values = Vec::with_capacity(self.schema.len());
        let mut missing = Vec::new();
        for name in &self.schema.features {
            match expanded.get(name.as_str()) {
                Some(FeatureValue::Number(v)) => values.push(*v),
                Some(FeatureValue::Category(c)) => {
                    return Err(CoreError::SchemaMismatch(format!(
                        "feature '{name}' holds category '{c}' but the schema declares no encoding for it"
                    )));
                }
                None => {
                    missing.push(name.clone());
                    values.push(0.0);
                }
            }
        }

        if !missing.is_empty() {
            match self.mode {
                NormalizationMode::Strict => return Err(CoreError::missing_features(&missing)),
                NormalizationMode::Lenient => {
                    tracing::warn!(
                        schema = %self.schema.version,
                        missing = ?missing,
                        "Zero-filling expected features absent from record"
                    );
                }
            }
        }

        let dropped: Vec<&str> = expanded
            .0
            .keys()
            .map(String::as_str)
            .filter(|k| !self.schema.features.iter().any(|f| f == *k))
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(dropped = ?dropped, "Dropping record fields outside the feature schema");
        }

        Ok(FeatureVector {
            schema_version: self.schema.version.clone(),
            names: self.schema.features.clone(),
            values,
        })
    }

    /// Replace every categorical field that has a declared encoding by its
    /// encoded slots. Numeric values of an encoded field pass through.
    fn expand(&self, raw: &RawRecord) -> Result<RawRecord, CoreError> {
        let mut expanded = raw.clone();
        for encoding in &self.schema.encodings {
            let Some(FeatureValue::Category(category)) = raw.get(encoding.field()) else {
                continue;
            };
            expanded.remove(encoding.field());
            for (slot, value) in encoding.encode(category)? {
                expanded.set_number(slot, value);
            }
        }
        Ok(expanded)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
