//! Versioned feature schema shared by training and inference.
//!
//! A schema fixes the exact ordered list of numeric slots the model consumes
//! and declares how categorical record fields are turned into those slots.
//! The schema travels inside the model artifact so the normalizer always
//! produces columns in the order the model was fitted on.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::StreetDirection;

/// Version tag of the built-in schema.
pub const DEFAULT_SCHEMA_VERSION: &str = "aqar-v1";

/// Expected features of the built-in schema, in model column order.
pub const RELEVANT_FEATURES: [&str; 13] = [
    "beds",
    "livings",
    "wc",
    "area",
    "street_width",
    "age",
    "street_direction",
    "ketchen",
    "furnished",
    "lat",
    "lng",
    "city_id",
    "district_id",
];

// ---------------------------------------------------------------------------
// Categorical encodings
// ---------------------------------------------------------------------------

/// How one categorical record field becomes numeric slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategoricalEncoding {
    /// Replace the category with a fixed code in a slot named after the field.
    Ordinal {
        field: String,
        codes: BTreeMap<String, f64>,
    },
    /// One `{field}_{category}` indicator slot per category; exactly one is 1.
    OneHot {
        field: String,
        categories: Vec<String>,
    },
}

impl CategoricalEncoding {
    pub fn field(&self) -> &str {
        match self {
            Self::Ordinal { field, .. } | Self::OneHot { field, .. } => field,
        }
    }

    /// Names of the slots this encoding writes.
    pub fn output_slots(&self) -> Vec<String> {
        match self {
            Self::Ordinal { field, .. } => vec![field.clone()],
            Self::OneHot { field, categories } => categories
                .iter()
                .map(|c| one_hot_slot(field, c))
                .collect(),
        }
    }

    /// Encode one category value.
    pub fn encode(&self, category: &str) -> Result<Vec<(String, f64)>, CoreError> {
        match self {
            Self::Ordinal { field, codes } => codes
                .get(category)
                .map(|&code| vec![(field.clone(), code)])
                .ok_or_else(|| unknown_category(field, category)),
            Self::OneHot { field, categories } => {
                if !categories.iter().any(|c| c == category) {
                    return Err(unknown_category(field, category));
                }
                Ok(categories
                    .iter()
                    .map(|c| (one_hot_slot(field, c), if c == category { 1.0 } else { 0.0 }))
                    .collect())
            }
        }
    }
}

fn one_hot_slot(field: &str, category: &str) -> String {
    format!("{field}_{category}")
}

fn unknown_category(field: &str, category: &str) -> CoreError {
    CoreError::Validation(format!("unknown {field} category '{category}'"))
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: String,
    /// Expected slot names in model column order.
    pub features: Vec<String>,
    #[serde(default)]
    pub encodings: Vec<CategoricalEncoding>,
}

impl Default for FeatureSchema {
    /// The built-in schema: [`RELEVANT_FEATURES`] with `street_direction`
    /// ordinally encoded by [`StreetDirection::code`].
    fn default() -> Self {
        let codes = StreetDirection::ALL
            .iter()
            .map(|d| (d.as_str().to_string(), f64::from(d.code())))
            .collect();
        Self {
            version: DEFAULT_SCHEMA_VERSION.to_string(),
            features: RELEVANT_FEATURES.iter().map(|s| s.to_string()).collect(),
            encodings: vec![CategoricalEncoding::Ordinal {
                field: "street_direction".to_string(),
                codes,
            }],
        }
    }
}

impl FeatureSchema {
    /// Check internal consistency.
    ///
    /// Feature names must be non-empty and unique, each categorical field may
    /// be encoded once, and every slot an encoding writes must be an expected
    /// feature so the column set is stable across requests.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.version.trim().is_empty() {
            return Err(CoreError::Validation("schema version must not be empty".into()));
        }
        if self.features.is_empty() {
            return Err(CoreError::Validation("schema has no features".into()));
        }

        let mut seen = HashSet::with_capacity(self.features.len());
        for name in &self.features {
            if name.is_empty() || !seen.insert(name.as_str()) {
                return Err(CoreError::Validation(format!(
                    "schema feature '{name}' is empty or duplicated"
                )));
            }
        }

        let mut encoded_fields = HashSet::new();
        for encoding in &self.encodings {
            if !encoded_fields.insert(encoding.field()) {
                return Err(CoreError::Validation(format!(
                    "field '{}' has more than one encoding",
                    encoding.field()
                )));
            }
            if let Some(slot) = encoding
                .output_slots()
                .into_iter()
                .find(|slot| !seen.contains(slot.as_str()))
            {
                return Err(CoreError::Validation(format!(
                    "encoding for '{}' writes slot '{slot}' which is not a schema feature",
                    encoding.field()
                )));
            }
        }
        Ok(())
    }

    pub fn encoding_for(&self, field: &str) -> Option<&CategoricalEncoding> {
        self.encodings.iter().find(|e| e.field() == field)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}
