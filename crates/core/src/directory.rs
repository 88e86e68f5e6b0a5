//! Static district directory (name → model identifiers).
//!
//! The price model was trained on numeric district and city identifiers, so
//! the free-text district picked in the form has to be translated before
//! normalization. The table is embedded in the binary, built once, and never
//! mutated afterwards.
//!
//! Lookups are exact: no trimming, case folding, or partial matching.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{CityId, DistrictId};

// ---------------------------------------------------------------------------
// Embedded tables
// ---------------------------------------------------------------------------

/// City name → city id.
pub const CITY_TABLE: &[(&str, CityId)] = &[("الرياض", 66)];

/// `(district_id, district_name, city_name)` triples, ascending by id.
pub const DISTRICT_TABLE: &[(DistrictId, &str, &str)] = &[
    (424, "حي العارض", "الرياض"),
    (437, "حي النرجس", "الرياض"),
    (446, "حي الياسمين", "الرياض"),
    (451, "حي القيروان", "الرياض"),
    (463, "حي الصحافة", "الرياض"),
    (478, "حي الربيع", "الرياض"),
    (482, "حي الندى", "الرياض"),
    (495, "حي النفل", "الرياض"),
    (503, "حي المروج", "الرياض"),
    (511, "حي الغدير", "الرياض"),
    (524, "حي العقيق", "الرياض"),
    (536, "حي الوادي", "الرياض"),
    (542, "حي المصيف", "الرياض"),
    (555, "حي التعاون", "الرياض"),
    (561, "حي الازدهار", "الرياض"),
    (570, "حي الملقا", "الرياض"),
    (584, "حي حطين", "الرياض"),
    (592, "حي الرحمانية", "الرياض"),
    (605, "حي المحمدية", "الرياض"),
    (613, "حي الورود", "الرياض"),
    (627, "حي السليمانية", "الرياض"),
    (634, "حي العليا", "الرياض"),
    (648, "حي الملز", "الرياض"),
    (655, "حي الروضة", "الرياض"),
    (661, "حي الحمراء", "الرياض"),
    (679, "حي اليرموك", "الرياض"),
    (686, "حي قرطبة", "الرياض"),
    (694, "حي المونسية", "الرياض"),
    (702, "حي الرمال", "الرياض"),
    (715, "حي النسيم", "الرياض"),
    (723, "حي السويدي", "الرياض"),
    (738, "حي ظهرة لبن", "الرياض"),
    (741, "حي عرقة", "الرياض"),
    (756, "حي الشفا", "الرياض"),
    (768, "حي العزيزية", "الرياض"),
    (774, "حي الدار البيضاء", "الرياض"),
];

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// One row of the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictEntry {
    pub id: DistrictId,
    pub name: String,
    pub city: String,
}

/// Identifiers the model consumes for a resolved district.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedDistrict {
    pub district_id: DistrictId,
    pub city_id: CityId,
}

/// Read-only lookup from district name to `(district_id, city_id)`.
#[derive(Debug, Clone)]
pub struct DistrictDirectory {
    entries: Vec<DistrictEntry>,
    by_name: HashMap<String, usize>,
    city_ids: HashMap<String, CityId>,
}

static BUILTIN: OnceLock<Arc<DistrictDirectory>> = OnceLock::new();

impl DistrictDirectory {
    /// The process-wide directory built from the embedded tables.
    pub fn builtin() -> Arc<DistrictDirectory> {
        let dir = BUILTIN.get_or_init(|| {
            let districts = DISTRICT_TABLE
                .iter()
                .map(|&(id, name, city)| DistrictEntry {
                    id,
                    name: name.to_string(),
                    city: city.to_string(),
                });
            let cities = CITY_TABLE
                .iter()
                .map(|&(name, id)| (name.to_string(), id));
            // The embedded tables are covered by the unit tests below.
            let dir = Self::from_entries(districts, cities)
                .unwrap_or_else(|e| panic!("embedded district table is invalid: {e}"));
            Arc::new(dir)
        });
        Arc::clone(dir)
    }

    /// Build a directory from explicit rows.
    ///
    /// Rejects duplicate district ids, duplicate district names, duplicate
    /// city names, and districts whose city has no id.
    pub fn from_entries(
        districts: impl IntoIterator<Item = DistrictEntry>,
        cities: impl IntoIterator<Item = (String, CityId)>,
    ) -> Result<Self, CoreError> {
        let mut city_ids = HashMap::new();
        for (name, id) in cities {
            if city_ids.insert(name.clone(), id).is_some() {
                return Err(CoreError::Validation(format!("duplicate city '{name}'")));
            }
        }

        let mut entries: Vec<DistrictEntry> = districts.into_iter().collect();
        entries.sort_by_key(|e| e.id);

        let mut by_name = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if idx > 0 && entries[idx - 1].id == entry.id {
                return Err(CoreError::Validation(format!(
                    "duplicate district id {}",
                    entry.id
                )));
            }
            if !city_ids.contains_key(&entry.city) {
                return Err(CoreError::UnknownCity(entry.city.clone()));
            }
            if by_name.insert(entry.name.clone(), idx).is_some() {
                return Err(CoreError::Validation(format!(
                    "duplicate district name '{}'",
                    entry.name
                )));
            }
        }

        Ok(Self {
            entries,
            by_name,
            city_ids,
        })
    }

    /// Resolve a district name to the identifiers the model was trained on.
    pub fn resolve(&self, district_name: &str) -> Result<ResolvedDistrict, CoreError> {
        let entry = self.entry(district_name)?;
        let city_id = self.city_id(&entry.city)?;
        Ok(ResolvedDistrict {
            district_id: entry.id,
            city_id,
        })
    }

    /// Full row for a district name.
    pub fn entry(&self, district_name: &str) -> Result<&DistrictEntry, CoreError> {
        self.by_name
            .get(district_name)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| CoreError::UnknownDistrict(district_name.to_string()))
    }

    /// Parent city of a district.
    pub fn city_of(&self, district_name: &str) -> Result<&str, CoreError> {
        self.entry(district_name).map(|e| e.city.as_str())
    }

    /// Id of a city by name.
    pub fn city_id(&self, city_name: &str) -> Result<CityId, CoreError> {
        self.city_ids
            .get(city_name)
            .copied()
            .ok_or_else(|| CoreError::UnknownCity(city_name.to_string()))
    }

    /// Sorted, deduplicated names of every city that has districts.
    pub fn cities(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|e| e.city.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// District names of `city_name` in ascending district-id order.
    ///
    /// An unknown city yields an empty list.
    pub fn districts_for(&self, city_name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.city == city_name)
            .map(|e| e.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
