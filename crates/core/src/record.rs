//! Raw property attributes collected by the estimation form.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::location::MapLocation;
use crate::validation::{validate_count_max, validate_f64_range};

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

pub const MAX_BEDS: u32 = 20;
pub const MAX_LIVINGS: u32 = 10;
pub const MAX_WC: u32 = 10;
/// Ages above this are outside the training data.
pub const MAX_PROPERTY_AGE: u32 = 35;
/// Smallest floor area accepted, and the form's lower bound.
pub const MIN_AREA_SQM: f64 = 1.0;
pub const MAX_AREA_SQM: f64 = 100_000.0;

// ---------------------------------------------------------------------------
// Street width
// ---------------------------------------------------------------------------

/// Street widths offered by the form, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum StreetWidth {
    W10,
    W12,
    W15,
    W18,
    W20,
    W25,
}

impl StreetWidth {
    pub const ALL: [StreetWidth; 6] = [
        Self::W10,
        Self::W12,
        Self::W15,
        Self::W18,
        Self::W20,
        Self::W25,
    ];

    pub fn meters(self) -> u32 {
        match self {
            Self::W10 => 10,
            Self::W12 => 12,
            Self::W15 => 15,
            Self::W18 => 18,
            Self::W20 => 20,
            Self::W25 => 25,
        }
    }
}

impl TryFrom<u32> for StreetWidth {
    type Error = CoreError;

    fn try_from(meters: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|w| w.meters() == meters)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "street_width must be one of 10, 12, 15, 18, 20, 25; got {meters}"
                ))
            })
    }
}

impl From<StreetWidth> for u32 {
    fn from(width: StreetWidth) -> Self {
        width.meters()
    }
}

// ---------------------------------------------------------------------------
// Street direction
// ---------------------------------------------------------------------------

/// Which way the property faces, as listed on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetDirection {
    North,
    East,
    West,
    South,
    Northeast,
    Southeast,
    Southwest,
    Northwest,
    ThreeStreets,
    FourStreets,
}

impl StreetDirection {
    pub const ALL: [StreetDirection; 10] = [
        Self::North,
        Self::East,
        Self::West,
        Self::South,
        Self::Northeast,
        Self::Southeast,
        Self::Southwest,
        Self::Northwest,
        Self::ThreeStreets,
        Self::FourStreets,
    ];

    /// Wire name, also the category key used by the feature schema.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::West => "west",
            Self::South => "south",
            Self::Northeast => "northeast",
            Self::Southeast => "southeast",
            Self::Southwest => "southwest",
            Self::Northwest => "northwest",
            Self::ThreeStreets => "three_streets",
            Self::FourStreets => "four_streets",
        }
    }

    /// Ordinal code the model was trained with.
    pub fn code(self) -> u8 {
        match self {
            Self::North => 1,
            Self::East => 2,
            Self::West => 3,
            Self::South => 4,
            Self::Northeast => 5,
            Self::Southeast => 6,
            Self::Southwest => 7,
            Self::Northwest => 8,
            Self::ThreeStreets => 9,
            Self::FourStreets => 10,
        }
    }

    /// Display label for the form.
    pub fn label(self) -> &'static str {
        match self {
            Self::North => "واجهة شمالية",
            Self::East => "واجهة شرقية",
            Self::West => "واجهة غربية",
            Self::South => "واجهة جنوبية",
            Self::Northeast => "واجهة شمالية شرقية",
            Self::Southeast => "واجهة جنوبية شرقية",
            Self::Southwest => "واجهة جنوبية غربية",
            Self::Northwest => "واجهة شمالية غربية",
            Self::ThreeStreets => "ثلاث شوارع",
            Self::FourStreets => "أربع شوارع",
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A single form submission.
///
/// Field names follow the model's training columns (including the `ketchen`
/// spelling) so records and feature vectors share one vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub beds: u32,
    pub livings: u32,
    pub wc: u32,
    /// Floor area in square meters.
    pub area: f64,
    pub street_width: StreetWidth,
    /// Years since construction.
    pub age: u32,
    pub street_direction: StreetDirection,
    pub ketchen: bool,
    pub furnished: bool,
    pub lat: f64,
    pub lng: f64,
    pub district: String,
    /// Derived from the district; when supplied it must match.
    #[serde(default)]
    pub city: Option<String>,
}

impl PropertyRecord {
    /// Check every field against its declared domain.
    ///
    /// District existence is checked by the directory, not here.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_count_max(self.beds, MAX_BEDS, "beds")?;
        validate_count_max(self.livings, MAX_LIVINGS, "livings")?;
        validate_count_max(self.wc, MAX_WC, "wc")?;
        validate_f64_range(self.area, MIN_AREA_SQM, MAX_AREA_SQM, "area")?;
        validate_count_max(self.age, MAX_PROPERTY_AGE, "age")?;
        self.location().validate()?;
        if self.district.trim().is_empty() {
            return Err(CoreError::Validation("district must not be empty".into()));
        }
        Ok(())
    }

    pub fn location(&self) -> MapLocation {
        MapLocation {
            lat: self.lat,
            lng: self.lng,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// The reference Al-Malqa villa used across the test suites.
    pub fn malqa_record() -> PropertyRecord {
        PropertyRecord {
            beds: 3,
            livings: 1,
            wc: 2,
            area: 300.0,
            street_width: StreetWidth::W15,
            age: 5,
            street_direction: StreetDirection::North,
            ketchen: true,
            furnished: false,
            lat: 24.7136,
            lng: 46.6753,
            district: "حي الملقا".to_string(),
            city: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::fixtures::malqa_record;
    use super::*;

    #[test]
    fn reference_record_is_valid() {
        assert!(malqa_record().validate().is_ok());
    }

    #[test]
    fn street_width_accepts_only_listed_values() {
        assert_eq!(StreetWidth::try_from(18).unwrap(), StreetWidth::W18);
        assert_matches!(StreetWidth::try_from(11), Err(CoreError::Validation(_)));
    }

    #[test]
    fn street_width_deserializes_from_meters() {
        let width: StreetWidth = serde_json::from_str("25").unwrap();
        assert_eq!(width, StreetWidth::W25);
        assert!(serde_json::from_str::<StreetWidth>("13").is_err());
    }

    #[test]
    fn direction_codes_are_unique_and_dense() {
        let mut codes: Vec<u8> = StreetDirection::ALL.iter().map(|d| d.code()).collect();
        codes.sort_unstable();
        assert_eq!(codes, (1..=10).collect::<Vec<u8>>());
    }

    #[test]
    fn direction_wire_name_round_trips() {
        for dir in StreetDirection::ALL {
            let json = serde_json::to_string(&dir).unwrap();
            assert_eq!(json, format!("\"{}\"", dir.as_str()));
        }
    }

    #[test]
    fn rejects_age_above_cap() {
        let record = PropertyRecord {
            age: MAX_PROPERTY_AGE + 1,
            ..malqa_record()
        };
        assert_matches!(record.validate(), Err(CoreError::Validation(msg)) if msg.contains("age"));
    }

    #[test]
    fn rejects_zero_area() {
        let record = PropertyRecord {
            area: 0.0,
            ..malqa_record()
        };
        assert!(record.validate().is_err());
    }

    #[test]
    fn accepts_smallest_area() {
        let record = PropertyRecord {
            area: MIN_AREA_SQM,
            ..malqa_record()
        };
        assert!(record.validate().is_ok());
    }

    #[test]
    fn rejects_coordinates_outside_region() {
        let record = PropertyRecord {
            lat: 40.0,
            ..malqa_record()
        };
        assert!(record.validate().is_err());
    }
}
