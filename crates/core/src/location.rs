//! Map coordinates selected by clicking the location widget.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::validate_f64_range;

/// Latitude bounds of the serviced region.
pub const MIN_LAT: f64 = 16.0;
pub const MAX_LAT: f64 = 33.0;
/// Longitude bounds of the serviced region.
pub const MIN_LNG: f64 = 34.0;
pub const MAX_LNG: f64 = 56.0;

/// Where the map is centred before the user clicks (central Riyadh).
pub const DEFAULT_LAT: f64 = 24.7136;
pub const DEFAULT_LNG: f64 = 46.6753;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapLocation {
    pub lat: f64,
    pub lng: f64,
}

impl Default for MapLocation {
    fn default() -> Self {
        Self {
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
        }
    }
}

impl MapLocation {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_f64_range(self.lat, MIN_LAT, MAX_LAT, "lat")?;
        validate_f64_range(self.lng, MIN_LNG, MAX_LNG, "lng")
    }
}
