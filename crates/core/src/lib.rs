//! Aqar core domain logic.
//!
//! Everything here is pure and synchronous: the district directory, the
//! property record and its validation, the versioned feature schema and the
//! normalizer built on it, the price model boundary, and the static analytics
//! datasets behind the dashboard charts. HTTP concerns live in `aqar-api`.

pub mod analytics;
pub mod directory;
pub mod error;
pub mod location;
pub mod model;
pub mod normalizer;
pub mod pricing;
pub mod record;
pub mod schema;
pub mod types;
pub mod validation;
