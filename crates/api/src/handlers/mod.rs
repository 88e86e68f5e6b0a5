pub mod analytics;
pub mod directory;
pub mod prediction;
pub mod sessions;
