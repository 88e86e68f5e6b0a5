use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown district: {0}")]
    UnknownDistrict(String),

    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Feature schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Data file not found: {}", .0.display())]
    MissingDataFile(PathBuf),

    #[error("Malformed data file {}: {reason}", path.display())]
    MalformedDataFile { path: PathBuf, reason: String },

    #[error("Model error: {0}")]
    Model(String),
}

impl CoreError {
    /// Build a [`CoreError::SchemaMismatch`] listing every missing feature name.
    pub fn missing_features(missing: &[String]) -> Self {
        Self::SchemaMismatch(format!(
            "record is missing expected features: {}",
            missing.join(", ")
        ))
    }
}
