use std::sync::Arc;

use aqar_core::analytics::AnalyticsData;
use aqar_core::directory::DistrictDirectory;
use aqar_core::model::{LinearModel, PriceModel};
use aqar_core::pricing::PriceEstimator;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::session::SessionStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// District name → model identifiers.
    pub directory: Arc<DistrictDirectory>,
    /// Estimation pipeline; `None` when the model artifact failed to load.
    pub estimator: Option<Arc<PriceEstimator>>,
    /// Chart datasets, loaded once at startup.
    pub analytics: Arc<AnalyticsData>,
    /// Per-visitor map locations.
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Load the model and datasets named by `config`.
    ///
    /// A model that fails to load is logged and leaves prediction endpoints
    /// answering 503; everything else keeps working.
    pub fn load(config: ServerConfig) -> Self {
        let directory = DistrictDirectory::builtin();
        tracing::info!(districts = directory.len(), "District directory ready");

        let estimator = match LinearModel::load(&config.model_path) {
            Ok(model) => {
                let model: Arc<dyn PriceModel> = Arc::new(model);
                match PriceEstimator::new(
                    Arc::clone(&directory),
                    model,
                    config.normalization_mode,
                ) {
                    Ok(estimator) => Some(Arc::new(estimator)),
                    Err(e) => {
                        tracing::error!(error = %e, "Price model schema rejected");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Price model unavailable");
                None
            }
        };

        let analytics = AnalyticsData::load(
            &config.data_dir,
            &config.deal_years,
            &config.total_cost_file,
        );

        let sessions = SessionStore::new(config.session_ttl());

        Self {
            config: Arc::new(config),
            directory,
            estimator,
            analytics: Arc::new(analytics),
            sessions: Arc::new(sessions),
        }
    }

    /// The estimation pipeline, or 503 when no model is loaded.
    pub fn estimator(&self) -> AppResult<&PriceEstimator> {
        self.estimator
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("Price model is not loaded".into()))
    }
}
