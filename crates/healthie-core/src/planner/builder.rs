//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;
use tokio::task;

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    models::HealthProfile,
    service::{GenerativeService, OfflineService},
    store::{PlanStore, SqlitePlanStore},
};

/// Builder for creating and configuring Planner instances.
#[derive(Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    store: Option<Arc<dyn PlanStore>>,
    service: Option<Arc<dyn GenerativeService>>,
    profile: HealthProfile,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/healthie/healthie.db` or
    /// `~/.local/share/healthie/healthie.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Uses `store` instead of the SQLite database.
    pub fn with_store(mut self, store: Arc<dyn PlanStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the generative service. Without one, every generative call
    /// fails and only saved plans can be viewed and edited.
    pub fn with_service(mut self, service: Arc<dyn GenerativeService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the health profile used for prompts.
    pub fn with_profile(mut self, profile: HealthProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if the database directory cannot
    /// be created, `PlannerError::XdgDirectory` if the default path cannot
    /// be resolved, or `PlannerError::Storage` if database initialization
    /// fails.
    pub async fn build(self) -> Result<Planner> {
        let store = match self.store {
            Some(store) => store,
            None => {
                let db_path = match self.database_path {
                    Some(path) => path,
                    None => Self::default_database_path()?,
                };

                if let Some(parent) = db_path.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| PlannerError::FileSystem {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }

                debug!("Opening plan store at {}", db_path.display());
                let store = task::spawn_blocking(move || SqlitePlanStore::open(&db_path))
                    .await
                    .map_err(PlannerError::join)??;
                Arc::new(store) as Arc<dyn PlanStore>
            }
        };

        let service = self
            .service
            .unwrap_or_else(|| Arc::new(OfflineService) as Arc<dyn GenerativeService>);

        Ok(Planner::new(service, store, self.profile))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("healthie")
            .place_data_file("healthie.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}
