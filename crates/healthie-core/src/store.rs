//! Persistence boundary for the saved plan.
//!
//! The plan is the only persisted artifact. It is stored as JSON text under
//! [`SAVED_PLAN_KEY`]; selection, rationale state and conversation history
//! are rebuilt from it on load.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::debug;

use crate::{db::Database, error::Result, models::Plan};

/// Key of the saved plan in the key-value store.
pub const SAVED_PLAN_KEY: &str = "health-planner-saved-plan";

/// Blocking plan storage. Called from `spawn_blocking` by the planner.
pub trait PlanStore: Send + Sync {
    /// Loads the saved plan.
    ///
    /// # Errors
    ///
    /// Fails when the store cannot be read or the stored text does not
    /// decode as a plan.
    fn load(&self) -> Result<Option<Plan>>;

    fn save(&self, plan: &Plan) -> Result<()>;

    /// Removes the saved plan. Returns whether one was present.
    fn clear(&self) -> Result<bool>;
}

/// SQLite-backed store; opens the database for each call.
#[derive(Debug, Clone)]
pub struct SqlitePlanStore {
    db_path: PathBuf,
}

impl SqlitePlanStore {
    /// Opens (and if needed creates) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        Database::new(&db_path)?;
        Ok(Self { db_path })
    }

    /// Stores raw text under the plan key, bypassing encoding.
    pub fn put_raw(&self, text: &str) -> Result<()> {
        Database::new(&self.db_path)?.put_value(SAVED_PLAN_KEY, text)?;
        Ok(())
    }
}

impl PlanStore for SqlitePlanStore {
    fn load(&self) -> Result<Option<Plan>> {
        let db = Database::new(&self.db_path)?;
        let Some(stored) = db.get_value(SAVED_PLAN_KEY)? else {
            return Ok(None);
        };
        debug!("Loading plan saved at {}", stored.updated_at);
        Ok(Some(serde_json::from_str(&stored.value)?))
    }

    fn save(&self, plan: &Plan) -> Result<()> {
        let text = serde_json::to_string(plan)?;
        let mut db = Database::new(&self.db_path)?;
        let saved_at = db.put_value(SAVED_PLAN_KEY, &text)?;
        debug!("Plan saved at {saved_at}");
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        Database::new(&self.db_path)?.delete_value(SAVED_PLAN_KEY)
    }
}

/// In-process store holding the encoded plan.
#[derive(Debug, Default)]
pub struct MemoryPlanStore {
    slot: Mutex<Option<String>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose saved entry is `text`, decodable or not.
    pub fn with_raw(text: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(text.into())),
        }
    }

    /// The encoded entry currently held.
    pub fn raw(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl PlanStore for MemoryPlanStore {
    fn load(&self) -> Result<Option<Plan>> {
        self.raw()
            .map(|text| serde_json::from_str(&text))
            .transpose()
            .map_err(Into::into)
    }

    fn save(&self, plan: &Plan) -> Result<()> {
        let text = serde_json::to_string(plan)?;
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text);
        Ok(())
    }

    fn clear(&self) -> Result<bool> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PlannerError, fixtures::sample_plan};

    #[test]
    fn test_sqlite_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqlitePlanStore::open(dir.path().join("healthie.db")).unwrap();
        assert!(store.load().unwrap().is_none());

        store.save(&sample_plan()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_plan()));

        assert!(store.clear().unwrap());
        assert!(store.load().unwrap().is_none());
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn test_sqlite_store_reports_corrupt_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqlitePlanStore::open(dir.path().join("healthie.db")).unwrap();
        store.put_raw("{not json").unwrap();
        assert!(matches!(
            store.load(),
            Err(PlannerError::Serialization { .. })
        ));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPlanStore::new();
        assert!(store.load().unwrap().is_none());
        store.save(&sample_plan()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_plan()));
        assert!(store.clear().unwrap());
        assert!(store.raw().is_none());

        let corrupt = MemoryPlanStore::with_raw("[]");
        assert!(corrupt.load().is_err());
    }
}
