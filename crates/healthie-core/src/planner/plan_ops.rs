//! Plan lifecycle and selection operations for the Planner.

use std::sync::Arc;

use log::{info, warn};
use tokio::task;

use super::{History, Planner};
use crate::{
    error::{PlannerError, Result},
    models::{Day, HealthProfile, Plan, SlotKind},
    prompts,
};

/// Result of [`Planner::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing was saved
    Empty,
    /// The saved plan is now active
    Restored,
    /// The saved plan was unreadable and has been removed; carries a
    /// user-facing notice
    Discarded(String),
}

impl Planner {
    /// Loads the saved plan and makes it active.
    ///
    /// An unreadable or malformed saved plan is removed from the store and
    /// reported as [`RestoreOutcome::Discarded`] rather than as an error.
    pub async fn restore(&self) -> Result<RestoreOutcome> {
        let store = Arc::clone(&self.store);
        let loaded = task::spawn_blocking(move || store.load())
            .await
            .map_err(PlannerError::join)?;

        let plan = match loaded.and_then(|plan| match plan {
            Some(plan) => plan.validate().map(|()| Some(plan)),
            None => Ok(None),
        }) {
            Ok(Some(plan)) => plan,
            Ok(None) => return Ok(RestoreOutcome::Empty),
            Err(err) => {
                warn!("Failed to load saved plan, discarding it: {err}");
                if let Err(clear_err) = self.clear_saved().await {
                    warn!("Failed to remove unreadable saved plan: {clear_err}");
                }
                return Ok(RestoreOutcome::Discarded(
                    prompts::SAVED_PLAN_DISCARDED.to_string(),
                ));
            }
        };

        let mut state = self.lock().await;
        self.install(&mut state, Arc::new(plan), History::Restart)?;
        info!("Restored saved plan");
        Ok(RestoreOutcome::Restored)
    }

    /// Generates a new plan for `profile` and makes it active.
    ///
    /// The saved plan is removed first. On failure the in-memory state is
    /// left exactly as it was.
    ///
    /// # Errors
    ///
    /// * `PlannerError::InvalidInput` if the profile lacks age, height or
    ///   weight.
    /// * `PlannerError::Generation` if the service fails or returns a plan
    ///   with an empty slot.
    pub async fn generate(&self, profile: HealthProfile) -> Result<Arc<Plan>> {
        profile.validate()?;

        if let Err(err) = self.clear_saved().await {
            warn!("Failed to remove previous saved plan: {err}");
        }

        info!("Generating plan");
        let plan = self
            .service
            .generate_plan(&profile)
            .await
            .map_err(|e| PlannerError::Generation {
                message: e.to_string(),
            })?;
        plan.validate().map_err(|e| PlannerError::Generation {
            message: e.to_string(),
        })?;
        let plan = Arc::new(plan);

        let mut state = self.lock().await;
        state.profile = profile;
        self.install(&mut state, Arc::clone(&plan), History::Restart)?;
        info!("Installed generated plan");
        Ok(plan)
    }

    /// Replaces the profile used for prompts. An active conversation is
    /// re-seeded with the new profile.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::RequestOutstanding` while a chat reply is
    /// awaited.
    pub async fn set_profile(&self, profile: HealthProfile) -> Result<()> {
        let mut state = self.lock().await;
        let session = match state.active.as_ref() {
            Some(active) if active.conversation.is_outstanding() => {
                return Err(PlannerError::RequestOutstanding);
            }
            Some(active) => Some(self.open_session(&profile, &active.plan)?),
            None => None,
        };
        state.profile = profile;
        if let (Some(active), Some(session)) = (state.active.as_mut(), session) {
            active.conversation.reseed();
            active.session = session;
        }
        Ok(())
    }

    /// Persists the active plan.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::NoActivePlan` without a plan, or the storage
    /// error. A failed save leaves the in-memory state untouched.
    pub async fn save(&self) -> Result<()> {
        let plan = Arc::clone(&self.lock().await.active_mut()?.plan);
        self.persist(plan).await
    }

    pub(super) async fn persist(&self, plan: Arc<Plan>) -> Result<()> {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || store.save(&plan))
            .await
            .map_err(PlannerError::join)??;
        info!("Plan saved");
        Ok(())
    }

    /// Removes the saved plan. Returns whether one was present.
    pub async fn clear_saved(&self) -> Result<bool> {
        let store = Arc::clone(&self.store);
        task::spawn_blocking(move || store.clear())
            .await
            .map_err(PlannerError::join)?
    }

    /// Chooses option `index` for a slot.
    ///
    /// A meal-slot change marks the day's rationale stale; an exercise
    /// change does not.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::InvalidSelection` for an out-of-range index;
    /// the previous choice is kept.
    pub async fn select(&self, day: Day, slot: SlotKind, index: usize) -> Result<()> {
        let mut state = self.lock().await;
        let active = state.active_mut()?;
        active.selection.set(&active.plan, day, slot, index)?;
        if slot.is_meal() {
            active.rationales.mark_stale(day);
        }
        Ok(())
    }
}
