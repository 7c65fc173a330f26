//! Rationale regeneration for the Planner.

use log::debug;

use super::Planner;
use crate::{
    error::Result,
    models::Day,
    rationale::Rationale,
    selection::SelectionResolver,
    service::DayMeals,
};

impl Planner {
    /// Regenerates the rationale for `day` from its current meal selection.
    ///
    /// Other days may regenerate at the same time. A service failure is not
    /// an error: the fixed failure text is installed instead. The returned
    /// value is the day's rationale after the attempt.
    ///
    /// # Errors
    ///
    /// * `PlannerError::RationaleInFlight` if `day` is already regenerating;
    ///   the cached text is left untouched.
    /// * `PlannerError::NoActivePlan` without a plan.
    pub async fn regenerate_rationale(&self, day: Day) -> Result<Rationale> {
        let (ticket, meals, profile) = {
            let mut state = self.lock().await;
            let profile = state.profile.clone();
            let active = state.active_mut()?;
            let ticket = active.rationales.begin(day)?;
            let meals = DayMeals::from(
                SelectionResolver::new(&active.plan, &active.selection).selected_meals(day),
            );
            (ticket, meals, profile)
        };

        debug!("Regenerating rationale for {day}");
        let outcome = self
            .service
            .generate_day_narrative(day, &meals, &profile)
            .await
            .map(|text| text.trim().to_string());

        let mut state = self.lock().await;
        let active = state.active_mut()?;
        active.rationales.complete(ticket, outcome);
        Ok(active.rationales.get(day).clone())
    }
}
