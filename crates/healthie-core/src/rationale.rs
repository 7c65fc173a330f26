//! Cached per-day explanatory text with staleness tracking.
//!
//! Narrative text is authored by the generative service and expensive to
//! produce, so it is memoized here and only regenerated on explicit request.
//! A regeneration is split into [`RationaleCache::begin`], which claims the
//! day's in-flight guard, and [`RationaleCache::complete`], which installs the
//! outcome. The external call happens between the two without holding the
//! cache, so several days can regenerate at once.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::{
    error::{PlannerError, Result},
    models::{Day, Plan},
    prompts,
};

/// Cached narrative for one day.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Rationale {
    pub text: String,
    /// The meal selection changed since the text was produced
    pub stale: bool,
    /// A regeneration is in flight
    pub loading: bool,
}

/// Proof that a regeneration was started for a day against a given seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RegenerationTicket {
    pub day: Day,
    epoch: u64,
}

/// Per-day rationale cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RationaleCache {
    entries: BTreeMap<Day, Rationale>,
    epoch: u64,
}

impl RationaleCache {
    /// Seeds every day from the plan's own narrative.
    pub fn seed(plan: &Plan) -> Self {
        Self::seed_with_epoch(plan, 0)
    }

    /// Reseeds from a new plan. Tickets issued before the reseed no longer
    /// apply.
    pub fn reseed(&mut self, plan: &Plan) {
        *self = Self::seed_with_epoch(plan, self.epoch + 1);
    }

    fn seed_with_epoch(plan: &Plan, epoch: u64) -> Self {
        let entries = Day::ALL
            .into_iter()
            .map(|day| {
                let narrative = plan.narrative(day).trim();
                let text = if narrative.is_empty() {
                    prompts::MISSING_RATIONALE.to_string()
                } else {
                    narrative.to_string()
                };
                (
                    day,
                    Rationale {
                        text,
                        ..Default::default()
                    },
                )
            })
            .collect();
        Self { entries, epoch }
    }

    pub fn get(&self, day: Day) -> &Rationale {
        // Every day is seeded, so the entry is always present.
        static EMPTY: Rationale = Rationale {
            text: String::new(),
            stale: false,
            loading: false,
        };
        self.entries.get(&day).unwrap_or(&EMPTY)
    }

    pub fn is_loading(&self, day: Day) -> bool {
        self.get(day).loading
    }

    pub fn is_stale(&self, day: Day) -> bool {
        self.get(day).stale
    }

    /// Flags a day's text as out of date after a meal change. No-op while
    /// already stale or while a regeneration is in flight.
    pub fn mark_stale(&mut self, day: Day) {
        if let Some(entry) = self.entries.get_mut(&day) {
            if entry.stale || entry.loading {
                return;
            }
            debug!("Rationale for {day} marked stale");
            *entry = Rationale {
                stale: true,
                ..entry.clone()
            };
        }
    }

    /// Claims the day's in-flight guard.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::RationaleInFlight` if the day is already
    /// regenerating; the cached text is left untouched.
    pub fn begin(&mut self, day: Day) -> Result<RegenerationTicket> {
        let entry = self.entries.entry(day).or_default();
        if entry.loading {
            return Err(PlannerError::RationaleInFlight { day });
        }
        *entry = Rationale {
            loading: true,
            ..entry.clone()
        };
        Ok(RegenerationTicket {
            day,
            epoch: self.epoch,
        })
    }

    /// Installs the outcome of a regeneration. Failure installs the fixed
    /// failure message; either way the day ends neither stale nor loading.
    ///
    /// Returns `false` when the ticket predates a reseed and the outcome was
    /// dropped.
    pub fn complete<E: std::fmt::Display>(
        &mut self,
        ticket: RegenerationTicket,
        outcome: std::result::Result<String, E>,
    ) -> bool {
        if ticket.epoch != self.epoch {
            debug!(
                "Dropping rationale for {} from a replaced plan",
                ticket.day
            );
            return false;
        }
        let text = match outcome {
            Ok(text) => text,
            Err(err) => {
                warn!("Failed to update rationale for {}: {err}", ticket.day);
                prompts::RATIONALE_FAILED.to_string()
            }
        };
        self.entries.insert(
            ticket.day,
            Rationale {
                text,
                stale: false,
                loading: false,
            },
        );
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, &Rationale)> {
        self.entries.iter().map(|(day, entry)| (*day, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{revised_plan, sample_plan};

    #[test]
    fn test_seed_uses_plan_narrative() {
        let cache = RationaleCache::seed(&sample_plan());
        let monday = cache.get(Day::Monday);
        assert_eq!(monday.text, "narrative for monday");
        assert!(!monday.stale);
        assert!(!monday.loading);
    }

    #[test]
    fn test_seed_fills_missing_narrative() {
        let mut plan = sample_plan();
        plan.weekly_plan.get_mut(Day::Friday).rationale = "  ".to_string();
        let cache = RationaleCache::seed(&plan);
        assert_eq!(cache.get(Day::Friday).text, prompts::MISSING_RATIONALE);
    }

    #[test]
    fn test_mark_stale_is_idempotent() {
        let mut cache = RationaleCache::seed(&sample_plan());
        cache.mark_stale(Day::Monday);
        let once = cache.clone();
        cache.mark_stale(Day::Monday);
        assert_eq!(cache, once);
        assert!(cache.is_stale(Day::Monday));
        assert!(!cache.is_stale(Day::Tuesday));
    }

    #[test]
    fn test_mark_stale_ignored_while_loading() {
        let mut cache = RationaleCache::seed(&sample_plan());
        let _ticket = cache.begin(Day::Monday).unwrap();
        cache.mark_stale(Day::Monday);
        assert!(!cache.is_stale(Day::Monday));
    }

    #[test]
    fn test_begin_twice_is_rejected_and_keeps_text() {
        let mut cache = RationaleCache::seed(&sample_plan());
        let _ticket = cache.begin(Day::Wednesday).unwrap();

        let err = cache.begin(Day::Wednesday).unwrap_err();
        assert!(matches!(
            err,
            PlannerError::RationaleInFlight { day: Day::Wednesday }
        ));
        assert_eq!(cache.get(Day::Wednesday).text, "narrative for wednesday");
        assert!(cache.is_loading(Day::Wednesday));
    }

    #[test]
    fn test_days_regenerate_independently() {
        let mut cache = RationaleCache::seed(&sample_plan());
        let monday = cache.begin(Day::Monday).unwrap();
        let tuesday = cache.begin(Day::Tuesday).unwrap();

        assert!(cache.complete(tuesday, Ok::<_, String>("new tuesday".to_string())));
        assert!(cache.is_loading(Day::Monday));
        assert_eq!(cache.get(Day::Tuesday).text, "new tuesday");

        assert!(cache.complete(monday, Ok::<_, String>("new monday".to_string())));
        assert_eq!(cache.get(Day::Monday).text, "new monday");
    }

    #[test]
    fn test_complete_success_clears_flags() {
        let mut cache = RationaleCache::seed(&sample_plan());
        cache.mark_stale(Day::Sunday);
        let ticket = cache.begin(Day::Sunday).unwrap();
        cache.complete(ticket, Ok::<_, String>("fresh".to_string()));

        assert_eq!(
            cache.get(Day::Sunday),
            &Rationale {
                text: "fresh".to_string(),
                stale: false,
                loading: false,
            }
        );
    }

    #[test]
    fn test_complete_failure_installs_failure_message() {
        let mut cache = RationaleCache::seed(&sample_plan());
        cache.mark_stale(Day::Thursday);
        let ticket = cache.begin(Day::Thursday).unwrap();
        cache.complete(ticket, Err::<String, _>("timeout"));

        let entry = cache.get(Day::Thursday);
        assert_eq!(entry.text, prompts::RATIONALE_FAILED);
        assert!(!entry.stale);
        assert!(!entry.loading);

        // A later attempt is allowed again.
        assert!(cache.begin(Day::Thursday).is_ok());
    }

    #[test]
    fn test_reseed_drops_outdated_completion() {
        let mut cache = RationaleCache::seed(&sample_plan());
        let ticket = cache.begin(Day::Monday).unwrap();

        cache.reseed(&revised_plan());
        assert!(!cache.is_loading(Day::Monday));

        assert!(!cache.complete(ticket, Ok::<_, String>("late".to_string())));
        assert_eq!(cache.get(Day::Monday).text, "revised narrative for monday");
    }
}
