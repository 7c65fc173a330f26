//! Collaborator interface for the generative text/plan service.
//!
//! The planner never talks to a network directly. It holds an
//! `Arc<dyn GenerativeService>` constructed once at startup and passed in
//! through [`crate::PlannerBuilder`], which keeps every round trip
//! substitutable in tests.
//!
//! ```text
//! Planner
//!     |
//!     | generate_plan(profile) -----------------> Plan
//!     | generate_day_narrative(day, meals, ..) -> text
//!     | create_conversation(instruction, seed) -> Arc<dyn ChatSession>
//!     |                                                |
//!     |                     send(history, text) -------+--> reply text
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::{
    models::{ChatTurn, Day, HealthProfile, MealOption, Plan, SlotKind},
    selection::SelectedMeals,
};

/// Failure of a call to the generative service.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or the connection failed
    #[error("Request failed: {0}")]
    Request(String),
    /// The service answered with a non-success status
    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },
    /// The service answered but the payload was unusable
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Owned copy of a day's selected meals, passed to narrative generation.
#[derive(Debug, Clone, PartialEq)]
pub struct MealChoice {
    pub name: String,
    pub cost: String,
    pub calories: f64,
}

/// Owned snapshot of a day's three meal choices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayMeals {
    pub breakfast: Option<MealChoice>,
    pub lunch: Option<MealChoice>,
    pub dinner: Option<MealChoice>,
}

impl DayMeals {
    pub fn iter(&self) -> impl Iterator<Item = (SlotKind, Option<&MealChoice>)> {
        [
            (SlotKind::Breakfast, self.breakfast.as_ref()),
            (SlotKind::Lunch, self.lunch.as_ref()),
            (SlotKind::Dinner, self.dinner.as_ref()),
        ]
        .into_iter()
    }
}

impl From<SelectedMeals<'_>> for DayMeals {
    fn from(meals: SelectedMeals<'_>) -> Self {
        let own = |meal: Option<&MealOption>| {
            meal.map(|m| MealChoice {
                name: m.name.clone(),
                cost: m.cost.clone(),
                calories: m.calories,
            })
        };
        Self {
            breakfast: own(meals.breakfast),
            lunch: own(meals.lunch),
            dinner: own(meals.dinner),
        }
    }
}

/// A chat session created against one plan and profile context.
///
/// The session carries the system instruction and seed history; the caller
/// supplies the visible history on every request so the session itself
/// holds no hidden conversational state.
#[async_trait]
pub trait ChatSession: Send + Sync {
    /// Sends `text` after `history` and waits for exactly one reply.
    async fn send(&self, history: &[ChatTurn], text: &str) -> Result<String, TransportError>;
}

/// The generative text/plan service.
///
/// Object-safe so it can be stored as `Arc<dyn GenerativeService>`.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Opens a chat session seeded with a system instruction and history.
    fn create_conversation(
        &self,
        system_instruction: &str,
        seed_history: Vec<ChatTurn>,
    ) -> Arc<dyn ChatSession>;

    /// Produces a full seven-day plan for the profile.
    async fn generate_plan(&self, profile: &HealthProfile) -> Result<Plan, TransportError>;

    /// Produces a short rationale for a day's selected meals.
    async fn generate_day_narrative(
        &self,
        day: Day,
        meals: &DayMeals,
        profile: &HealthProfile,
    ) -> Result<String, TransportError>;
}

/// Stand-in used when no generative service is configured. Reading and
/// editing a saved plan still works; every generative call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineService;

struct OfflineSession;

const OFFLINE: &str = "no generative service configured";

#[async_trait]
impl ChatSession for OfflineSession {
    async fn send(&self, _history: &[ChatTurn], _text: &str) -> Result<String, TransportError> {
        Err(TransportError::Request(OFFLINE.to_string()))
    }
}

#[async_trait]
impl GenerativeService for OfflineService {
    fn create_conversation(
        &self,
        _system_instruction: &str,
        _seed_history: Vec<ChatTurn>,
    ) -> Arc<dyn ChatSession> {
        Arc::new(OfflineSession)
    }

    async fn generate_plan(&self, _profile: &HealthProfile) -> Result<Plan, TransportError> {
        Err(TransportError::Request(OFFLINE.to_string()))
    }

    async fn generate_day_narrative(
        &self,
        _day: Day,
        _meals: &DayMeals,
        _profile: &HealthProfile,
    ) -> Result<String, TransportError> {
        Err(TransportError::Request(OFFLINE.to_string()))
    }
}

// Compile-time assertion: both traits must be usable as trait objects.
const _: () = {
    fn _assert_object_safe(_: &dyn GenerativeService, _: &dyn ChatSession) {}
};
