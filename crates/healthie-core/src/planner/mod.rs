//! High-level planner API tying the plan, selection, rationale cache and
//! conversation together.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐      ┌─────────────────────┐
//! │       Planner        │─────▶│ GenerativeService   │  plans, narratives,
//! │  Mutex<PlannerState> │      │ ChatSession         │  chat replies
//! │   profile            │      └─────────────────────┘
//! │   Option<PlanState>  │      ┌─────────────────────┐
//! │     plan, selection, │─────▶│ PlanStore           │  saved plan
//! │     rationales,      │      │ (spawn_blocking)    │
//! │     conversation     │      └─────────────────────┘
//! └──────────────────────┘
//! ```
//!
//! All mutable state sits behind one async mutex. The lock is never held
//! across a call to the generative service or the store: operations that
//! need one claim their guard (rationale in-flight flag, conversation
//! outstanding flag), release the lock, await the call, then lock again to
//! install the outcome. Replacing the plan happens inside a single critical
//! section, so readers never see a new plan paired with an old selection.
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances
//! - `plan_ops`: restore, generate, save, select
//! - `rationale_ops`: per-day rationale regeneration
//! - `chat_ops`: sending messages and resolving proposals
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use healthie_core::{
//!     models::{Day, SlotKind},
//!     PlannerBuilder, RestoreOutcome,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new().build().await?;
//!
//! if let RestoreOutcome::Restored = planner.restore().await? {
//!     planner.select(Day::Monday, SlotKind::Lunch, 1).await?;
//!     let snapshot = planner.snapshot().await?;
//!     println!("{}", snapshot.resolver().day_cost(Day::Monday));
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    conversation::Conversation,
    error::{PlannerError, Result},
    models::{ChatMessage, ChatTurn, HealthProfile, Plan, Role},
    prompts,
    proposal::ProposalState,
    rationale::RationaleCache,
    selection::{Selection, SelectionResolver},
    service::{ChatSession, GenerativeService},
    store::PlanStore,
};

pub mod builder;
mod chat_ops;
mod plan_ops;
mod rationale_ops;


pub use builder::PlannerBuilder;
pub use chat_ops::AcceptReport;
pub use plan_ops::RestoreOutcome;

/// What happens to the visible chat history when a plan is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum History {
    /// Keep the transcript; only later turns reach the new session
    Keep,
    /// Start over with the greeting
    Restart,
}

/// Everything derived from the current plan.
struct PlanState {
    plan: Arc<Plan>,
    selection: Selection,
    rationales: RationaleCache,
    conversation: Conversation,
    session: Arc<dyn ChatSession>,
}

impl PlanState {
    fn new(plan: Arc<Plan>, session: Arc<dyn ChatSession>) -> Self {
        Self {
            selection: Selection::defaults(),
            rationales: RationaleCache::seed(&plan),
            conversation: Conversation::new(),
            plan,
            session,
        }
    }

    fn replace(&mut self, plan: Arc<Plan>, session: Arc<dyn ChatSession>, history: History) {
        self.selection = Selection::defaults();
        self.rationales.reseed(&plan);
        match history {
            History::Keep => self.conversation.reseed(),
            History::Restart => self.conversation.restart(),
        }
        self.plan = plan;
        self.session = session;
    }
}

struct PlannerState {
    profile: HealthProfile,
    active: Option<PlanState>,
}

impl PlannerState {
    fn active_mut(&mut self) -> Result<&mut PlanState> {
        self.active.as_mut().ok_or(PlannerError::NoActivePlan)
    }
}

/// A consistent copy of the planner state at one point in time.
#[derive(Debug, Clone)]
pub struct PlanSnapshot {
    pub plan: Arc<Plan>,
    pub selection: Selection,
    pub rationales: RationaleCache,
    pub conversation: Conversation,
}

impl PlanSnapshot {
    pub fn resolver(&self) -> SelectionResolver<'_> {
        SelectionResolver::new(&self.plan, &self.selection)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.conversation.messages()
    }

    pub fn proposals(&self) -> ProposalState {
        ProposalState::of(&self.conversation)
    }
}

/// Main planner interface.
pub struct Planner {
    service: Arc<dyn GenerativeService>,
    store: Arc<dyn PlanStore>,
    state: Mutex<PlannerState>,
}

impl Planner {
    pub(crate) fn new(
        service: Arc<dyn GenerativeService>,
        store: Arc<dyn PlanStore>,
        profile: HealthProfile,
    ) -> Self {
        Self {
            service,
            store,
            state: Mutex::new(PlannerState {
                profile,
                active: None,
            }),
        }
    }

    async fn lock(&self) -> MutexGuard<'_, PlannerState> {
        self.state.lock().await
    }

    /// Opens a chat session seeded with the profile and plan context and the
    /// greeting.
    fn open_session(&self, profile: &HealthProfile, plan: &Plan) -> Result<Arc<dyn ChatSession>> {
        let seed = vec![
            ChatTurn::new(Role::User, prompts::context_message(profile, plan)?),
            ChatTurn::new(Role::Agent, prompts::GREETING),
        ];
        Ok(self
            .service
            .create_conversation(prompts::SYSTEM_INSTRUCTION, seed))
    }

    /// Installs `plan` with default selection, reseeded rationales and a new
    /// chat session.
    fn install(&self, state: &mut PlannerState, plan: Arc<Plan>, history: History) -> Result<()> {
        let session = self.open_session(&state.profile, &plan)?;
        match state.active.as_mut() {
            Some(active) => active.replace(plan, session, history),
            None => state.active = Some(PlanState::new(plan, session)),
        }
        Ok(())
    }

    /// Whether a plan is currently installed.
    pub async fn has_plan(&self) -> bool {
        self.lock().await.active.is_some()
    }

    pub async fn profile(&self) -> HealthProfile {
        self.lock().await.profile.clone()
    }

    /// Copies the current state for rendering.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::NoActivePlan` before a plan is generated or
    /// restored.
    pub async fn snapshot(&self) -> Result<PlanSnapshot> {
        let mut state = self.lock().await;
        let active = state.active_mut()?;
        Ok(PlanSnapshot {
            plan: Arc::clone(&active.plan),
            selection: active.selection.clone(),
            rationales: active.rationales.clone(),
            conversation: active.conversation.clone(),
        })
    }
}
