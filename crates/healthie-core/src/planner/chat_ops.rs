//! Conversation and proposal operations for the Planner.

use std::sync::Arc;

use log::{debug, info, warn};

use super::{History, Planner};
use crate::{
    error::{PlannerError, Result},
    models::{ChatMessage, Plan},
    prompts, proposal,
};

/// Outcome of accepting a proposal.
#[derive(Debug)]
pub struct AcceptReport {
    /// The plan now active
    pub plan: Arc<Plan>,
    /// Set when the new plan could not be persisted; the plan is active
    /// regardless
    pub save_error: Option<PlannerError>,
}

impl AcceptReport {
    /// User-facing notice for a failed save.
    pub fn notice(&self) -> Option<&'static str> {
        self.save_error.as_ref().map(|_| prompts::SAVE_FAILED)
    }
}

impl Planner {
    /// Sends a message and waits for the agent's reply.
    ///
    /// The user's message is appended before the round trip and is never
    /// removed. A transport failure appends the fixed apology instead of
    /// returning an error. Returns the appended reply, or `None` if the plan
    /// was replaced while the request was in flight.
    ///
    /// # Errors
    ///
    /// * `PlannerError::EmptyMessage` for blank text; nothing is appended.
    /// * `PlannerError::RequestOutstanding` while another reply is awaited.
    /// * `PlannerError::NoActivePlan` without a plan.
    pub async fn send_message(&self, text: &str) -> Result<Option<ChatMessage>> {
        let (pending, session) = {
            let mut state = self.lock().await;
            let active = state.active_mut()?;
            let pending = active.conversation.begin_send(text)?;
            (pending, Arc::clone(&active.session))
        };

        debug!("Sending chat message ({} prior turns)", pending.history.len());
        let outcome = session.send(&pending.history, &pending.text).await;

        let mut state = self.lock().await;
        let active = state.active_mut()?;
        Ok(active
            .conversation
            .complete(pending.ticket, outcome)
            .and_then(|index| active.conversation.message(index).cloned()))
    }

    /// Accepts the proposal in message `index`.
    ///
    /// The proposed plan replaces the active one together with a default
    /// selection, reseeded rationales and a re-seeded chat session, all in
    /// one step. The transcript is kept. The new plan is then saved; a save
    /// failure is reported in the [`AcceptReport`] and does not undo the
    /// acceptance.
    ///
    /// # Errors
    ///
    /// * `PlannerError::RequestOutstanding` while a chat reply is awaited.
    /// * `PlannerError::NoProposal` if the message holds no pending plan.
    pub async fn accept_proposal(&self, index: usize) -> Result<AcceptReport> {
        let plan = {
            let mut state = self.lock().await;
            let candidate = proposal::acceptable(&state.active_mut()?.conversation, index)?;
            // Open the session before resolving so a failure leaves the
            // proposal pending.
            let session = self.open_session(&state.profile, &candidate)?;
            let active = state.active_mut()?;
            let plan = proposal::accept(&mut active.conversation, index)?;
            active.replace(Arc::clone(&plan), session, History::Keep);
            plan
        };
        info!("Accepted proposal in message {index}");

        let save_error = self.persist(Arc::clone(&plan)).await.err();
        if let Some(err) = &save_error {
            warn!("Failed to save accepted plan: {err}");
        }
        Ok(AcceptReport { plan, save_error })
    }

    /// Cancels the proposal in message `index`. The plan, selection and
    /// rationales are untouched.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::NoProposal` if the message holds no pending
    /// plan.
    pub async fn cancel_proposal(&self, index: usize) -> Result<()> {
        let mut state = self.lock().await;
        let active = state.active_mut()?;
        proposal::cancel(&mut active.conversation, index)
    }
}
