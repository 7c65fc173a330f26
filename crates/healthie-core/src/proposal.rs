//! Accept/cancel protocol for plans proposed in the conversation.
//!
//! A proposal is pending while its message still carries a plan. Resolving
//! it clears the plan from the message and records the outcome; the message
//! text stays in the transcript.

use std::sync::Arc;

use log::info;

use crate::{
    conversation::Conversation,
    error::{PlannerError, Result},
    models::{ChatMessage, Plan, ProposalOutcome},
    prompts,
};

/// Whether any proposal awaits a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProposalState {
    Idle,
    /// Indices of the messages holding an unresolved proposal
    Pending(Vec<usize>),
}

impl ProposalState {
    pub fn of(conversation: &Conversation) -> Self {
        let pending: Vec<usize> = conversation
            .messages()
            .iter()
            .enumerate()
            .filter(|(_, message)| message.has_pending_proposal())
            .map(|(index, _)| index)
            .collect();
        if pending.is_empty() {
            Self::Idle
        } else {
            Self::Pending(pending)
        }
    }
}

fn resolve(
    conversation: &mut Conversation,
    index: usize,
    outcome: ProposalOutcome,
) -> Result<Arc<Plan>> {
    let message = conversation
        .message_mut(index)
        .ok_or(PlannerError::NoProposal { index })?;
    let plan = message
        .proposed_plan
        .take()
        .ok_or(PlannerError::NoProposal { index })?;
    message.outcome = Some(outcome);
    Ok(plan)
}

/// Declines the proposal at `index` and appends the agent's scripted
/// continuation. Other messages, including other proposals, are untouched.
///
/// # Errors
///
/// Returns `PlannerError::NoProposal` if the message holds no pending plan.
pub fn cancel(conversation: &mut Conversation, index: usize) -> Result<()> {
    resolve(conversation, index, ProposalOutcome::Cancelled)?;
    conversation.push(ChatMessage::agent(prompts::PROPOSAL_CANCELLED));
    info!("Proposal in message {index} cancelled");
    Ok(())
}

/// The plan that [`accept`] would install, without resolving anything.
///
/// # Errors
///
/// * `PlannerError::RequestOutstanding` while a chat reply is awaited.
/// * `PlannerError::NoProposal` if the message holds no pending plan.
pub fn acceptable(conversation: &Conversation, index: usize) -> Result<Arc<Plan>> {
    if conversation.is_outstanding() {
        return Err(PlannerError::RequestOutstanding);
    }
    conversation
        .message(index)
        .and_then(|message| message.proposed_plan.clone())
        .ok_or(PlannerError::NoProposal { index })
}

/// Claims the proposal at `index` for installation and marks it accepted.
///
/// The caller installs the returned plan in the same critical section.
///
/// # Errors
///
/// Fails as [`acceptable`] does.
pub fn accept(conversation: &mut Conversation, index: usize) -> Result<Arc<Plan>> {
    acceptable(conversation, index)?;
    let plan = resolve(conversation, index, ProposalOutcome::Accepted)?;
    info!("Proposal in message {index} accepted");
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{revised_plan, sample_plan},
        models::Role,
    };

    fn with_proposals() -> Conversation {
        let mut conversation = Conversation::new();
        for (text, plan) in [("first", sample_plan()), ("second", revised_plan())] {
            let pending = conversation.begin_send(text).unwrap();
            let reply = serde_json::json!({"responseText": text, "newPlan": plan});
            conversation.complete(pending.ticket, Ok(reply.to_string()));
        }
        conversation
    }

    #[test]
    fn test_state_tracks_pending_proposals() {
        let conversation = with_proposals();
        let state = ProposalState::of(&conversation);
        assert_eq!(state, ProposalState::Pending(vec![2, 4]));
        assert_eq!(ProposalState::of(&Conversation::new()), ProposalState::Idle);
    }

    #[test]
    fn test_cancel_clears_only_that_proposal() {
        let mut conversation = with_proposals();
        let before = conversation.len();

        cancel(&mut conversation, 2).unwrap();

        assert_eq!(conversation.len(), before + 1);
        let cancelled = conversation.message(2).unwrap();
        assert_eq!(cancelled.text, "first");
        assert!(cancelled.proposed_plan.is_none());
        assert_eq!(cancelled.outcome, Some(ProposalOutcome::Cancelled));
        assert!(conversation.message(4).unwrap().has_pending_proposal());

        let last = conversation.messages().last().unwrap();
        assert_eq!(last.role, Role::Agent);
        assert_eq!(last.text, prompts::PROPOSAL_CANCELLED);
    }

    #[test]
    fn test_cancel_twice_is_rejected() {
        let mut conversation = with_proposals();
        cancel(&mut conversation, 4).unwrap();
        let len = conversation.len();

        let err = cancel(&mut conversation, 4).unwrap_err();
        assert!(matches!(err, PlannerError::NoProposal { index: 4 }));
        assert_eq!(conversation.len(), len);
    }

    #[test]
    fn test_cancel_plain_or_missing_message_is_rejected() {
        let mut conversation = with_proposals();
        assert!(matches!(
            cancel(&mut conversation, 0),
            Err(PlannerError::NoProposal { index: 0 })
        ));
        assert!(matches!(
            cancel(&mut conversation, 99),
            Err(PlannerError::NoProposal { index: 99 })
        ));
    }

    #[test]
    fn test_accept_takes_plan_once() {
        let mut conversation = with_proposals();
        let plan = accept(&mut conversation, 4).unwrap();
        assert_eq!(*plan, revised_plan());
        assert_eq!(
            conversation.message(4).unwrap().outcome,
            Some(ProposalOutcome::Accepted)
        );
        assert!(accept(&mut conversation, 4).is_err());
        assert_eq!(ProposalState::of(&conversation), ProposalState::Pending(vec![2]));
    }

    #[test]
    fn test_accept_rejected_while_outstanding() {
        let mut conversation = with_proposals();
        let _pending = conversation.begin_send("one more change").unwrap();

        let err = accept(&mut conversation, 2).unwrap_err();
        assert!(matches!(err, PlannerError::RequestOutstanding));
        assert!(conversation.message(2).unwrap().has_pending_proposal());
    }
}
