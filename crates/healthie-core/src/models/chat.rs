//! Chat transcript entries.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::Plan;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Agent => "agent",
        }
    }
}

/// How a proposal attached to a message was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalOutcome {
    Accepted,
    Cancelled,
}

/// One entry of the conversation.
///
/// Messages are only ever appended; the one mutation allowed afterwards is
/// resolving the attached proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    /// Replacement plan awaiting accept or cancel
    pub proposed_plan: Option<Arc<Plan>>,
    /// Set once the proposal has been accepted or cancelled
    pub outcome: Option<ProposalOutcome>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            proposed_plan: None,
            outcome: None,
        }
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: Role::Agent,
            text: text.into(),
            proposed_plan: None,
            outcome: None,
        }
    }

    /// An agent message carrying a replacement plan.
    pub fn proposal(text: impl Into<String>, plan: Plan) -> Self {
        Self {
            proposed_plan: Some(Arc::new(plan)),
            ..Self::agent(text)
        }
    }

    /// Whether the message still holds an unresolved proposal.
    pub fn has_pending_proposal(&self) -> bool {
        self.proposed_plan.is_some()
    }
}

/// A role/text pair as exchanged with the generative service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

impl From<&ChatMessage> for ChatTurn {
    fn from(message: &ChatMessage) -> Self {
        Self::new(message.role, message.text.clone())
    }
}
