//! Chat history and single-flight round-trip state.
//!
//! A [`Conversation`] owns the visible message list. Sending is split in two
//! so the caller can perform the network call without holding the state:
//! [`Conversation::begin_send`] validates the input, appends the user's
//! message and returns the history to send; [`Conversation::complete`]
//! appends whatever came back. Reply parsing lives in [`classify_reply`],
//! a pure function that never fails.

use log::{debug, info, warn};
use serde::Deserialize;

use crate::{
    error::{PlannerError, Result},
    models::{ChatMessage, ChatTurn, Plan},
    prompts,
    service::TransportError,
};

/// Structured revision reply: `{ "responseText": .., "newPlan": { .. } }`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RevisionReply {
    response_text: String,
    new_plan: Plan,
}

/// Proof that a send was accepted against a given conversation seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SendTicket {
    epoch: u64,
}

/// Everything the caller needs to perform the round trip.
#[derive(Debug, Clone)]
#[must_use]
pub struct PendingSend {
    pub ticket: SendTicket,
    /// Turns exchanged since the session was seeded, excluding `text`
    pub history: Vec<ChatTurn>,
    pub text: String,
}

/// Visible chat history plus the outstanding-request flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    outstanding: bool,
    /// First message not already part of the session's seed history
    context_start: usize,
    epoch: u64,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// A fresh conversation opening with the agent's greeting. The greeting
    /// is part of the seed history, so it is never resent.
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::agent(prompts::GREETING)],
            outstanding: false,
            context_start: 1,
            epoch: 0,
        }
    }

    /// Discards the history and starts over for a newly generated plan.
    /// Any reply still in flight is dropped when it arrives.
    pub fn restart(&mut self) {
        *self = Self {
            epoch: self.epoch + 1,
            ..Self::new()
        };
    }

    /// Re-seeds against a new plan while keeping the visible history. Only
    /// messages appended from here on are sent to the new session.
    pub fn reseed(&mut self) {
        self.context_start = self.messages.len();
        self.epoch += 1;
        self.outstanding = false;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn message(&self, index: usize) -> Option<&ChatMessage> {
        self.messages.get(index)
    }

    pub(crate) fn message_mut(&mut self, index: usize) -> Option<&mut ChatMessage> {
        self.messages.get_mut(index)
    }

    pub(crate) fn push(&mut self, message: ChatMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub fn is_outstanding(&self) -> bool {
        self.outstanding
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Accepts a user message for sending.
    ///
    /// # Errors
    ///
    /// * `PlannerError::EmptyMessage` for blank text; nothing is appended.
    /// * `PlannerError::RequestOutstanding` while a reply is awaited;
    ///   nothing is appended.
    pub fn begin_send(&mut self, text: &str) -> Result<PendingSend> {
        if text.trim().is_empty() {
            return Err(PlannerError::EmptyMessage);
        }
        if self.outstanding {
            return Err(PlannerError::RequestOutstanding);
        }

        let history = self.messages[self.context_start..]
            .iter()
            .map(ChatTurn::from)
            .collect();
        self.messages.push(ChatMessage::user(text));
        self.outstanding = true;
        debug!("Chat request started ({} messages)", self.messages.len());

        Ok(PendingSend {
            ticket: SendTicket { epoch: self.epoch },
            history,
            text: text.to_string(),
        })
    }

    /// Appends the reply (or the apology on transport failure) and clears
    /// the outstanding flag.
    ///
    /// Returns the index of the appended message, or `None` when the ticket
    /// belongs to a conversation that has since been restarted or re-seeded.
    pub fn complete(
        &mut self,
        ticket: SendTicket,
        outcome: std::result::Result<String, TransportError>,
    ) -> Option<usize> {
        if ticket.epoch != self.epoch {
            debug!("Dropping chat reply for a replaced conversation");
            return None;
        }
        self.outstanding = false;

        let message = match outcome {
            Ok(raw) => classify_reply(&raw),
            Err(err) => {
                warn!("Chat request failed: {err}");
                ChatMessage::agent(prompts::CHAT_APOLOGY)
            }
        };
        if message.has_pending_proposal() {
            info!("Agent proposed a revised plan");
        }
        Some(self.push(message))
    }
}

/// Turns a raw agent reply into a chat message.
///
/// A reply that is a JSON object with a non-empty `responseText` and a
/// `newPlan` of the plan shape becomes a proposal. Anything else is shown
/// verbatim. A single surrounding Markdown code fence is ignored.
pub fn classify_reply(raw: &str) -> ChatMessage {
    let body = strip_code_fence(raw);
    if !body.starts_with('{') {
        return ChatMessage::agent(raw);
    }

    match serde_json::from_str::<RevisionReply>(body) {
        Ok(reply) if reply.response_text.trim().is_empty() => {
            debug!("Structured reply without response text; showing verbatim");
            ChatMessage::agent(raw)
        }
        Ok(reply) => match reply.new_plan.validate() {
            Ok(()) => ChatMessage::proposal(reply.response_text, reply.new_plan),
            Err(err) => {
                debug!("Proposed plan rejected ({err}); showing verbatim");
                ChatMessage::agent(raw)
            }
        },
        Err(err) => {
            debug!("Reply is not a plan revision ({err}); showing verbatim");
            ChatMessage::agent(raw)
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    let inner = inner
        .strip_prefix("json")
        .or_else(|| inner.strip_prefix("JSON"))
        .unwrap_or(inner);
    inner.trim()
}
