//! Core library for the Healthie health planner.
//!
//! A generative service produces a seven-day meal and exercise plan. This
//! crate keeps the user's per-slot choices over that plan, derives cost and
//! calorie figures from them, caches per-day explanatory text with
//! staleness tracking, and runs the chat protocol through which the agent
//! can propose a replacement plan for the user to accept or cancel.
//!
//! # Layout
//!
//! - [`cost`]: free-text price parsing and rendering
//! - [`selection`]: the [`Selection`] map and [`SelectionResolver`]
//! - [`rationale`]: the per-day [`RationaleCache`]
//! - [`conversation`] and [`proposal`]: chat history, reply classification
//!   and the accept/cancel protocol
//! - [`service`]: the generative service seam, with a Gemini client in
//!   [`gemini`]
//! - [`store`] and [`db`]: persistence of the saved plan
//! - [`display`]: Markdown views
//! - [`planner`]: the [`Planner`] facade tying it all together
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use healthie_core::{
//!     gemini::{GeminiClient, GeminiConfig},
//!     models::{Day, HealthProfile},
//!     PlannerBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(GeminiConfig::new("api-key"))?;
//! let planner = PlannerBuilder::new()
//!     .with_database_path(Some("healthie.db"))
//!     .with_service(Arc::new(client))
//!     .build()
//!     .await?;
//!
//! let profile = HealthProfile {
//!     age: 68,
//!     height_cm: 160.0,
//!     weight_kg: 64.0,
//!     ..Default::default()
//! };
//! planner.generate(profile).await?;
//! planner.save().await?;
//!
//! let rationale = planner.regenerate_rationale(Day::Monday).await?;
//! println!("{}", rationale.text);
//! # Ok(())
//! # }
//! ```

pub mod conversation;
pub mod cost;
pub mod db;
pub mod display;
pub mod error;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod models;
pub mod planner;
pub mod prompts;
pub mod proposal;
pub mod rationale;
pub mod selection;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export commonly used types
pub use conversation::{classify_reply, Conversation};
pub use cost::CostRange;
pub use db::Database;
pub use error::{PlannerError, Result};
pub use planner::{AcceptReport, PlanSnapshot, Planner, PlannerBuilder, RestoreOutcome};
pub use proposal::ProposalState;
pub use rationale::{Rationale, RationaleCache};
pub use selection::{Selection, SelectionResolver};
pub use service::{ChatSession, GenerativeService, OfflineService, TransportError};
pub use store::{MemoryPlanStore, PlanStore, SqlitePlanStore};
