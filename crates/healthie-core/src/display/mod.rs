//! Markdown rendering of plans, days and the chat transcript.
//!
//! Views are thin wrappers over borrowed state that implement
//! [`std::fmt::Display`]; the domain types themselves only print their wire
//! names.
//!
//! ```text
//! (Plan, Selection) --SelectionResolver--> PlanOverview / DayView / DayOptions
//! RationaleCache ------------------------> DayView / WeekView
//! Conversation --------------------------> Transcript
//! ```
//!
//! # Examples
//!
//! ```rust
//! use healthie_core::display::Notice;
//!
//! let notice = Notice::warning("Saved plan could not be read and was discarded");
//! assert!(notice.to_string().starts_with("Warning:"));
//! ```

mod models;
mod status;
mod views;

pub use status::{Notice, NoticeLevel};
pub use views::{DayOptions, DayView, PlanOverview, Transcript, WeekView};
