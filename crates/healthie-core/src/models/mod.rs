//! Data models for plans, profiles and the chat transcript.
//!
//! This module contains the domain models of the Healthie planner. Display
//! implementations for these models live in [`crate::display`] to keep data
//! structures separate from presentation.
//!
//! ## Plan shape
//!
//! A [`Plan`] always covers the seven [`Day`]s. Each day offers three meal
//! slots (breakfast, lunch, dinner) and one exercise slot, identified by
//! [`SlotKind`], and each slot holds an ordered, non-empty list of options.
//! The serde representation matches the JSON the generative service emits:
//!
//! ```json
//! {
//!   "summary": "...",
//!   "estimatedCost": "1,200 - 1,500 บาท",
//!   "weeklyPlan": { "monday": { "breakfast": [ { "name": "...", "calories": 320, "cost": "40-50 บาท" } ], ... } },
//!   "weeklyExercisePlan": { "monday": [ { "name": "...", "target": "30 นาที", "caloriesBurned": 150 } ], ... },
//!   "totalCaloriesBurned": 900,
//!   "recommendedSleep": "..."
//! }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use healthie_core::models::{Day, SlotKind};
//!
//! let day: Day = "tue".parse().unwrap();
//! assert_eq!(day, Day::Tuesday);
//! assert!(SlotKind::Lunch.is_meal());
//! assert!(!SlotKind::Exercise.is_meal());
//! ```

pub mod chat;
pub mod day;
pub mod plan;
pub mod profile;


pub use chat::{ChatMessage, ChatTurn, ProposalOutcome, Role};
pub use day::{Day, SlotKind};
pub use plan::{DailyMeals, ExerciseOption, MealOption, Plan, Week};
pub use profile::{HealthProfile, Medication};
