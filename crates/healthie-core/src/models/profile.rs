//! Health profile collected from the user.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// A regularly taken medication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Medication {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default)]
    pub time: String,
}

/// Profile parameters used to generate and discuss a plan.
///
/// The profile is never persisted by the core; callers supply it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HealthProfile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    /// Chronic conditions, free text
    pub diseases: String,
    /// Exercise activities the user is interested in
    pub exercise: Vec<String>,
    /// Activity typed in by the user that is not in the preset list
    pub custom_exercise: String,
    /// Weekly food budget, free text
    pub budget: String,
    pub takes_medication: bool,
    pub medications: Vec<Medication>,
    pub favorite_foods: String,
}

impl HealthProfile {
    /// Body mass index, when height and weight are both known.
    pub fn bmi(&self) -> Option<f64> {
        if self.height_cm > 0.0 && self.weight_kg > 0.0 {
            let meters = self.height_cm / 100.0;
            Some(self.weight_kg / (meters * meters))
        } else {
            None
        }
    }

    /// Requires the measurements plan generation depends on.
    pub fn validate(&self) -> Result<()> {
        if self.age == 0 {
            return Err(PlannerError::invalid_input("age").with_reason("must be provided"));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            return Err(
                PlannerError::invalid_input("heightCm").with_reason("must be a positive number")
            );
        }
        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            return Err(
                PlannerError::invalid_input("weightKg").with_reason("must be a positive number")
            );
        }
        Ok(())
    }

    /// Medications relevant for prompts; empty unless the user takes any.
    pub fn active_medications(&self) -> &[Medication] {
        if self.takes_medication {
            &self.medications
        } else {
            &[]
        }
    }
}
