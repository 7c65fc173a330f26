//! Weekly plan model in the shape emitted by the generative service.

use serde::{Deserialize, Serialize};

use super::{Day, SlotKind};
use crate::error::{PlannerError, Result};

/// One meal choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct MealOption {
    /// Menu name
    pub name: String,

    /// Estimated calories of the dish
    pub calories: f64,

    /// Free-text price range, e.g. "40-50 บาท"
    #[serde(default)]
    pub cost: String,
}

/// One exercise choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ExerciseOption {
    /// Activity name
    pub name: String,

    /// Free-text goal such as "30 นาที" or "2 กม."
    #[serde(default)]
    pub target: String,

    /// Estimated calories burned
    pub calories_burned: f64,
}

/// Meals of one day together with the service's own cost estimates and
/// narrative for the first options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct DailyMeals {
    #[serde(default)]
    pub daily_cost: String,
    pub breakfast: Vec<MealOption>,
    #[serde(default)]
    pub breakfast_cost: String,
    pub lunch: Vec<MealOption>,
    #[serde(default)]
    pub lunch_cost: String,
    pub dinner: Vec<MealOption>,
    #[serde(default)]
    pub dinner_cost: String,
    /// Why the day's first options suit the user
    #[serde(default)]
    pub rationale: String,
}

/// A value for each of the seven days.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Week<T> {
    pub monday: T,
    pub tuesday: T,
    pub wednesday: T,
    pub thursday: T,
    pub friday: T,
    pub saturday: T,
    pub sunday: T,
}

impl<T> Week<T> {
    pub fn get(&self, day: Day) -> &T {
        match day {
            Day::Monday => &self.monday,
            Day::Tuesday => &self.tuesday,
            Day::Wednesday => &self.wednesday,
            Day::Thursday => &self.thursday,
            Day::Friday => &self.friday,
            Day::Saturday => &self.saturday,
            Day::Sunday => &self.sunday,
        }
    }

    pub fn get_mut(&mut self, day: Day) -> &mut T {
        match day {
            Day::Monday => &mut self.monday,
            Day::Tuesday => &mut self.tuesday,
            Day::Wednesday => &mut self.wednesday,
            Day::Thursday => &mut self.thursday,
            Day::Friday => &mut self.friday,
            Day::Saturday => &mut self.saturday,
            Day::Sunday => &mut self.sunday,
        }
    }
}

/// The full seven-day meal and exercise plan.
///
/// Plans are never edited in place once produced; revisions arrive as a
/// whole new `Plan`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Plan {
    /// Overview of why the plan suits the user
    #[serde(default)]
    pub summary: String,

    /// Service-side estimate of the weekly food cost
    #[serde(default)]
    pub estimated_cost: String,

    pub weekly_plan: Week<DailyMeals>,

    pub weekly_exercise_plan: Week<Vec<ExerciseOption>>,

    /// Service-side total, computed from the first exercise option per day
    #[serde(default)]
    pub total_calories_burned: f64,

    #[serde(default)]
    pub recommended_sleep: String,
}

impl Plan {
    pub fn meals(&self, day: Day) -> &DailyMeals {
        self.weekly_plan.get(day)
    }

    pub fn exercises(&self, day: Day) -> &[ExerciseOption] {
        self.weekly_exercise_plan.get(day)
    }

    /// Meal options of a meal slot; empty for the exercise slot.
    pub fn meal_options(&self, day: Day, slot: SlotKind) -> &[MealOption] {
        let meals = self.meals(day);
        match slot {
            SlotKind::Breakfast => &meals.breakfast,
            SlotKind::Lunch => &meals.lunch,
            SlotKind::Dinner => &meals.dinner,
            SlotKind::Exercise => &[],
        }
    }

    /// Number of options offered in a slot.
    pub fn option_count(&self, day: Day, slot: SlotKind) -> usize {
        match slot {
            SlotKind::Exercise => self.exercises(day).len(),
            meal => self.meal_options(day, meal).len(),
        }
    }

    /// The per-day narrative the plan shipped with.
    pub fn narrative(&self, day: Day) -> &str {
        &self.meals(day).rationale
    }

    /// Checks the structural invariants the selection model relies on:
    /// every slot non-empty and every calorie figure a non-negative number.
    pub fn validate(&self) -> Result<()> {
        for day in Day::ALL {
            for slot in SlotKind::ALL {
                if self.option_count(day, slot) == 0 {
                    return Err(PlannerError::invalid_input(format!(
                        "{}.{}",
                        day.as_str(),
                        slot.as_str()
                    ))
                    .with_reason("slot must offer at least one option"));
                }
            }

            let meal_calories = SlotKind::MEALS
                .iter()
                .flat_map(|slot| self.meal_options(day, *slot))
                .map(|option| option.calories);
            let burned = self.exercises(day).iter().map(|o| o.calories_burned);
            if meal_calories.chain(burned).any(|c| !c.is_finite() || c < 0.0) {
                return Err(PlannerError::invalid_input(day.as_str())
                    .with_reason("calorie figures must be non-negative numbers"));
            }
        }
        Ok(())
    }
}
