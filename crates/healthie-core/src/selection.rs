//! Per-slot option choices and the aggregates derived from them.
//!
//! A [`Selection`] maps each day and slot to an option index. The
//! [`SelectionResolver`] reads a `(Plan, Selection)` snapshot and recomputes
//! every derived figure on demand; nothing here is cached.

use std::collections::BTreeMap;

use crate::{
    cost::CostRange,
    error::{PlannerError, Result},
    models::{Day, ExerciseOption, MealOption, Plan, SlotKind},
};

/// The user's chosen option index for each slot of each day.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    days: BTreeMap<Day, BTreeMap<SlotKind, usize>>,
}

impl Selection {
    /// A selection with no entries, as before the first render.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Index 0 for every slot of every day.
    pub fn defaults() -> Self {
        let days = Day::ALL
            .into_iter()
            .map(|day| (day, SlotKind::ALL.into_iter().map(|s| (s, 0)).collect()))
            .collect();
        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The stored index, if any.
    pub fn get(&self, day: Day, slot: SlotKind) -> Option<usize> {
        self.days.get(&day).and_then(|slots| slots.get(&slot)).copied()
    }

    /// Replaces the `(day, slot)` entry after checking `index` against the
    /// plan's option list. An out-of-range index leaves the selection as it
    /// was.
    pub fn set(&mut self, plan: &Plan, day: Day, slot: SlotKind, index: usize) -> Result<()> {
        let len = plan.option_count(day, slot);
        if index >= len {
            return Err(PlannerError::InvalidSelection {
                day,
                slot,
                index,
                len,
            });
        }
        self.days.entry(day).or_default().insert(slot, index);
        Ok(())
    }
}

/// A resolved option of either slot family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectedOption<'a> {
    Meal(&'a MealOption),
    Exercise(&'a ExerciseOption),
}

impl SelectedOption<'_> {
    pub fn name(&self) -> &str {
        match self {
            SelectedOption::Meal(meal) => &meal.name,
            SelectedOption::Exercise(exercise) => &exercise.name,
        }
    }
}

/// The three resolved meals of a day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedMeals<'a> {
    pub breakfast: Option<&'a MealOption>,
    pub lunch: Option<&'a MealOption>,
    pub dinner: Option<&'a MealOption>,
}

impl<'a> SelectedMeals<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (SlotKind, Option<&'a MealOption>)> {
        [
            (SlotKind::Breakfast, self.breakfast),
            (SlotKind::Lunch, self.lunch),
            (SlotKind::Dinner, self.dinner),
        ]
        .into_iter()
    }
}

/// Figures derived for one day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayMetrics {
    /// Sum of the three selected meals' calories
    pub calories: f64,
    /// Sum of the three selected meals' cost bounds
    pub cost: CostRange,
}

/// Read-only view over a `(Plan, Selection)` snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SelectionResolver<'a> {
    plan: &'a Plan,
    selection: &'a Selection,
}

impl<'a> SelectionResolver<'a> {
    pub fn new(plan: &'a Plan, selection: &'a Selection) -> Self {
        Self { plan, selection }
    }

    pub fn plan(&self) -> &'a Plan {
        self.plan
    }

    /// The index actually used for a slot: the stored one when it is in
    /// range, otherwise 0.
    pub fn effective_index(&self, day: Day, slot: SlotKind) -> usize {
        let len = self.plan.option_count(day, slot);
        match self.selection.get(day, slot) {
            Some(index) if index < len => index,
            _ => 0,
        }
    }

    pub fn resolve(&self, day: Day, slot: SlotKind) -> Option<SelectedOption<'a>> {
        match slot {
            SlotKind::Exercise => self.resolve_exercise(day).map(SelectedOption::Exercise),
            meal => self.resolve_meal(day, meal).map(SelectedOption::Meal),
        }
    }

    /// The selected option of a meal slot; `None` for the exercise slot or
    /// an empty list.
    pub fn resolve_meal(&self, day: Day, slot: SlotKind) -> Option<&'a MealOption> {
        self.plan.meal_options(day, slot).get(self.effective_index(day, slot))
    }

    pub fn resolve_exercise(&self, day: Day) -> Option<&'a ExerciseOption> {
        self.plan
            .exercises(day)
            .get(self.effective_index(day, SlotKind::Exercise))
    }

    pub fn selected_meals(&self, day: Day) -> SelectedMeals<'a> {
        SelectedMeals {
            breakfast: self.resolve_meal(day, SlotKind::Breakfast),
            lunch: self.resolve_meal(day, SlotKind::Lunch),
            dinner: self.resolve_meal(day, SlotKind::Dinner),
        }
    }

    pub fn day_calories(&self, day: Day) -> f64 {
        self.selected_meals(day)
            .iter()
            .filter_map(|(_, meal)| meal)
            .map(|meal| meal.calories)
            .sum()
    }

    pub fn day_cost_range(&self, day: Day) -> CostRange {
        self.selected_meals(day)
            .iter()
            .map(|(_, meal)| meal.map_or(CostRange::ZERO, |m| CostRange::parse(&m.cost)))
            .sum()
    }

    /// The day's total meal cost rendered for display.
    pub fn day_cost(&self, day: Day) -> String {
        self.day_cost_range(day).to_string()
    }

    pub fn day_metrics(&self, day: Day) -> DayMetrics {
        DayMetrics {
            calories: self.day_calories(day),
            cost: self.day_cost_range(day),
        }
    }

    /// Calories burned by the selected exercises over the week. Before any
    /// selection exists the plan's own precomputed total is used.
    pub fn weekly_calories_burned(&self) -> f64 {
        if self.selection.is_empty() {
            return self.plan.total_calories_burned;
        }
        Day::ALL
            .into_iter()
            .filter_map(|day| self.resolve_exercise(day))
            .map(|exercise| exercise.calories_burned)
            .sum()
    }

    pub fn weekly_cost_range(&self) -> CostRange {
        Day::ALL
            .into_iter()
            .map(|day| self.day_cost_range(day))
            .sum()
    }

    /// Sum of every day's cost; "N/A" only when every day is "N/A".
    pub fn weekly_cost(&self) -> String {
        self.weekly_cost_range().to_string()
    }
}
