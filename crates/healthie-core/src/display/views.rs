//! Markdown views over a plan snapshot.

use std::fmt;

use crate::{
    cost::NOT_AVAILABLE,
    models::{ChatMessage, Day, ExerciseOption, MealOption, Role, SlotKind},
    rationale::{Rationale, RationaleCache},
    selection::SelectionResolver,
};

fn cost_text(cost: &str) -> &str {
    if cost.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        cost
    }
}

fn write_meal(f: &mut fmt::Formatter<'_>, meal: &MealOption) -> fmt::Result {
    write!(
        f,
        "{} ({:.0} kcal, {})",
        meal.name,
        meal.calories,
        cost_text(&meal.cost)
    )
}

fn write_exercise(f: &mut fmt::Formatter<'_>, exercise: &ExerciseOption) -> fmt::Result {
    if exercise.target.trim().is_empty() {
        write!(f, "{} ({:.0} kcal)", exercise.name, exercise.calories_burned)
    } else {
        write!(
            f,
            "{} ({}, {:.0} kcal)",
            exercise.name, exercise.target, exercise.calories_burned
        )
    }
}

/// Weekly summary: overview text, weekly totals and a per-day table.
pub struct PlanOverview<'a> {
    resolver: SelectionResolver<'a>,
}

impl<'a> PlanOverview<'a> {
    pub fn new(resolver: SelectionResolver<'a>) -> Self {
        Self { resolver }
    }
}

impl fmt::Display for PlanOverview<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.resolver.plan();
        writeln!(f, "# แผนสุขภาพ 7 วัน")?;
        writeln!(f)?;
        if !plan.summary.trim().is_empty() {
            writeln!(f, "{}", plan.summary)?;
            writeln!(f)?;
        }

        writeln!(f, "- ค่าอาหารรวมต่อสัปดาห์: {}", self.resolver.weekly_cost())?;
        writeln!(
            f,
            "- แคลอรี่ที่เผาผลาญรวม: {:.0} kcal",
            self.resolver.weekly_calories_burned()
        )?;
        if !plan.recommended_sleep.trim().is_empty() {
            writeln!(f, "- การนอนหลับ: {}", plan.recommended_sleep)?;
        }
        writeln!(f)?;

        writeln!(f, "| วัน | แคลอรี่ | ค่าอาหาร | ออกกำลังกาย |")?;
        writeln!(f, "|:-|-:|-:|:-|")?;
        for day in Day::ALL {
            let metrics = self.resolver.day_metrics(day);
            let exercise = self
                .resolver
                .resolve_exercise(day)
                .map_or("-", |e| e.name.as_str());
            writeln!(
                f,
                "| {} | {:.0} kcal | {} | {} |",
                day.label(),
                metrics.calories,
                metrics.cost,
                exercise
            )?;
        }
        Ok(())
    }
}

/// One day's selected options, totals and rationale.
pub struct DayView<'a> {
    resolver: SelectionResolver<'a>,
    day: Day,
    rationale: &'a Rationale,
}

impl<'a> DayView<'a> {
    pub fn new(resolver: SelectionResolver<'a>, day: Day, rationale: &'a Rationale) -> Self {
        Self {
            resolver,
            day,
            rationale,
        }
    }
}

impl fmt::Display for DayView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## {}", self.day.label())?;
        writeln!(f)?;

        for (slot, meal) in self.resolver.selected_meals(self.day).iter() {
            write!(f, "- {}: ", slot.label())?;
            match meal {
                Some(meal) => write_meal(f, meal)?,
                None => write!(f, "-")?,
            }
            writeln!(f)?;
        }
        write!(f, "- {}: ", SlotKind::Exercise.label())?;
        match self.resolver.resolve_exercise(self.day) {
            Some(exercise) => write_exercise(f, exercise)?,
            None => write!(f, "-")?,
        }
        writeln!(f)?;
        writeln!(f)?;

        let metrics = self.resolver.day_metrics(self.day);
        writeln!(
            f,
            "แคลอรี่รวม: {:.0} kcal | ค่าอาหาร: {}",
            metrics.calories, metrics.cost
        )?;
        writeln!(f)?;

        match self.rationale.marker() {
            "" => writeln!(f, "### คำอธิบาย")?,
            marker => writeln!(f, "### คำอธิบาย ({marker})")?,
        }
        writeln!(f)?;
        writeln!(f, "{}", self.rationale.text)
    }
}

/// Every day in order, each as a [`DayView`].
pub struct WeekView<'a> {
    resolver: SelectionResolver<'a>,
    rationales: &'a RationaleCache,
}

impl<'a> WeekView<'a> {
    pub fn new(resolver: SelectionResolver<'a>, rationales: &'a RationaleCache) -> Self {
        Self {
            resolver,
            rationales,
        }
    }
}

impl fmt::Display for WeekView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PlanOverview::new(self.resolver))?;
        for day in Day::ALL {
            writeln!(f)?;
            write!(
                f,
                "{}",
                DayView::new(self.resolver, day, self.rationales.get(day))
            )?;
        }
        Ok(())
    }
}

/// All options of every slot of a day, numbered from 1, with the selected
/// one in bold.
pub struct DayOptions<'a> {
    resolver: SelectionResolver<'a>,
    day: Day,
}

impl<'a> DayOptions<'a> {
    pub fn new(resolver: SelectionResolver<'a>, day: Day) -> Self {
        Self { resolver, day }
    }

    fn write_entry(
        &self,
        f: &mut fmt::Formatter<'_>,
        slot: SlotKind,
        index: usize,
        entry: &dyn Fn(&mut fmt::Formatter<'_>) -> fmt::Result,
    ) -> fmt::Result {
        let selected = self.resolver.effective_index(self.day, slot) == index;
        write!(f, "{}. ", index + 1)?;
        if selected {
            write!(f, "**")?;
            entry(f)?;
            writeln!(f, "** (เลือกอยู่)")
        } else {
            entry(f)?;
            writeln!(f)
        }
    }
}

impl fmt::Display for DayOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan = self.resolver.plan();
        writeln!(f, "## ตัวเลือกสำหรับ{}", self.day.label())?;

        for slot in SlotKind::MEALS {
            writeln!(f)?;
            writeln!(f, "### {} ({})", slot.label(), slot)?;
            writeln!(f)?;
            for (index, meal) in plan.meal_options(self.day, slot).iter().enumerate() {
                self.write_entry(f, slot, index, &|f| write_meal(f, meal))?;
            }
        }

        writeln!(f)?;
        writeln!(f, "### {} ({})", SlotKind::Exercise.label(), SlotKind::Exercise)?;
        writeln!(f)?;
        for (index, exercise) in plan.exercises(self.day).iter().enumerate() {
            self.write_entry(f, SlotKind::Exercise, index, &|f| {
                write_exercise(f, exercise)
            })?;
        }
        Ok(())
    }
}

/// The chat transcript, numbered from 1, with proposal markers.
pub struct Transcript<'a> {
    messages: &'a [ChatMessage],
    start: usize,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [ChatMessage]) -> Self {
        Self { messages, start: 0 }
    }

    /// Only the messages from `start` on, keeping their numbers.
    pub fn from_index(messages: &'a [ChatMessage], start: usize) -> Self {
        Self {
            messages,
            start: start.min(messages.len()),
        }
    }
}

impl fmt::Display for Transcript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, message) in self.messages.iter().enumerate().skip(self.start) {
            let number = index + 1;
            let author = match message.role {
                Role::User => "คุณ",
                Role::Agent => "Healthie",
            };
            writeln!(f, "**[{number}] {author}:** {}", message.text)?;
            if message.has_pending_proposal() {
                writeln!(
                    f,
                    "> แผนใหม่รอการยืนยัน: `accept {number}` หรือ `cancel {number}`"
                )?;
            } else if let Some(outcome) = message.outcome {
                writeln!(f, "> แผนที่เสนอ: {outcome}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{revised_plan, sample_plan},
        models::ProposalOutcome,
        selection::Selection,
    };

    #[test]
    fn test_overview_shows_weekly_totals() {
        let plan = sample_plan();
        let selection = Selection::defaults();
        let output = PlanOverview::new(SelectionResolver::new(&plan, &selection)).to_string();

        assert!(output.contains("แผนสุขภาพสำหรับผู้สูงอายุ"));
        assert!(output.contains("ค่าอาหารรวมต่อสัปดาห์: 1120-1470 บาท"));
        assert!(output.contains("แคลอรี่ที่เผาผลาญรวม: 1050 kcal"));
        assert!(output.contains("| วันจันทร์ | 1200 kcal | 160-210 บาท | เดินเร็ว |"));
    }

    #[test]
    fn test_day_view_follows_selection_and_marks_stale() {
        let plan = sample_plan();
        let mut selection = Selection::defaults();
        selection
            .set(&plan, Day::Monday, SlotKind::Breakfast, 2)
            .unwrap();
        let rationale = Rationale {
            text: "old".to_string(),
            stale: true,
            loading: false,
        };
        let output = DayView::new(
            SelectionResolver::new(&plan, &selection),
            Day::Monday,
            &rationale,
        )
        .to_string();

        assert!(output.contains("- มื้อเช้า: ขนมปังโฮลวีต (250 kcal, N/A)"));
        assert!(output.contains("- ออกกำลังกาย: เดินเร็ว (30 นาที, 150 kcal)"));
        assert!(output.contains("แคลอรี่รวม: 1150 kcal | ค่าอาหาร: 120-160 บาท"));
        assert!(output.contains("### คำอธิบาย (ต้องอัปเดต)"));
    }

    #[test]
    fn test_day_options_marks_selected() {
        let plan = sample_plan();
        let mut selection = Selection::defaults();
        selection.set(&plan, Day::Friday, SlotKind::Lunch, 1).unwrap();
        let output =
            DayOptions::new(SelectionResolver::new(&plan, &selection), Day::Friday).to_string();

        assert!(output.contains("1. ข้าวกล้องผัดผัก (500 kcal, 60-80 บาท)\n"));
        assert!(output.contains("2. **ก๋วยเตี๋ยวน้ำใส (450 kcal, 50 บาท)** (เลือกอยู่)"));
        assert!(output.contains("3. ยืดเหยียด (15 นาที, 50 kcal)"));
    }

    #[test]
    fn test_transcript_markers() {
        let mut cancelled = ChatMessage::agent("แผนเดิม");
        cancelled.outcome = Some(ProposalOutcome::Cancelled);
        let messages = vec![
            ChatMessage::agent("สวัสดี"),
            ChatMessage::user("ขอเปลี่ยนมื้อเช้า"),
            ChatMessage::proposal("ปรับแล้ว", revised_plan()),
            cancelled,
        ];
        let output = Transcript::new(&messages).to_string();

        assert!(output.contains("**[2] คุณ:** ขอเปลี่ยนมื้อเช้า"));
        assert!(output.contains("`accept 3` หรือ `cancel 3`"));
        assert!(output.contains("> แผนที่เสนอ: ยกเลิกแล้ว"));

        let tail = Transcript::from_index(&messages, 2).to_string();
        assert!(tail.starts_with("**[3] Healthie:** ปรับแล้ว"));
        assert!(!tail.contains("[2]"));
        assert!(Transcript::from_index(&messages, 10).to_string().is_empty());
    }
}
