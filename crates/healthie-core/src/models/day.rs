//! Calendar days and slot kinds.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of the seven plan days, in calendar order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in fixed calendar order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Wire key used by the plan JSON shape.
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    /// Localized label shown to the user and sent in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Day::Monday => "วันจันทร์",
            Day::Tuesday => "วันอังคาร",
            Day::Wednesday => "วันพุธ",
            Day::Thursday => "วันพฤหัสบดี",
            Day::Friday => "วันศุกร์",
            Day::Saturday => "วันเสาร์",
            Day::Sunday => "วันอาทิตย์",
        }
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| {
                day.as_str() == lowered || day.as_str()[..3] == lowered || day.label() == s.trim()
            })
            .ok_or_else(|| format!("Invalid day: {s}"))
    }
}

/// The four choice points of a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Breakfast,
    Lunch,
    Dinner,
    Exercise,
}

impl SlotKind {
    /// All slot kinds, meals first.
    pub const ALL: [SlotKind; 4] = [
        SlotKind::Breakfast,
        SlotKind::Lunch,
        SlotKind::Dinner,
        SlotKind::Exercise,
    ];

    /// The three meal slots.
    pub const MEALS: [SlotKind; 3] = [SlotKind::Breakfast, SlotKind::Lunch, SlotKind::Dinner];

    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Breakfast => "breakfast",
            SlotKind::Lunch => "lunch",
            SlotKind::Dinner => "dinner",
            SlotKind::Exercise => "exercise",
        }
    }

    /// Localized label.
    pub fn label(&self) -> &'static str {
        match self {
            SlotKind::Breakfast => "มื้อเช้า",
            SlotKind::Lunch => "มื้อกลางวัน",
            SlotKind::Dinner => "มื้อเย็น",
            SlotKind::Exercise => "ออกกำลังกาย",
        }
    }

    /// Whether a change to this slot invalidates the day's rationale.
    pub fn is_meal(&self) -> bool {
        !matches!(self, SlotKind::Exercise)
    }
}

impl FromStr for SlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "b" => Ok(SlotKind::Breakfast),
            "lunch" | "l" => Ok(SlotKind::Lunch),
            "dinner" | "d" => Ok(SlotKind::Dinner),
            "exercise" | "e" | "x" => Ok(SlotKind::Exercise),
            _ => Err(format!("Invalid slot: {s}")),
        }
    }
}
