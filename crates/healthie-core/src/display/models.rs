//! Display implementations for the small domain enums.
//!
//! These print the wire names (`monday`, `lunch`, `agent`); localized labels
//! are available through each type's `label()`.

use std::fmt;

use crate::{
    models::{Day, ProposalOutcome, Role, SlotKind},
    rationale::Rationale,
};

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for ProposalOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProposalOutcome::Accepted => "ยอมรับแล้ว",
            ProposalOutcome::Cancelled => "ยกเลิกแล้ว",
        };
        write!(f, "{label}")
    }
}

impl Rationale {
    /// Short status marker, empty when the text is current.
    pub fn marker(&self) -> &'static str {
        if self.loading {
            "กำลังอัปเดต..."
        } else if self.stale {
            "ต้องอัปเดต"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_display_uses_wire_names() {
        assert_eq!(Day::Saturday.to_string(), "saturday");
        assert_eq!(SlotKind::Exercise.to_string(), "exercise");
        assert_eq!(Role::Agent.to_string(), "agent");
    }

    #[test]
    fn test_rationale_marker() {
        let mut rationale = Rationale::default();
        assert_eq!(rationale.marker(), "");
        rationale.stale = true;
        assert_eq!(rationale.marker(), "ต้องอัปเดต");
        rationale.loading = true;
        assert_eq!(rationale.marker(), "กำลังอัปเดต...");
    }
}
