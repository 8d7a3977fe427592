//! Quest model and the per-request quest status.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which quest list a quest came from. Only used to route requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestKind {
    Daily,
    Single,
}

impl QuestKind {
    pub const ALL: [Self; 2] = [Self::Daily, Self::Single];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Single => "single",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Single => "Single",
        }
    }
}

impl fmt::Display for QuestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "single" => Ok(Self::Single),
            other => Err(format!("unknown quest type `{other}`")),
        }
    }
}

/// A quest as listed by the service. `kind` is the service's own quest
/// category (e.g. `TWITTER_FOLLOW`), not the list it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
}

/// Status reported by the progress endpoint.
///
/// Observed transitions are `PENDING -> DONE` and
/// `PENDING -> VERIFY -> CLAIM -> DONE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestStatus {
    Pending,
    Verify,
    Claim,
    Done,
    Unknown(String),
}

impl QuestStatus {
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "PENDING" => Self::Pending,
            "VERIFY" => Self::Verify,
            "CLAIM" => Self::Claim,
            "DONE" => Self::Done,
            other => Self::Unknown(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::Verify => "VERIFY",
            Self::Claim => "CLAIM",
            Self::Done => "DONE",
            Self::Unknown(raw) => raw,
        }
    }

    #[must_use]
    pub fn can_advance_to(&self, next: &Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Done | Self::Verify)
                | (Self::Verify, Self::Claim)
                | (Self::Claim, Self::Done)
        )
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Completed/total counter for one quest batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuestTally {
    pub completed: usize,
    pub total: usize,
}

impl QuestTally {
    pub fn record(&mut self, completed: bool) {
        self.total += 1;
        if completed {
            self.completed += 1;
        }
    }

    #[must_use]
    pub const fn failed(&self) -> usize {
        self.total - self.completed
    }
}

impl fmt::Display for QuestTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_known_and_unknown_values() {
        assert_eq!(QuestStatus::from_wire("VERIFY"), QuestStatus::Verify);
        assert_eq!(QuestStatus::from_wire("DONE"), QuestStatus::Done);
        let odd = QuestStatus::from_wire("EXPIRED");
        assert_eq!(odd, QuestStatus::Unknown("EXPIRED".to_string()));
        assert_eq!(odd.to_string(), "EXPIRED");
    }

    #[test]
    fn only_documented_transitions_are_allowed() {
        use QuestStatus::{Claim, Done, Pending, Verify};
        assert!(Pending.can_advance_to(&Done));
        assert!(Pending.can_advance_to(&Verify));
        assert!(Verify.can_advance_to(&Claim));
        assert!(Claim.can_advance_to(&Done));
        assert!(!Pending.can_advance_to(&Claim));
        assert!(!Done.can_advance_to(&Pending));
        assert!(!Verify.can_advance_to(&Done));
    }

    #[test]
    fn quest_reads_wire_type_field() {
        let quest: Quest =
            serde_json::from_str(r#"{"id":7,"type":"TWITTER_FOLLOW","title":"Follow","extra":1}"#)
                .unwrap();
        assert_eq!(quest.id, 7);
        assert_eq!(quest.kind, "TWITTER_FOLLOW");
    }

    #[test]
    fn tally_counts_failures() {
        let mut tally = QuestTally::default();
        tally.record(true);
        tally.record(false);
        tally.record(true);
        assert_eq!(tally.to_string(), "2/3");
        assert_eq!(tally.failed(), 1);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Daily".parse::<QuestKind>().unwrap(), QuestKind::Daily);
        assert!("weekly".parse::<QuestKind>().is_err());
    }
}
