//! Per-account record of one pass, kept only long enough to be reported.

use crate::quest::{QuestKind, QuestTally};
use crate::wire::UserInfo;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountOutcome {
    pub initial: Option<UserInfo>,
    pub final_info: Option<UserInfo>,
    pub checked_in: bool,
    pub referral_applied: bool,
    pub daily_quests: QuestTally,
    pub single_quests: QuestTally,
    pub treasury_reward: Option<String>,
    pub warbonds_sent: u64,
    pub transfers: u32,
}

impl AccountOutcome {
    pub fn record_quests(&mut self, kind: QuestKind, tally: QuestTally) {
        match kind {
            QuestKind::Daily => self.daily_quests = tally,
            QuestKind::Single => self.single_quests = tally,
        }
    }

    pub fn record_transfer(&mut self, amount: u64) {
        self.warbonds_sent = self.warbonds_sent.saturating_add(amount);
        self.transfers += 1;
    }

    #[must_use]
    pub const fn quests_completed(&self) -> usize {
        self.daily_quests.completed + self.single_quests.completed
    }

    /// `false` when the pass stopped before anything could be read.
    #[must_use]
    pub const fn reached_service(&self) -> bool {
        self.initial.is_some()
    }
}
