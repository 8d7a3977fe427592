//! Quest engine: list quests and drive each one through
//! progress, verification and claim.

use memeswar_core::{
    EndpointName, Envelope, Pacing, PathParams, Quest, QuestKind, QuestListPayload,
    QuestProgressPayload, QuestStatus, QuestTally,
};

use crate::client::ApiClient;
use crate::console;
use crate::errors::CallError;
use crate::transport::{ApiResponse, ApiTransport};

pub struct QuestEngine<'c, 'a, T> {
    client: &'c ApiClient<'a, T>,
    pacing: Pacing,
}

fn read_status(response: &ApiResponse) -> Result<(QuestStatus, String), CallError> {
    let envelope: Envelope<QuestProgressPayload> = response.json()?;
    let status = QuestStatus::from_wire(envelope.data.status.as_deref().unwrap_or_default());
    Ok((status, envelope.data.reward_amount().to_string()))
}

impl<'c, 'a, T: ApiTransport> QuestEngine<'c, 'a, T> {
    pub const fn new(client: &'c ApiClient<'a, T>, pacing: Pacing) -> Self {
        Self { client, pacing }
    }

    /// Fetch the quest list for `kind`. Failures are reported and yield an
    /// empty list; the next cycle simply tries again.
    pub async fn list_quests(&self, kind: QuestKind) -> Vec<Quest> {
        match self.fetch_quests(kind).await {
            Ok(quests) => {
                console::success(format!(
                    "Successfully fetched {} {kind} quests",
                    quests.len()
                ));
                quests
            }
            Err(err) => {
                console::failure(format!("Failed to get {kind} quests: {err}"));
                Vec::new()
            }
        }
    }

    async fn fetch_quests(&self, kind: QuestKind) -> Result<Vec<Quest>, CallError> {
        let response = self
            .client
            .call(EndpointName::Quests, &PathParams::quest_list(kind), None)
            .await?;
        if !response.is_ok() {
            return Err(CallError::UnexpectedStatus {
                status: response.status,
                body: response.body,
            });
        }
        let envelope: Envelope<QuestListPayload> = response.json()?;
        Ok(envelope.data.quests)
    }

    /// Drive one quest to completion. `true` when the reward is (or already
    /// was) granted.
    pub async fn complete_quest(&self, quest: &Quest, kind: QuestKind) -> bool {
        match self.advance(quest, kind).await {
            Ok(done) => done,
            Err(err) => {
                console::failure(format!("Error completing quest {}: {err}", quest.id));
                false
            }
        }
    }

    async fn advance(&self, quest: &Quest, kind: QuestKind) -> Result<bool, CallError> {
        let id = quest.id;
        let params = PathParams::quest(kind, id);

        let progress = self
            .client
            .call(EndpointName::QuestProgress, &params, None)
            .await?;
        if progress.is_conflict() {
            console::notice(format!("Quest {id} already completed"));
            return Ok(true);
        }
        if !progress.is_ok() {
            console::failure(format!(
                "Quest progress failed for ID {id}. Status: {}",
                progress.status
            ));
            return Ok(false);
        }

        let (mut status, reward) = read_status(&progress)?;
        console::info(format!("Initial status: {status}"));

        if status == QuestStatus::Done {
            console::success(format!("Quest {id} completed! Reward: {reward} WARBOND"));
            return Ok(true);
        }

        if status == QuestStatus::Verify {
            console::waiting(format!(
                "Quest {id} requires verification. Waiting {} seconds...",
                self.pacing.verify_delay_secs
            ));
            tokio::time::sleep(self.pacing.verify_delay()).await;

            let verify = self
                .client
                .call(EndpointName::QuestProgress, &params, None)
                .await?;
            if verify.is_conflict() {
                console::notice(format!("Quest {id} already claimed"));
                return Ok(true);
            }
            if !verify.is_ok() {
                console::failure(format!(
                    "Quest verification failed for ID {id}. Status: {}",
                    verify.status
                ));
                return Ok(false);
            }
            let (next, reward) = read_status(&verify)?;
            console::info(format!("Status after verify: {next}"));
            if !status.can_advance_to(&next) && next != QuestStatus::Done {
                log::warn!("quest {id}: unexpected transition {status} -> {next}");
            }
            status = next;
            if status == QuestStatus::Done {
                console::success(format!("Quest {id} completed! Reward: {reward} WARBOND"));
                return Ok(true);
            }
        }

        if status == QuestStatus::Claim {
            let claim = self
                .client
                .call(EndpointName::QuestClaim, &params, None)
                .await?;
            if claim.is_ok() {
                console::success(format!("Successfully claimed quest {id}"));
                return Ok(true);
            }
            if claim.is_conflict() {
                console::notice(format!("Quest {id} already claimed"));
                return Ok(true);
            }
            console::failure(format!(
                "Claim failed for quest {id}. Status: {}",
                claim.status
            ));
            return Ok(false);
        }

        console::warning(format!("Quest {id} not completed. Final status: {status}"));
        Ok(false)
    }

    /// List and complete every quest of `kind`, one after another.
    pub async fn complete_all_quests(&self, kind: QuestKind) -> QuestTally {
        let mut tally = QuestTally::default();
        let quests = self.list_quests(kind).await;
        if quests.is_empty() {
            console::waiting(format!("No {kind} quests found to complete"));
            return tally;
        }

        let last = quests.len() - 1;
        for (index, quest) in quests.iter().enumerate() {
            console::info(format!(
                "Processing {kind} quest: {} (Type: {}) (ID: {})",
                quest.title, quest.kind, quest.id
            ));
            tally.record(self.complete_quest(quest, kind).await);
            if index < last {
                tokio::time::sleep(self.pacing.quest_delay()).await;
            }
        }

        console::success(format!(
            "{} quest completion summary: {tally} processed successfully",
            kind.label()
        ));
        tally
    }
}
