//! One account's pass over the service.

use memeswar_core::{
    AccountOutcome, BotConfig, EndpointName, Envelope, PathParams, QuestKind, TreasuryPayload,
    UserInfo, UserPayload, WarbondTransfer,
};

use crate::client::ApiClient;
use crate::console;
use crate::errors::{CallError, ContractBroken};
use crate::quests::QuestEngine;
use crate::transport::{ApiResponse, ApiTransport};
use crate::validator::EndpointValidator;

/// High-level operations for a single account.
///
/// Operational calls report their own failures and return a plain value;
/// only a broken endpoint contract comes back as an error.
pub struct AccountSession<'a, T> {
    client: ApiClient<'a, T>,
    config: &'a BotConfig,
    validator: &'a EndpointValidator,
}

fn expect_ok(response: ApiResponse) -> Result<ApiResponse, CallError> {
    if response.is_ok() {
        Ok(response)
    } else {
        Err(CallError::UnexpectedStatus {
            status: response.status,
            body: response.body,
        })
    }
}

impl<'a, T: ApiTransport> AccountSession<'a, T> {
    pub const fn new(
        client: ApiClient<'a, T>,
        config: &'a BotConfig,
        validator: &'a EndpointValidator,
    ) -> Self {
        Self {
            client,
            config,
            validator,
        }
    }

    pub const fn client(&self) -> &ApiClient<'a, T> {
        &self.client
    }

    /// # Errors
    ///
    /// Any non-200 answer, transport failure or unreadable body.
    pub async fn get_user_info(&self) -> Result<UserInfo, CallError> {
        let response = self
            .client
            .call(EndpointName::User, &PathParams::default(), None)
            .await
            .and_then(expect_ok)?;
        let envelope: Envelope<UserPayload> = response.json()?;
        Ok(envelope.data.user)
    }

    /// `true` when checked in now or earlier today.
    pub async fn daily_checkin(&self) -> bool {
        match self
            .client
            .call(EndpointName::CheckIn, &PathParams::default(), None)
            .await
        {
            Ok(response) if response.is_ok() => {
                console::success("Daily check-in done");
                true
            }
            Ok(response) if response.is_conflict() => {
                console::notice("Already checked in today");
                true
            }
            Ok(response) => {
                console::warning(format!("Daily check-in failed. Status: {}", response.status));
                false
            }
            Err(err) => {
                console::failure(format!("Daily check-in error: {err}"));
                false
            }
        }
    }

    /// `true` when the code is (or already was) applied to this account.
    pub async fn use_referral_code(&self, code: &str) -> bool {
        match self
            .client
            .call(EndpointName::Referral, &PathParams::referral(code), None)
            .await
        {
            Ok(response) if response.is_ok() => {
                console::success(format!("Used referral: {code}"));
                true
            }
            Ok(response) if response.is_conflict() => {
                console::notice("Referral code already used");
                true
            }
            Ok(response) => {
                log::warn!("referral {code} rejected with status {}", response.status);
                false
            }
            Err(err) => {
                console::failure(format!("Referral error: {err}"));
                false
            }
        }
    }

    /// Claim the treasury and return the reward amount, if any was granted.
    pub async fn claim_treasury(&self) -> Option<String> {
        match self.fetch_treasury().await {
            Ok(Some(amount)) => {
                console::success(format!("Treasury claimed: {amount} WARBOND"));
                Some(amount)
            }
            Ok(None) => {
                console::warning("Treasury claimed without a reward");
                None
            }
            Err(err) => {
                console::failure(format!("Treasury error: {err}"));
                None
            }
        }
    }

    async fn fetch_treasury(&self) -> Result<Option<String>, CallError> {
        let response = self
            .client
            .call(EndpointName::Treasury, &PathParams::default(), None)
            .await
            .and_then(expect_ok)?;
        let envelope: Envelope<TreasuryPayload> = response.json()?;
        Ok(envelope.data.first_amount().map(str::to_string))
    }

    /// Transfer `amount` warbonds to `guild_id`.
    pub async fn send_warbonds(&self, guild_id: &str, amount: u64) -> bool {
        let body = match serde_json::to_value(WarbondTransfer::new(guild_id, amount)) {
            Ok(body) => body,
            Err(err) => {
                console::failure(format!("Error sending warbonds: {err}"));
                return false;
            }
        };
        match self
            .client
            .call(EndpointName::Warbond, &PathParams::default(), Some(body))
            .await
        {
            Ok(response) if response.is_ok() => {
                console::success(format!("Successfully sent {amount} warbonds to guild"));
                true
            }
            Ok(response) => {
                console::failure(format!(
                    "Failed to send warbonds. Status: {}",
                    response.status
                ));
                console::failure(format!("Response: {}", response.body));
                false
            }
            Err(err) => {
                console::failure(format!("Error sending warbonds: {err}"));
                false
            }
        }
    }

    /// Move the whole warbond balance to the configured guild.
    ///
    /// The transfer endpoint is probed first. The probe itself moves one
    /// warbond, so the balance is read again before the real transfer.
    ///
    /// # Errors
    ///
    /// Returns [`ContractBroken`] when the transfer endpoint fails its probe.
    pub async fn warbond_sweep(
        &self,
        stage: &str,
        outcome: &mut AccountOutcome,
    ) -> Result<(), ContractBroken> {
        let balance = match self.get_user_info().await {
            Ok(info) => info.warbond_tokens,
            Err(err) => {
                console::failure(format!("Could not get user info after {stage}: {err}"));
                return Ok(());
            }
        };
        console::info(format!("Current warbonds after {stage}: {balance}"));
        if balance == 0 {
            return Ok(());
        }

        self.validator
            .validate_endpoint(&self.client, EndpointName::Warbond)
            .await?;

        let amount = match self.get_user_info().await {
            Ok(info) => info.warbond_tokens,
            Err(err) => {
                console::failure(format!("Could not refresh balance after {stage}: {err}"));
                return Ok(());
            }
        };
        if amount == 0 {
            return Ok(());
        }

        if self.send_warbonds(&self.config.guild_id, amount).await {
            outcome.record_transfer(amount);
        } else {
            console::failure(format!("Failed to send warbonds after {stage}"));
        }
        Ok(())
    }

    /// Run every step for this account in the fixed order.
    ///
    /// # Errors
    ///
    /// Returns [`ContractBroken`] when a critical endpoint or the transfer
    /// endpoint fails validation. The caller must stop the whole run.
    pub async fn run_full_pass(&self) -> Result<AccountOutcome, ContractBroken> {
        let mut outcome = AccountOutcome::default();

        self.validator
            .validate_all(&self.client, &EndpointName::CRITICAL)
            .await?;

        let initial = match self.get_user_info().await {
            Ok(info) => info,
            Err(err) => {
                console::failure(format!("Failed to get initial user info: {err}"));
                return Ok(outcome);
            }
        };
        console::user_info(&initial);
        outcome.initial = Some(initial);

        outcome.checked_in = self.daily_checkin().await;
        if !self.config.referral_code.trim().is_empty() {
            outcome.referral_applied = self.use_referral_code(&self.config.referral_code).await;
        }
        self.warbond_sweep("daily check-in", &mut outcome).await?;

        let engine = QuestEngine::new(&self.client, self.config.pacing);
        for kind in QuestKind::ALL {
            console::info(format!("Processing {kind} quests..."));
            let tally = engine.complete_all_quests(kind).await;
            outcome.record_quests(kind, tally);
        }
        self.warbond_sweep("quests", &mut outcome).await?;

        console::info("Claiming treasury...");
        outcome.treasury_reward = self.claim_treasury().await;
        self.warbond_sweep("treasury claim", &mut outcome).await?;

        match self.get_user_info().await {
            Ok(info) => {
                console::user_info(&info);
                outcome.final_info = Some(info);
            }
            Err(err) => console::failure(format!("Failed to get final user info: {err}")),
        }

        console::account_summary(&outcome);
        Ok(outcome)
    }
}
