//! Cycle loop over all accounts.

use std::time::Duration;

use memeswar_core::{AccountOutcome, BotConfig, EndpointRegistry, SessionCredential};

use crate::client::ApiClient;
use crate::console;
use crate::errors::ContractBroken;
use crate::session::AccountSession;
use crate::transport::{ApiTransport, TransportError};
use crate::validator::EndpointValidator;

const COUNTDOWN_STEP: Duration = Duration::from_secs(60);

/// Totals for one pass over every account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub accounts: usize,
    pub processed: usize,
    pub skipped: usize,
    pub quests_completed: usize,
    pub warbonds_sent: u64,
}

impl CycleReport {
    fn record(&mut self, outcome: &AccountOutcome) {
        if outcome.reached_service() {
            self.processed += 1;
        } else {
            self.skipped += 1;
        }
        self.quests_completed += outcome.quests_completed();
        self.warbonds_sent = self.warbonds_sent.saturating_add(outcome.warbonds_sent);
    }
}

/// Drives accounts strictly one after another. `connect` builds a fresh
/// transport for each account, so no state is shared between them.
pub struct Orchestrator<F> {
    config: BotConfig,
    registry: EndpointRegistry,
    validator: EndpointValidator,
    connect: F,
}

impl<F, T> Orchestrator<F>
where
    F: Fn(&SessionCredential) -> Result<T, TransportError>,
    T: ApiTransport,
{
    pub fn new(config: BotConfig, connect: F) -> Self {
        let registry = EndpointRegistry::standard(&config.base_url);
        let validator = EndpointValidator::new(&config);
        Self {
            config,
            registry,
            validator,
            connect,
        }
    }

    /// Process every account once.
    ///
    /// # Errors
    ///
    /// Stops at the first [`ContractBroken`]; remaining accounts are not
    /// touched.
    pub async fn run_cycle(
        &self,
        cycle: u64,
        accounts: &[SessionCredential],
    ) -> Result<CycleReport, ContractBroken> {
        console::cycle_header(cycle);
        let mut report = CycleReport {
            cycle,
            accounts: accounts.len(),
            ..CycleReport::default()
        };

        for (index, credential) in accounts.iter().enumerate() {
            if index > 0 {
                console::info(format!(
                    "Waiting {} seconds before next account...",
                    self.config.pacing.account_delay_secs
                ));
                tokio::time::sleep(self.config.pacing.account_delay()).await;
            }
            console::account_header(index + 1, accounts.len());

            let transport = match (self.connect)(credential) {
                Ok(transport) => transport,
                Err(err) => {
                    console::failure(format!("Error on account {}: {err}", index + 1));
                    report.skipped += 1;
                    continue;
                }
            };
            let client = ApiClient::new(transport, &self.registry, self.config.request_timeout());
            let session = AccountSession::new(client, &self.config, &self.validator);
            let outcome = session.run_full_pass().await?;
            report.record(&outcome);
        }

        console::success(format!("Cycle {cycle} completed"));
        log::info!(
            "cycle {cycle}: {}/{} accounts processed, {} quests, {} warbonds sent",
            report.processed,
            report.accounts,
            report.quests_completed,
            report.warbonds_sent
        );
        Ok(report)
    }

    /// Run cycles until `max_cycles` is reached, or forever when `None`.
    /// Returns the number of completed cycles.
    ///
    /// # Errors
    ///
    /// Propagates the first [`ContractBroken`].
    pub async fn run(
        &self,
        accounts: &[SessionCredential],
        max_cycles: Option<u64>,
    ) -> Result<u64, ContractBroken> {
        let mut cycle = 1;
        loop {
            self.run_cycle(cycle, accounts).await?;
            if max_cycles.is_some_and(|max| cycle >= max) {
                return Ok(cycle);
            }
            self.wait_for_next_cycle().await;
            cycle += 1;
        }
    }

    async fn wait_for_next_cycle(&self) {
        let interval = self.config.pacing.cycle_interval();
        console::waiting(format!(
            "Waiting {} minutes before next cycle...",
            interval.as_secs() / 60
        ));
        let mut remaining = interval;
        while !remaining.is_zero() {
            console::countdown(remaining);
            let step = remaining.min(COUNTDOWN_STEP);
            tokio::time::sleep(step).await;
            remaining -= step;
        }
        println!();
    }
}
