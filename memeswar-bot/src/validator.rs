//! Endpoint probes that fail fast when the service contract drifts.

use memeswar_core::constants::{PROBE_QUEST_ID, PROBE_REFERRAL_CODE, PROBE_WARBOND_COUNT};
use memeswar_core::{
    BotConfig, EndpointName, FatalReason, HttpMethod, PathParams, QuestKind, RetryPolicy, Verdict,
    WarbondTransfer, classify_probe,
};
use serde_json::Value;

use crate::client::ApiClient;
use crate::errors::{CallError, ContractBroken};
use crate::retry;
use crate::transport::ApiTransport;

#[derive(Debug, Clone)]
pub struct EndpointValidator {
    policy: RetryPolicy,
    probe: PathParams,
    guild_id: String,
}

impl EndpointValidator {
    pub fn new(config: &BotConfig) -> Self {
        let code = if config.referral_code.trim().is_empty() {
            PROBE_REFERRAL_CODE.to_string()
        } else {
            config.referral_code.clone()
        };
        Self {
            policy: config.retry,
            probe: PathParams {
                quest_kind: Some(QuestKind::Daily),
                quest_id: Some(PROBE_QUEST_ID),
                code: Some(code),
            },
            guild_id: config.guild_id.clone(),
        }
    }

    /// Probe `name` with `method`. The warbond probe always carries a
    /// one-warbond transfer to the configured guild, whatever `payload` is.
    ///
    /// # Errors
    ///
    /// Returns [`ContractBroken`] on 404, 401, an unbuildable request, or
    /// when every attempt allowed by the policy fails transiently.
    pub async fn validate<T: ApiTransport>(
        &self,
        client: &ApiClient<'_, T>,
        name: EndpointName,
        method: HttpMethod,
        payload: Option<Value>,
    ) -> Result<(), ContractBroken> {
        let payload = if name == EndpointName::Warbond {
            serde_json::to_value(WarbondTransfer::new(
                self.guild_id.clone(),
                PROBE_WARBOND_COUNT,
            ))
            .ok()
        } else {
            payload
        };

        let result = retry::run(&self.policy, |attempt| {
            let payload = payload.clone();
            async move {
                log::debug!("validating {name} (attempt {attempt})");
                match client.call_with(name, method, &self.probe, payload).await {
                    Ok(response) => classify_probe(name, response.status),
                    Err(CallError::Endpoint(err)) => {
                        Verdict::Fatal(FatalReason::InvalidRequest(err.to_string()))
                    }
                    Err(err) => Verdict::Transient(err.to_string()),
                }
            }
        })
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(reason) => Err(ContractBroken {
                endpoint: name,
                reason,
            }),
        }
    }

    /// Probe `name` with its registered method and no payload.
    ///
    /// # Errors
    ///
    /// See [`EndpointValidator::validate`].
    pub async fn validate_endpoint<T: ApiTransport>(
        &self,
        client: &ApiClient<'_, T>,
        name: EndpointName,
    ) -> Result<(), ContractBroken> {
        let method = client
            .registry()
            .get(name)
            .map_err(|err| ContractBroken {
                endpoint: name,
                reason: FatalReason::InvalidRequest(err.to_string()),
            })?
            .method;
        self.validate(client, name, method, None).await
    }

    /// Probe each endpoint in order, stopping at the first broken one.
    ///
    /// # Errors
    ///
    /// See [`EndpointValidator::validate`].
    pub async fn validate_all<T: ApiTransport>(
        &self,
        client: &ApiClient<'_, T>,
        names: &[EndpointName],
    ) -> Result<(), ContractBroken> {
        for &name in names {
            self.validate_endpoint(client, name).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedTransport, test_config, test_registry};
    use crate::transport::TransportError;
    use serde_json::json;
    use std::time::Duration;

    fn client<'a>(
        transport: ScriptedTransport,
        registry: &'a memeswar_core::EndpointRegistry,
    ) -> ApiClient<'a, ScriptedTransport> {
        ApiClient::new(transport, registry, Duration::from_secs(10))
    }

    #[tokio::test(start_paused = true)]
    async fn ok_and_conflict_pass_first_time() {
        let registry = test_registry();
        let validator = EndpointValidator::new(&test_config());
        let client = client(
            ScriptedTransport::new()
                .on(HttpMethod::Get, "/user", 200, json!({}))
                .on(HttpMethod::Post, "/quest/check-in", 409, Value::Null),
            &registry,
        );
        validator
            .validate(&client, EndpointName::User, HttpMethod::Get, None)
            .await
            .unwrap();
        validator
            .validate_endpoint(&client, EndpointName::CheckIn)
            .await
            .unwrap();
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn not_found_is_fatal_without_retry() {
        let registry = test_registry();
        let validator = EndpointValidator::new(&test_config());
        let client = client(
            ScriptedTransport::new().on(HttpMethod::Get, "/user", 404, Value::Null),
            &registry,
        );
        let err = validator
            .validate(&client, EndpointName::User, HttpMethod::Get, None)
            .await
            .unwrap_err();
        assert_eq!(err.endpoint, EndpointName::User);
        assert_eq!(err.reason, FatalReason::EndpointMissing);
        assert_eq!(client.transport().requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_is_fatal() {
        let registry = test_registry();
        let validator = EndpointValidator::new(&test_config());
        let client = client(
            ScriptedTransport::new().on(HttpMethod::Post, "/quest/treasury", 401, Value::Null),
            &registry,
        );
        let err = validator
            .validate_endpoint(&client, EndpointName::Treasury)
            .await
            .unwrap_err();
        assert_eq!(err.reason, FatalReason::Unauthorized);
    }

    #[tokio::test(start_paused = true)]
    async fn three_transient_failures_escalate_with_backoff() {
        let registry = test_registry();
        let validator = EndpointValidator::new(&test_config());
        let client = client(
            ScriptedTransport::new().on(HttpMethod::Get, "/user", 503, Value::Null),
            &registry,
        );
        let err = validator
            .validate(&client, EndpointName::User, HttpMethod::Get, None)
            .await
            .unwrap_err();
        assert!(matches!(
            err.reason,
            FatalReason::RetriesExhausted { attempts: 3, .. }
        ));
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[1].at - requests[0].at, Duration::from_secs(2));
        assert_eq!(requests[2].at - requests[1].at, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn recovers_after_a_timeout() {
        let registry = test_registry();
        let validator = EndpointValidator::new(&test_config());
        let client = client(
            ScriptedTransport::new()
                .on_error(HttpMethod::Get, "/quest/daily/list", TransportError::Timeout)
                .on(HttpMethod::Get, "/quest/daily/list", 200, json!({})),
            &registry,
        );
        validator
            .validate_endpoint(&client, EndpointName::Quests)
            .await
            .unwrap();
        assert_eq!(client.transport().requests().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn warbond_probe_sends_minimal_payload_and_accepts_400() {
        let registry = test_registry();
        let validator = EndpointValidator::new(&test_config());
        let client = client(
            ScriptedTransport::new().on(HttpMethod::Post, "/guild/warbond", 400, Value::Null),
            &registry,
        );
        validator
            .validate(
                &client,
                EndpointName::Warbond,
                HttpMethod::Post,
                Some(json!({"guildId": "other", "warbondCount": "999"})),
            )
            .await
            .unwrap();
        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].body,
            Some(json!({"guildId": "guild-7", "warbondCount": "1"}))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn referral_probe_uses_configured_code_or_placeholder() {
        let registry = test_registry();
        let client = client(
            ScriptedTransport::new()
                .on(HttpMethod::Put, "/user/referral/REF123", 409, Value::Null)
                .on(HttpMethod::Put, "/user/referral/PROBE", 200, Value::Null),
            &registry,
        );
        EndpointValidator::new(&test_config())
            .validate_endpoint(&client, EndpointName::Referral)
            .await
            .unwrap();
        let mut no_code = test_config();
        no_code.referral_code.clear();
        EndpointValidator::new(&no_code)
            .validate_endpoint(&client, EndpointName::Referral)
            .await
            .unwrap();
        assert_eq!(
            client.transport().paths(),
            vec!["PUT /user/referral/REF123", "PUT /user/referral/PROBE"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn validate_all_stops_at_first_broken_endpoint() {
        let registry = test_registry();
        let client = client(
            ScriptedTransport::new()
                .on(HttpMethod::Get, "/user", 200, json!({}))
                .on(HttpMethod::Get, "/quest/daily/list", 404, Value::Null),
            &registry,
        );
        let err = EndpointValidator::new(&test_config())
            .validate_all(&client, &EndpointName::CRITICAL)
            .await
            .unwrap_err();
        assert_eq!(err.endpoint, EndpointName::Quests);
        assert_eq!(client.transport().requests().len(), 2);
    }
}
