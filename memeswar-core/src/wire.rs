//! Request and response bodies of the service.
//!
//! Numbers arrive either as JSON numbers or as numeric strings depending on
//! the field, so counters go through [`de_count`] and reward amounts through
//! [`de_amount`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::quest::Quest;

/// Every response wraps its payload in `{"data": ...}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub user: UserInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub nickname: String,
    #[serde(default, deserialize_with = "de_count")]
    pub honor_points: u64,
    #[serde(default, deserialize_with = "de_optional_count")]
    pub honor_point_rank: Option<u64>,
    #[serde(default, deserialize_with = "de_count")]
    pub warbond_tokens: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestListPayload {
    #[serde(default)]
    pub quests: Vec<Quest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestProgressPayload {
    pub status: Option<String>,
    #[serde(default)]
    pub reward: Option<Reward>,
}

impl QuestProgressPayload {
    #[must_use]
    pub fn reward_amount(&self) -> &str {
        self.reward.as_ref().map_or("", |r| r.reward_amount.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    #[serde(default, deserialize_with = "de_amount")]
    pub reward_amount: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreasuryPayload {
    #[serde(default)]
    pub rewards: Vec<Reward>,
}

impl TreasuryPayload {
    #[must_use]
    pub fn first_amount(&self) -> Option<&str> {
        self.rewards.first().map(|r| r.reward_amount.as_str())
    }
}

/// Body of `POST /guild/warbond`. The service only accepts the count as a
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarbondTransfer {
    pub guild_id: String,
    #[serde(serialize_with = "ser_as_string")]
    pub warbond_count: u64,
}

impl WarbondTransfer {
    #[must_use]
    pub fn new(guild_id: impl Into<String>, warbond_count: u64) -> Self {
        Self {
            guild_id: guild_id.into(),
            warbond_count,
        }
    }
}

fn ser_as_string<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn count_from_value<E: serde::de::Error>(value: &Value) -> Result<Option<u64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .map(Some)
            .ok_or_else(|| E::custom(format!("negative count {n}"))),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| E::custom(format!("non-numeric count `{s}`"))),
        other => Err(E::custom(format!("unexpected count {other}"))),
    }
}

/// Accept `12`, `"12"`, `null` or `""` (the last two as zero).
///
/// # Errors
///
/// Fails on negative numbers, non-numeric strings and non-scalar values.
pub fn de_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    count_from_value(&value).map(Option::unwrap_or_default)
}

fn de_optional_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    count_from_value(&value)
}

/// Keep a reward amount as display text whatever its JSON type.
///
/// # Errors
///
/// Never fails for scalar input; objects and arrays are rejected.
pub fn de_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unexpected reward amount {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn warbond_count_is_sent_as_string() {
        let body = serde_json::to_value(WarbondTransfer::new("guild-1", 250)).unwrap();
        assert_eq!(body, json!({"guildId": "guild-1", "warbondCount": "250"}));
    }

    #[test]
    fn user_counts_accept_strings_and_numbers() {
        let env: Envelope<UserPayload> = serde_json::from_value(json!({
            "data": {"user": {
                "nickname": "neo",
                "honorPoints": 1200,
                "honorPointRank": "37",
                "warbondTokens": "4500"
            }}
        }))
        .unwrap();
        let user = env.data.user;
        assert_eq!(user.nickname, "neo");
        assert_eq!(user.honor_points, 1200);
        assert_eq!(user.honor_point_rank, Some(37));
        assert_eq!(user.warbond_tokens, 4500);
    }

    #[test]
    fn missing_warbond_balance_reads_as_zero() {
        let user: UserInfo =
            serde_json::from_value(json!({"nickname": "x", "warbondTokens": null})).unwrap();
        assert_eq!(user.warbond_tokens, 0);
        assert_eq!(user.honor_point_rank, None);
    }

    #[test]
    fn garbage_balance_is_rejected() {
        let parsed = serde_json::from_value::<UserInfo>(json!({"warbondTokens": "lots"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn progress_payload_exposes_reward_amount() {
        let env: Envelope<QuestProgressPayload> = serde_json::from_value(json!({
            "data": {"status": "DONE", "reward": {"rewardAmount": 500}}
        }))
        .unwrap();
        assert_eq!(env.data.status.as_deref(), Some("DONE"));
        assert_eq!(env.data.reward_amount(), "500");
    }

    #[test]
    fn treasury_payload_reads_first_reward() {
        let env: Envelope<TreasuryPayload> = serde_json::from_value(json!({
            "data": {"rewards": [{"rewardAmount": "1000"}, {"rewardAmount": "1"}]}
        }))
        .unwrap();
        assert_eq!(env.data.first_amount(), Some("1000"));
    }
}
