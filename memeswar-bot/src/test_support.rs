//! Scripted transport for exercising the bot without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use memeswar_core::{BotConfig, EndpointRegistry, HttpMethod};
use serde_json::{Value, json};
use tokio::time::Instant;

use crate::transport::{ApiRequest, ApiResponse, ApiTransport, TransportError};

pub const TEST_BASE: &str = "http://bot.test/api";

/// Status returned for routes nobody scripted.
pub const UNSCRIPTED: u16 = 599;

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
    pub at: Instant,
}

type Reply = Result<ApiResponse, TransportError>;

/// Replies per `(method, path)` in order; the last reply for a route
/// repeats once the queue is down to it.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    log: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: HttpMethod, path: &str, status: u16, body: Value) -> Self {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.push(method, path, Ok(ApiResponse { status, body }))
    }

    pub fn on_error(self, method: HttpMethod, path: &str, err: TransportError) -> Self {
        self.push(method, path, Err(err))
    }

    fn push(self, method: HttpMethod, path: &str, reply: Reply) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn paths(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

#[async_trait]
impl ApiTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request
            .url
            .strip_prefix(TEST_BASE)
            .unwrap_or(&request.url)
            .to_string();
        self.log.lock().unwrap().push(Recorded {
            method: request.method,
            path: path.clone(),
            body: request.body.clone(),
            at: Instant::now(),
        });
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&(request.method, path)) else {
            return Ok(ApiResponse {
                status: UNSCRIPTED,
                body: String::new(),
            });
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Err(TransportError::Timeout))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Timeout))
        }
    }
}

pub fn test_registry() -> EndpointRegistry {
    EndpointRegistry::standard(TEST_BASE)
}

pub fn test_config() -> BotConfig {
    BotConfig {
        guild_id: "guild-7".to_string(),
        referral_code: "REF123".to_string(),
        base_url: TEST_BASE.to_string(),
        ..BotConfig::default()
    }
}

pub fn user_body(warbonds: &str) -> Value {
    json!({"data": {"user": {
        "nickname": "neo",
        "honorPoints": 10,
        "honorPointRank": 3,
        "warbondTokens": warbonds
    }}})
}

/// A service that accepts every critical probe, has no quests, pays a
/// treasury reward and reports an empty warbond balance.
pub fn healthy_service() -> ScriptedTransport {
    ScriptedTransport::new()
        .on(HttpMethod::Get, "/user", 200, user_body("0"))
        .on(HttpMethod::Get, "/quest/daily/list", 200, json!({"data": {"quests": []}}))
        .on(HttpMethod::Get, "/quest/single/list", 200, json!({"data": {"quests": []}}))
        .on(HttpMethod::Post, "/quest/check-in", 409, Value::Null)
        .on(
            HttpMethod::Post,
            "/quest/treasury",
            200,
            json!({"data": {"rewards": [{"rewardAmount": "1000"}]}}),
        )
        .on(HttpMethod::Put, "/user/referral/REF123", 409, Value::Null)
}
