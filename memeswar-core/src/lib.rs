//! Memes War bot core
//!
//! Platform-agnostic logic for the Memes War automation bot: session
//! encoding, the endpoint table, quest status handling, wire payloads and
//! the retry policy. This crate performs no network I/O.

pub mod config;
pub mod constants;
pub mod encoding;
pub mod endpoints;
pub mod outcome;
pub mod quest;
pub mod retry;
pub mod wire;

// Re-export commonly used types
pub use config::{BotConfig, ConfigError, Pacing};
pub use encoding::{SessionCredential, decode_cookie_value, encode_init_data};
pub use endpoints::{Endpoint, EndpointError, EndpointName, EndpointRegistry, HttpMethod, PathParams};
pub use outcome::AccountOutcome;
pub use quest::{Quest, QuestKind, QuestStatus, QuestTally};
pub use retry::{FatalReason, RetryPolicy, Verdict, classify_probe};
pub use wire::{
    Envelope, QuestListPayload, QuestProgressPayload, Reward, TreasuryPayload, UserInfo,
    UserPayload, WarbondTransfer,
};
