use std::path::PathBuf;

use memeswar_core::{ConfigError, EndpointError, EndpointName, FatalReason};
use thiserror::Error;

use crate::accounts::AccountsError;
use crate::transport::TransportError;

/// Failure of one operational call. Logged by the caller and never allowed
/// to stop the run.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

/// The service no longer honours the contract this bot was written against.
/// Unrecoverable for the whole run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("API endpoint `{endpoint}` has changed: {reason}")]
pub struct ContractBroken {
    pub endpoint: EndpointName,
    pub reason: FatalReason,
}

/// Everything that can stop the bot before or during a run.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    ContractBroken(#[from] ContractBroken),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot read config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Accounts(#[from] AccountsError),
}
