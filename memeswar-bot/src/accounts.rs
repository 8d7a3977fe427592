//! Accounts file: one raw init-data line per account.

use std::path::{Path, PathBuf};

use memeswar_core::SessionCredential;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountsError {
    #[error("cannot read accounts file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no usable accounts in {}", path.display())]
    Empty { path: PathBuf },
}

/// Encode every usable line. Blank lines are skipped silently, lines without
/// a single `key=value` pair with a warning.
pub fn parse_accounts(contents: &str) -> Vec<SessionCredential> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let credential = SessionCredential::from_raw(line);
            if credential.is_none() {
                log::warn!("skipping accounts line {}: no key=value pairs", index + 1);
            }
            credential
        })
        .collect()
}

/// # Errors
///
/// Fails when the file cannot be read or holds no usable account.
pub fn read_accounts(path: &Path) -> Result<Vec<SessionCredential>, AccountsError> {
    let contents = std::fs::read_to_string(path).map_err(|source| AccountsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let accounts = parse_accounts(&contents);
    if accounts.is_empty() {
        return Err(AccountsError::Empty {
            path: path.to_path_buf(),
        });
    }
    log::info!("loaded {} account(s) from {}", accounts.len(), path.display());
    Ok(accounts)
}
