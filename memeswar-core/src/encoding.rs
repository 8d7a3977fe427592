//! Telegram init-data to cookie-value encoding.
//!
//! The captured init data is a query string (`query_id=..&user=..&hash=..`).
//! The service reads it back from the `telegramInitData` cookie by decoding
//! the whole value once and then parsing it as a query string, which decodes
//! every value a second time. The `user` value is a JSON blob and has to
//! survive both decodes, so it is escaped twice.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::constants::{INIT_DATA_USER_KEY, SESSION_COOKIE_NAME};

/// Bytes left untouched: ASCII alphanumerics and `-_.~/`.
const COOKIE_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

const PAIR_SEPARATOR: &str = "%26";
const KEY_VALUE_SEPARATOR: &str = "%3D";

fn escape(value: &str) -> String {
    utf8_percent_encode(value, COOKIE_VALUE).to_string()
}

fn unescape(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Encode one raw init-data line into the cookie value the service expects.
///
/// Pairs without `=` are skipped. An input with no valid pair encodes to an
/// empty string.
#[must_use]
pub fn encode_init_data(raw: &str) -> String {
    let decoded = unescape(raw);
    decoded
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| {
            let value = if key == INIT_DATA_USER_KEY {
                escape(&escape(value))
            } else {
                escape(value)
            };
            format!("{key}{KEY_VALUE_SEPARATOR}{value}")
        })
        .collect::<Vec<_>>()
        .join(PAIR_SEPARATOR)
}

/// Decode a cookie value the way the service does: one pass over the whole
/// value, then query-string parsing with one more pass per value.
#[must_use]
pub fn decode_cookie_value(encoded: &str) -> Vec<(String, String)> {
    unescape(encoded)
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(key, value)| (key.to_string(), unescape(value)))
        .collect()
}

/// One account's encoded session, ready to be sent as a cookie.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Build a credential from a raw captured line. Blank input and lines
    /// without a single `key=value` pair yield `None`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let encoded = encode_init_data(trimmed);
        if encoded.is_empty() {
            None
        } else {
            Some(Self(encoded))
        }
    }

    #[must_use]
    pub fn cookie_value(&self) -> &str {
        &self.0
    }

    /// Full `Cookie` header value.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        format!("{SESSION_COOKIE_NAME}={}", self.0)
    }
}

// Session tokens stay out of logs.
impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionCredential")
            .field(&format_args!("<{} bytes>", self.0.len()))
            .finish()
    }
}
