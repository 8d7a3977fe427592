//! Browser-like request headers and the user-agent pool.

use memeswar_core::constants::SERVICE_ORIGIN;
use rand::Rng;
use rand::seq::SliceRandom;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue, ORIGIN, PRAGMA,
    REFERER,
};

use crate::transport::TransportError;

pub const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.6723.58 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.6 Mobile/15E148 Safari/604.1",
];

/// Pick the user agent one account presents for a whole pass.
pub fn pick_user_agent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    USER_AGENTS.choose(rng).copied().unwrap_or(USER_AGENTS[0])
}

pub(crate) fn browser_headers() -> Result<HeaderMap, TransportError> {
    let referer = format!("{SERVICE_ORIGIN}/");
    let pairs: [(HeaderName, &str); 10] = [
        (ACCEPT, "*/*"),
        (ACCEPT_LANGUAGE, "en-US,en;q=0.9"),
        (CACHE_CONTROL, "no-cache"),
        (ORIGIN, SERVICE_ORIGIN),
        (PRAGMA, "no-cache"),
        (REFERER, referer.as_str()),
        (
            HeaderName::from_static("sec-ch-ua"),
            r#""Chromium";v="130", "Microsoft Edge";v="130", "Not?A_Brand";v="99", "Microsoft Edge WebView2";v="130""#,
        ),
        (HeaderName::from_static("sec-ch-ua-mobile"), "?0"),
        (HeaderName::from_static("sec-ch-ua-platform"), r#""Windows""#),
        (HeaderName::from_static("sec-fetch-site"), "same-origin"),
    ];
    let mut headers = HeaderMap::with_capacity(pairs.len() + 2);
    for (name, value) in pairs {
        let value =
            HeaderValue::from_str(value).map_err(|_| TransportError::Header(name.to_string()))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
