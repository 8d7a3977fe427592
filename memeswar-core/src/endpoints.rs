//! Endpoint registry: logical operation name to method and URL template.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::DEFAULT_BASE_URL;
use crate::quest::QuestKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical names of every operation the bot performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EndpointName {
    User,
    Quests,
    CheckIn,
    Treasury,
    Referral,
    QuestProgress,
    QuestClaim,
    Warbond,
}

impl EndpointName {
    pub const ALL: [Self; 8] = [
        Self::User,
        Self::Quests,
        Self::CheckIn,
        Self::Treasury,
        Self::Referral,
        Self::QuestProgress,
        Self::QuestClaim,
        Self::Warbond,
    ];

    /// Endpoints probed before an account pass starts.
    pub const CRITICAL: [Self; 5] = [
        Self::User,
        Self::Quests,
        Self::CheckIn,
        Self::Treasury,
        Self::Referral,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Quests => "quests",
            Self::CheckIn => "checkin",
            Self::Treasury => "treasury",
            Self::Referral => "referral",
            Self::QuestProgress => "quest_progress",
            Self::QuestClaim => "quest_claim",
            Self::Warbond => "warbond",
        }
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointName {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| EndpointError::UnknownEndpoint(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error("unknown endpoint `{0}`")]
    UnknownEndpoint(String),
    #[error("endpoint `{endpoint}` is not registered")]
    NotRegistered { endpoint: EndpointName },
    #[error("endpoint `{endpoint}` needs a value for `{{{placeholder}}}`")]
    MissingParam {
        endpoint: EndpointName,
        placeholder: &'static str,
    },
    #[error("unclosed placeholder in template `{0}`")]
    MalformedTemplate(&'static str),
}

/// Immutable description of one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: EndpointName,
    pub method: HttpMethod,
    pub template: &'static str,
}

/// Values for the dynamic path segments of a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    pub quest_kind: Option<QuestKind>,
    pub quest_id: Option<u64>,
    pub code: Option<String>,
}

impl PathParams {
    #[must_use]
    pub fn quest(kind: QuestKind, id: u64) -> Self {
        Self {
            quest_kind: Some(kind),
            quest_id: Some(id),
            code: None,
        }
    }

    #[must_use]
    pub fn quest_list(kind: QuestKind) -> Self {
        Self {
            quest_kind: Some(kind),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn referral(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::default()
        }
    }

    fn lookup(&self, placeholder: &str) -> Option<String> {
        match placeholder {
            "quest_type" => self.quest_kind.map(|kind| kind.as_str().to_string()),
            "quest_id" => self.quest_id.map(|id| id.to_string()),
            "code" => self.code.clone(),
            _ => None,
        }
    }
}

/// Read-only table shared by every account of the run.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    base_url: String,
    endpoints: BTreeMap<EndpointName, Endpoint>,
}

impl EndpointRegistry {
    /// The registry for the live service contract rooted at `base_url`.
    #[must_use]
    pub fn standard(base_url: &str) -> Self {
        let table = [
            (EndpointName::User, HttpMethod::Get, "/user"),
            (EndpointName::Quests, HttpMethod::Get, "/quest/{quest_type}/list"),
            (EndpointName::CheckIn, HttpMethod::Post, "/quest/check-in"),
            (EndpointName::Treasury, HttpMethod::Post, "/quest/treasury"),
            (EndpointName::Referral, HttpMethod::Put, "/user/referral/{code}"),
            (
                EndpointName::QuestProgress,
                HttpMethod::Post,
                "/quest/{quest_type}/{quest_id}/progress",
            ),
            (
                EndpointName::QuestClaim,
                HttpMethod::Post,
                "/quest/{quest_type}/{quest_id}/claim",
            ),
            (EndpointName::Warbond, HttpMethod::Post, "/guild/warbond"),
        ];
        let endpoints = table
            .into_iter()
            .map(|(name, method, template)| {
                (
                    name,
                    Endpoint {
                        name,
                        method,
                        template,
                    },
                )
            })
            .collect();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            endpoints,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// # Errors
    ///
    /// Returns an error if `name` has no descriptor.
    pub fn get(&self, name: EndpointName) -> Result<&Endpoint, EndpointError> {
        self.endpoints
            .get(&name)
            .ok_or(EndpointError::NotRegistered { endpoint: name })
    }

    /// Render the absolute URL for `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unknown or a placeholder in its
    /// template has no value in `params`.
    pub fn url(&self, name: EndpointName, params: &PathParams) -> Result<String, EndpointError> {
        let endpoint = self.get(name)?;
        let path = render_template(endpoint, params)?;
        Ok(format!("{}{path}", self.base_url))
    }
}

impl Default for EndpointRegistry {
    fn default() -> Self {
        Self::standard(DEFAULT_BASE_URL)
    }
}

fn render_template(endpoint: &Endpoint, params: &PathParams) -> Result<String, EndpointError> {
    let mut rendered = String::with_capacity(endpoint.template.len() + 16);
    let mut rest = endpoint.template;
    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or(EndpointError::MalformedTemplate(endpoint.template))?;
        let placeholder = &after[..close];
        let value = params
            .lookup(placeholder)
            .ok_or_else(|| EndpointError::MissingParam {
                endpoint: endpoint.name,
                placeholder: static_placeholder(placeholder),
            })?;
        rendered.push_str(&value);
        rest = &after[close + 1..];
    }
    rendered.push_str(rest);
    Ok(rendered)
}

fn static_placeholder(placeholder: &str) -> &'static str {
    match placeholder {
        "quest_type" => "quest_type",
        "quest_id" => "quest_id",
        "code" => "code",
        _ => "unknown",
    }
}
