use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::accounts::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartnerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StreamId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SuggestionId(pub u64);

/// Whether a partner currently takes applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerStatus {
    Available,
    Waitlist,
    /// Hidden from everyone but staff; only changed through administration.
    NotAvailable,
}

impl PartnerStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PartnerStatus::Available => "available",
            PartnerStatus::Waitlist => "waitlist",
            PartnerStatus::NotAvailable => "not_available",
        }
    }

    pub const fn is_public(self) -> bool {
        !matches!(self, PartnerStatus::NotAvailable)
    }
}

/// How approved editors receive access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorizationMethod {
    Email,
    Codes,
    Proxy,
    /// Access comes with the library bundle; editors never apply individually.
    Bundle,
    Link,
}

impl AuthorizationMethod {
    /// Methods whose access is live as soon as the application is approved.
    pub const fn grants_on_approval(self) -> bool {
        matches!(self, AuthorizationMethod::Proxy | AuthorizationMethod::Bundle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub id: PartnerId,
    pub company_name: String,
    #[serde(default)]
    pub short_description: String,
    pub status: PartnerStatus,
    pub authorization_method: AuthorizationMethod,
    /// Length of granted access, when the partner limits it.
    #[serde(default)]
    pub account_length_days: Option<u32>,
}

impl Partner {
    pub fn absolute_url(&self) -> String {
        format!("/partners/{}", self.id.0)
    }
}

/// A collection offered separately inside a partner's resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub partner: PartnerId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A partner proposed by the community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub suggested_company_name: String,
    pub description: String,
    pub company_url: String,
    #[serde(default)]
    pub author: Option<UserId>,
    #[serde(default)]
    pub upvoted_users: BTreeSet<UserId>,
}

impl Suggestion {
    pub fn absolute_url(&self) -> &'static str {
        SUGGESTIONS_URL
    }

    pub fn upvote_count(&self) -> usize {
        self.upvoted_users.len()
    }
}

pub const SUGGESTIONS_URL: &str = "/suggest";

/// Validated suggestion form contents, ready to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub suggested_company_name: String,
    pub description: String,
    pub company_url: String,
    pub author: UserId,
}
