use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Partner, StreamId, SuggestionId};
use crate::accounts::UserId;
use crate::applications::{ApplicationId, ApplicationStatus};
use crate::messages::FlashMessage;

#[derive(Debug, Clone, Serialize)]
pub struct PartnerListPage {
    pub partners: Vec<Partner>,
    pub messages: Vec<FlashMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamAccounts {
    pub stream: StreamId,
    pub name: String,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerDetailPage {
    pub partner: Partner,
    pub total_accounts_distributed_partner: usize,
    /// `None` when the partner has no streams.
    pub total_accounts_distributed_streams: Option<Vec<StreamAccounts>>,
    pub total_users: usize,
    pub median_days: Option<u32>,
    pub apply: bool,
    pub has_open_apps: bool,
    pub messages: Vec<FlashMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartnerUserEntry {
    pub application: ApplicationId,
    pub user: UserId,
    pub username: Option<String>,
    pub wp_username: Option<String>,
    pub status: ApplicationStatus,
    pub specific_stream: Option<StreamId>,
    pub date_closed: Option<NaiveDate>,
    pub days_open: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartnerUsersPage {
    pub partner: Partner,
    pub approved_applications: Vec<PartnerUserEntry>,
    pub sent_applications: Vec<PartnerUserEntry>,
    pub partner_streams: bool,
    pub messages: Vec<FlashMessage>,
}

/// Query string accepted by the suggestion page to pre-fill the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SuggestionQuery {
    pub suggested_company_name: Option<String>,
    pub description: Option<String>,
    pub company_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionInitial {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_url: Option<String>,
    pub next: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionSummary {
    pub id: SuggestionId,
    pub suggested_company_name: String,
    pub description: String,
    pub company_url: String,
    pub author: Option<UserId>,
    pub total_upvoted_users: usize,
    pub upvoted_by_viewer: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionPage {
    pub initial: SuggestionInitial,
    /// `None` when nothing has been suggested yet.
    pub all_suggestions: Option<Vec<SuggestionSummary>>,
    pub messages: Vec<FlashMessage>,
}
