use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::UserId;
use crate::resources::domain::{PartnerId, StreamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub u64);

/// Review state of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Question,
    Approved,
    NotApproved,
    Sent,
}

impl ApplicationStatus {
    pub const TERMINAL: [ApplicationStatus; 3] = [
        ApplicationStatus::Approved,
        ApplicationStatus::NotApproved,
        ApplicationStatus::Sent,
    ];

    pub const OPEN: [ApplicationStatus; 3] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Question,
        ApplicationStatus::Approved,
    ];

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    pub fn is_open(self) -> bool {
        Self::OPEN.contains(&self)
    }

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Question => "question",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::NotApproved => "not_approved",
            ApplicationStatus::Sent => "sent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().replace([' ', '-'], "_").as_str() {
            "PENDING" => Some(Self::Pending),
            "QUESTION" => Some(Self::Question),
            "APPROVED" => Some(Self::Approved),
            "NOT_APPROVED" => Some(Self::NotApproved),
            "SENT" => Some(Self::Sent),
            _ => None,
        }
    }
}

/// A user's request for access to a partner, optionally for one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub user: UserId,
    pub partner: PartnerId,
    #[serde(default)]
    pub specific_stream: Option<StreamId>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub title_requested: String,
    #[serde(default)]
    pub stream_requested: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub agreement_with_terms: bool,
    pub status: ApplicationStatus,
    pub date_created: NaiveDate,
    #[serde(default)]
    pub date_closed: Option<NaiveDate>,
    #[serde(default)]
    pub days_open: Option<u32>,
    /// Carried over from the previous tracking system.
    #[serde(default)]
    pub imported: bool,
}

impl Application {
    /// Move to `status`, stamping or clearing the closing fields.
    pub fn transition(&mut self, status: ApplicationStatus, today: NaiveDate) {
        self.status = status;
        if status.is_terminal() {
            if self.date_closed.is_none() {
                self.date_closed = Some(today);
            }
            self.days_open = self.date_closed.map(|closed| days_between(self.date_created, closed));
        } else {
            self.date_closed = None;
            self.days_open = None;
        }
    }
}

pub(crate) fn days_between(start: NaiveDate, end: NaiveDate) -> u32 {
    u32::try_from((end - start).num_days()).unwrap_or(0)
}

/// Everything an editor fills in when applying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationRequest {
    pub partner: PartnerId,
    #[serde(default)]
    pub specific_stream: Option<StreamId>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub title_requested: String,
    #[serde(default)]
    pub stream_requested: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub agreement_with_terms: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(created: NaiveDate) -> Application {
        Application {
            id: ApplicationId(1),
            user: UserId(1),
            partner: PartnerId(1),
            specific_stream: None,
            rationale: String::new(),
            title_requested: String::new(),
            stream_requested: String::new(),
            comments: String::new(),
            agreement_with_terms: true,
            status: ApplicationStatus::Pending,
            date_created: created,
            date_closed: None,
            days_open: None,
            imported: false,
        }
    }

    #[test]
    fn closing_stamps_days_open_once() {
        let created = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let mut app = application(created);

        app.transition(
            ApplicationStatus::Approved,
            NaiveDate::from_ymd_opt(2024, 3, 11).expect("valid date"),
        );
        assert_eq!(app.days_open, Some(10));

        app.transition(
            ApplicationStatus::Sent,
            NaiveDate::from_ymd_opt(2024, 3, 20).expect("valid date"),
        );
        assert_eq!(app.date_closed, NaiveDate::from_ymd_opt(2024, 3, 11));
        assert_eq!(app.days_open, Some(10));
    }

    #[test]
    fn reopening_clears_closing_fields() {
        let created = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let mut app = application(created);
        app.transition(ApplicationStatus::NotApproved, created);
        assert_eq!(app.days_open, Some(0));

        app.transition(ApplicationStatus::Question, created);
        assert!(app.date_closed.is_none());
        assert!(app.days_open.is_none());
    }

    #[test]
    fn parses_legacy_status_spellings() {
        assert_eq!(
            ApplicationStatus::parse("not approved"),
            Some(ApplicationStatus::NotApproved)
        );
        assert_eq!(ApplicationStatus::parse(" sent "), Some(ApplicationStatus::Sent));
        assert_eq!(ApplicationStatus::parse("withdrawn"), None);
    }
}
