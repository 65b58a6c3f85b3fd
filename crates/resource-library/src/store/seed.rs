use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::accounts::User;
use crate::applications::Application;
use crate::authorizations::Authorization;
use crate::resources::domain::{Partner, Stream, Suggestion};

/// Initial rows for the in-memory store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LibrarySeed {
    pub users: Vec<User>,
    pub partners: Vec<Partner>,
    pub streams: Vec<Stream>,
    pub applications: Vec<Application>,
    pub authorizations: Vec<Authorization>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed document: {0}")]
    Json(#[from] serde_json::Error),
}

impl LibrarySeed {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SeedError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::domain::{AuthorizationMethod, PartnerStatus};
    use std::io::Cursor;

    #[test]
    fn parses_partial_documents() {
        let raw = r#"{
            "users": [{"id": 1, "username": "coord", "is_coordinator": true, "api_token": "t-1"}],
            "partners": [{
                "id": 3,
                "company_name": "Archive Press",
                "status": "WAITLIST",
                "authorization_method": "PROXY"
            }]
        }"#;

        let seed = LibrarySeed::from_reader(Cursor::new(raw)).expect("seed parses");
        assert_eq!(seed.users.len(), 1);
        assert_eq!(seed.users[0].api_token, "t-1");
        assert_eq!(seed.partners[0].status, PartnerStatus::Waitlist);
        assert_eq!(
            seed.partners[0].authorization_method,
            AuthorizationMethod::Proxy
        );
        assert!(seed.suggestions.is_empty());
    }

    #[test]
    fn rejects_unknown_partner_status() {
        let raw = r#"{"partners": [{
            "id": 3,
            "company_name": "Archive Press",
            "status": "RETIRED",
            "authorization_method": "EMAIL"
        }]}"#;

        assert!(matches!(
            LibrarySeed::from_reader(Cursor::new(raw)),
            Err(SeedError::Json(_))
        ));
    }
}
