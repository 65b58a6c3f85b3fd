use serde::{Deserialize, Serialize};

use crate::resources::domain::PartnerId;

/// Identifier wrapper for library accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Profile attached to accounts that belong to Wikipedia editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    pub wp_username: String,
}

/// Account record, including the flags the permission layer reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub is_coordinator: bool,
    #[serde(default)]
    pub editor: Option<Editor>,
    /// Set when the account is the login of a partner organization.
    #[serde(default)]
    pub partner: Option<PartnerId>,
    #[serde(default, skip_serializing)]
    pub api_token: String,
}

impl User {
    pub fn is_editor(&self) -> bool {
        self.editor.is_some()
    }

    pub fn is_coordinator(&self) -> bool {
        self.is_superuser || self.is_coordinator
    }
}

/// Whoever issued the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Authenticated(User),
}

impl Viewer {
    pub fn user(&self) -> Option<&User> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Authenticated(user) => Some(user),
        }
    }

    pub fn is_staff(&self) -> bool {
        self.user().map(|user| user.is_staff).unwrap_or(false)
    }
}
