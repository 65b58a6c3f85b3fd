//! Role gates shared by every handler.
//!
//! Anonymous viewers fail with [`AccessError::Unauthenticated`]; signed-in
//! viewers without the role fail with [`AccessError::Forbidden`].

use tracing::warn;

use super::domain::{User, Viewer};
use crate::resources::domain::PartnerId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("authentication required")]
    Unauthenticated,
    #[error("permission denied: {required} only")]
    Forbidden { required: &'static str },
}

pub fn login_required(viewer: &Viewer) -> Result<&User, AccessError> {
    viewer.user().ok_or(AccessError::Unauthenticated)
}

pub fn coordinators_only(viewer: &Viewer) -> Result<&User, AccessError> {
    let user = login_required(viewer)?;
    if user.is_coordinator() {
        Ok(user)
    } else {
        Err(denied(user, "coordinators"))
    }
}

/// Coordinators, or the account that belongs to `partner`.
pub fn coordinator_or_self(viewer: &Viewer, partner: PartnerId) -> Result<&User, AccessError> {
    let user = login_required(viewer)?;
    if user.is_coordinator() || user.partner == Some(partner) {
        Ok(user)
    } else {
        Err(denied(user, "coordinators or the partner"))
    }
}

pub fn editors_only(viewer: &Viewer) -> Result<&User, AccessError> {
    let user = login_required(viewer)?;
    if user.is_editor() || user.is_superuser {
        Ok(user)
    } else {
        Err(denied(user, "editors"))
    }
}

fn denied(user: &User, required: &'static str) -> AccessError {
    warn!(user = %user.username, required, "access denied");
    AccessError::Forbidden { required }
}
