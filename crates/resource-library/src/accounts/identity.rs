use axum::http::{header, HeaderMap};
use tracing::debug;

use super::access::AccessError;
use super::domain::Viewer;
use crate::error::LibraryError;
use crate::store::UserRepository;

/// Resolve the requester from an `Authorization: Bearer <token>` header.
///
/// No header means an anonymous viewer; a malformed header or an unknown token
/// is rejected.
pub fn resolve_viewer<R>(users: &R, headers: &HeaderMap) -> Result<Viewer, LibraryError>
where
    R: UserRepository + ?Sized,
{
    let Some(raw) = headers.get(header::AUTHORIZATION) else {
        return Ok(Viewer::Anonymous);
    };

    let token = raw
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            debug!("invalid Authorization header format");
            AccessError::Unauthenticated
        })?;

    match users.user_by_token(token)? {
        Some(user) => Ok(Viewer::Authenticated(user)),
        None => {
            debug!("unknown bearer token");
            Err(AccessError::Unauthenticated.into())
        }
    }
}
