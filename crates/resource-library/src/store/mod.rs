//! Storage abstractions so services can be exercised in isolation.

mod memory;
mod seed;

pub use memory::InMemoryLibraryStore;
pub use seed::{LibrarySeed, SeedError};

use crate::accounts::{User, UserId};
use crate::applications::{Application, ApplicationId};
use crate::authorizations::Authorization;
use crate::resources::domain::{
    NewSuggestion, Partner, PartnerId, Stream, Suggestion, SuggestionId,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

pub trait UserRepository: Send + Sync {
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn user_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError>;
}

pub trait PartnerRepository: Send + Sync {
    /// Every partner, whatever its status.
    fn partners(&self) -> Result<Vec<Partner>, RepositoryError>;
    fn partner(&self, id: PartnerId) -> Result<Option<Partner>, RepositoryError>;
    fn update_partner(&self, partner: Partner) -> Result<(), RepositoryError>;
    fn streams_for(&self, partner: PartnerId) -> Result<Vec<Stream>, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    fn insert_application(&self, application: Application) -> Result<Application, RepositoryError>;
    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn update_application(&self, application: Application) -> Result<(), RepositoryError>;
    fn applications_for_partner(&self, partner: PartnerId)
        -> Result<Vec<Application>, RepositoryError>;
    fn applications(&self) -> Result<Vec<Application>, RepositoryError>;
}

pub trait AuthorizationRepository: Send + Sync {
    fn authorizations_for_partner(
        &self,
        partner: PartnerId,
    ) -> Result<Vec<Authorization>, RepositoryError>;
    fn insert_authorization(
        &self,
        authorization: Authorization,
    ) -> Result<Authorization, RepositoryError>;
}

pub trait SuggestionRepository: Send + Sync {
    fn suggestions(&self) -> Result<Vec<Suggestion>, RepositoryError>;
    fn suggestion(&self, id: SuggestionId) -> Result<Option<Suggestion>, RepositoryError>;
    /// Store a suggestion with its author as the first upvoter.
    fn insert_suggestion(&self, suggestion: NewSuggestion) -> Result<Suggestion, RepositoryError>;
    fn delete_suggestion(&self, id: SuggestionId) -> Result<(), RepositoryError>;
    /// Flip `user`'s upvote, returning whether the user now upvotes it.
    fn toggle_upvote(&self, id: SuggestionId, user: UserId) -> Result<bool, RepositoryError>;
}

/// Everything the library services read and write.
pub trait LibraryStore:
    UserRepository
    + PartnerRepository
    + ApplicationRepository
    + AuthorizationRepository
    + SuggestionRepository
{
}

impl<T> LibraryStore for T where
    T: UserRepository
        + PartnerRepository
        + ApplicationRepository
        + AuthorizationRepository
        + SuggestionRepository
{
}
