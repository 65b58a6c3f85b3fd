use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{
    ApplicationRepository, AuthorizationRepository, LibrarySeed, PartnerRepository,
    RepositoryError, SuggestionRepository, UserRepository,
};
use crate::accounts::{User, UserId};
use crate::applications::{Application, ApplicationId};
use crate::authorizations::{Authorization, AuthorizationId};
use crate::resources::domain::{
    NewSuggestion, Partner, PartnerId, Stream, StreamId, Suggestion, SuggestionId,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    partners: BTreeMap<PartnerId, Partner>,
    streams: BTreeMap<StreamId, Stream>,
    applications: BTreeMap<ApplicationId, Application>,
    authorizations: BTreeMap<AuthorizationId, Authorization>,
    suggestions: BTreeMap<SuggestionId, Suggestion>,
    /// Highest id ever handed out per table; deleted ids are never reused.
    last_application: u64,
    last_authorization: u64,
    last_suggestion: u64,
}

fn highest_key<K: Copy, V>(map: &BTreeMap<K, V>, raw: impl Fn(K) -> u64) -> u64 {
    map.keys().next_back().map(|key| raw(*key)).unwrap_or(0)
}

fn allocate(last: &mut u64) -> u64 {
    *last += 1;
    *last
}

/// Process-local store; every call takes the single table lock once.
#[derive(Debug, Default)]
pub struct InMemoryLibraryStore {
    tables: Mutex<Tables>,
}

impl InMemoryLibraryStore {
    pub fn from_seed(seed: LibrarySeed) -> Self {
        let LibrarySeed {
            users,
            partners,
            streams,
            applications,
            authorizations,
            suggestions,
        } = seed;

        let mut tables = Tables {
            users: users.into_iter().map(|row| (row.id, row)).collect(),
            partners: partners.into_iter().map(|row| (row.id, row)).collect(),
            streams: streams.into_iter().map(|row| (row.id, row)).collect(),
            applications: applications.into_iter().map(|row| (row.id, row)).collect(),
            authorizations: authorizations.into_iter().map(|row| (row.id, row)).collect(),
            suggestions: suggestions.into_iter().map(|row| (row.id, row)).collect(),
            ..Tables::default()
        };
        tables.last_application = highest_key(&tables.applications, |id| id.0);
        tables.last_authorization = highest_key(&tables.authorizations, |id| id.0);
        tables.last_suggestion = highest_key(&tables.suggestions, |id| id.0);

        Self {
            tables: Mutex::new(tables),
        }
    }

    pub fn insert_user(&self, user: User) -> Result<(), RepositoryError> {
        self.lock()?.users.insert(user.id, user);
        Ok(())
    }

    pub fn insert_partner(&self, partner: Partner) -> Result<(), RepositoryError> {
        self.lock()?.partners.insert(partner.id, partner);
        Ok(())
    }

    pub fn insert_stream(&self, stream: Stream) -> Result<(), RepositoryError> {
        self.lock()?.streams.insert(stream.id, stream);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("library store lock poisoned".to_string()))
    }
}

impl UserRepository for InMemoryLibraryStore {
    fn user(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    fn user_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        if token.is_empty() {
            return Ok(None);
        }
        let tables = self.lock()?;
        Ok(tables
            .users
            .values()
            .find(|user| user.api_token == token)
            .cloned())
    }
}

impl PartnerRepository for InMemoryLibraryStore {
    fn partners(&self) -> Result<Vec<Partner>, RepositoryError> {
        Ok(self.lock()?.partners.values().cloned().collect())
    }

    fn partner(&self, id: PartnerId) -> Result<Option<Partner>, RepositoryError> {
        Ok(self.lock()?.partners.get(&id).cloned())
    }

    fn update_partner(&self, partner: Partner) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        match tables.partners.get_mut(&partner.id) {
            Some(slot) => {
                *slot = partner;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn streams_for(&self, partner: PartnerId) -> Result<Vec<Stream>, RepositoryError> {
        Ok(self
            .lock()?
            .streams
            .values()
            .filter(|stream| stream.partner == partner)
            .cloned()
            .collect())
    }
}

impl ApplicationRepository for InMemoryLibraryStore {
    fn insert_application(
        &self,
        mut application: Application,
    ) -> Result<Application, RepositoryError> {
        let mut tables = self.lock()?;
        application.id = ApplicationId(allocate(&mut tables.last_application));
        tables
            .applications
            .insert(application.id, application.clone());
        Ok(application)
    }

    fn application(&self, id: ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Ok(self.lock()?.applications.get(&id).cloned())
    }

    fn update_application(&self, application: Application) -> Result<(), RepositoryError> {
        let mut tables = self.lock()?;
        match tables.applications.get_mut(&application.id) {
            Some(slot) => {
                *slot = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn applications_for_partner(
        &self,
        partner: PartnerId,
    ) -> Result<Vec<Application>, RepositoryError> {
        Ok(self
            .lock()?
            .applications
            .values()
            .filter(|app| app.partner == partner)
            .cloned()
            .collect())
    }

    fn applications(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.lock()?.applications.values().cloned().collect())
    }
}

impl AuthorizationRepository for InMemoryLibraryStore {
    fn authorizations_for_partner(
        &self,
        partner: PartnerId,
    ) -> Result<Vec<Authorization>, RepositoryError> {
        Ok(self
            .lock()?
            .authorizations
            .values()
            .filter(|auth| auth.partner == partner)
            .cloned()
            .collect())
    }

    fn insert_authorization(
        &self,
        mut authorization: Authorization,
    ) -> Result<Authorization, RepositoryError> {
        let mut tables = self.lock()?;
        authorization.id = AuthorizationId(allocate(&mut tables.last_authorization));
        tables
            .authorizations
            .insert(authorization.id, authorization.clone());
        Ok(authorization)
    }
}

impl SuggestionRepository for InMemoryLibraryStore {
    fn suggestions(&self) -> Result<Vec<Suggestion>, RepositoryError> {
        Ok(self.lock()?.suggestions.values().cloned().collect())
    }

    fn suggestion(&self, id: SuggestionId) -> Result<Option<Suggestion>, RepositoryError> {
        Ok(self.lock()?.suggestions.get(&id).cloned())
    }

    fn insert_suggestion(&self, suggestion: NewSuggestion) -> Result<Suggestion, RepositoryError> {
        let mut tables = self.lock()?;
        let id = SuggestionId(allocate(&mut tables.last_suggestion));
        let stored = Suggestion {
            id,
            suggested_company_name: suggestion.suggested_company_name,
            description: suggestion.description,
            company_url: suggestion.company_url,
            author: Some(suggestion.author),
            upvoted_users: [suggestion.author].into_iter().collect(),
        };
        tables.suggestions.insert(id, stored.clone());
        Ok(stored)
    }

    fn delete_suggestion(&self, id: SuggestionId) -> Result<(), RepositoryError> {
        self.lock()?
            .suggestions
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn toggle_upvote(&self, id: SuggestionId, user: UserId) -> Result<bool, RepositoryError> {
        let mut tables = self.lock()?;
        let suggestion = tables
            .suggestions
            .get_mut(&id)
            .ok_or(RepositoryError::NotFound)?;
        if suggestion.upvoted_users.remove(&user) {
            Ok(false)
        } else {
            suggestion.upvoted_users.insert(user);
            Ok(true)
        }
    }
}
