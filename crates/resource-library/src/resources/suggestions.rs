use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{SuggestionId, SUGGESTIONS_URL};
use super::forms::SuggestionForm;
use super::views::{SuggestionInitial, SuggestionPage, SuggestionQuery, SuggestionSummary};
use crate::accounts::{access, Viewer};
use crate::error::LibraryError;
use crate::messages::{MessageBox, MessageLevel};
use crate::store::{LibraryStore, RepositoryError};

pub const SUGGESTION_ADDED: &str = "Your suggestion has been added.";
pub const SUGGESTION_DELETED: &str = "Suggestion has been deleted.";
pub const EDITORS_ONLY_WARNING: &str = "You must be a Wikipedia editor to do that.";

/// Community suggestions for new partners.
pub struct SuggestionService<S> {
    store: Arc<S>,
    messages: Arc<MessageBox>,
}

impl<S> SuggestionService<S>
where
    S: LibraryStore + 'static,
{
    pub fn new(store: Arc<S>, messages: Arc<MessageBox>) -> Self {
        Self { store, messages }
    }

    /// Suggestion form pre-filled from the query string plus every suggestion,
    /// most upvoted first.
    pub fn page(
        &self,
        viewer: &Viewer,
        query: SuggestionQuery,
    ) -> Result<SuggestionPage, LibraryError> {
        let viewer_id = viewer.user().map(|user| user.id);

        let mut summaries: Vec<SuggestionSummary> = self
            .store
            .suggestions()?
            .into_iter()
            .map(|suggestion| SuggestionSummary {
                id: suggestion.id,
                total_upvoted_users: suggestion.upvote_count(),
                upvoted_by_viewer: viewer_id
                    .map(|id| suggestion.upvoted_users.contains(&id))
                    .unwrap_or(false),
                suggested_company_name: suggestion.suggested_company_name,
                description: suggestion.description,
                company_url: suggestion.company_url,
                author: suggestion.author,
            })
            .collect();
        summaries.sort_by(|a, b| {
            b.total_upvoted_users
                .cmp(&a.total_upvoted_users)
                .then_with(|| a.id.cmp(&b.id))
        });

        let SuggestionQuery {
            suggested_company_name,
            description,
            company_url,
        } = query;

        Ok(SuggestionPage {
            initial: SuggestionInitial {
                suggested_company_name,
                description,
                company_url,
                next: SUGGESTIONS_URL,
            },
            all_suggestions: if summaries.is_empty() {
                None
            } else {
                Some(summaries)
            },
            messages: self.messages.drain(viewer),
        })
    }

    /// Store a valid suggestion for an editor, auto-upvoted by its author.
    pub fn submit(
        &self,
        viewer: &Viewer,
        form: SuggestionForm,
    ) -> Result<&'static str, LibraryError> {
        let user = access::login_required(viewer)?;

        let errors = form.errors();
        if !errors.is_empty() {
            return Err(LibraryError::Invalid(errors.join("; ")));
        }

        if !user.is_editor() {
            self.messages
                .add(viewer, MessageLevel::Warning, EDITORS_ONLY_WARNING);
            warn!(user = %user.username, "non-editor tried to submit a suggestion");
            return Err(access::AccessError::Forbidden {
                required: "editors",
            }
            .into());
        }

        let stored = self.store.insert_suggestion(form.into_suggestion(user.id))?;
        info!(
            suggestion = stored.id.0,
            user = %user.username,
            "partner suggestion added"
        );

        self.messages
            .add(viewer, MessageLevel::Success, SUGGESTION_ADDED);
        Ok(SUGGESTIONS_URL)
    }

    pub fn delete(&self, viewer: &Viewer, id: SuggestionId) -> Result<&'static str, LibraryError> {
        let user = access::coordinators_only(viewer)?;

        self.store
            .delete_suggestion(id)
            .map_err(|err| not_found_as("suggestion", err))?;
        info!(suggestion = id.0, coordinator = %user.username, "partner suggestion deleted");

        self.messages
            .add(viewer, MessageLevel::Success, SUGGESTION_DELETED);
        Ok(SUGGESTIONS_URL)
    }

    /// Add or withdraw the viewer's upvote, returning the suggestion's URL.
    pub fn toggle_upvote(
        &self,
        viewer: &Viewer,
        id: SuggestionId,
    ) -> Result<&'static str, LibraryError> {
        let user = access::editors_only(viewer)?;

        let suggestion = self
            .store
            .suggestion(id)?
            .ok_or(LibraryError::NotFound("suggestion"))?;
        let upvoted = self
            .store
            .toggle_upvote(id, user.id)
            .map_err(|err| not_found_as("suggestion", err))?;
        info!(
            suggestion = id.0,
            user = %user.username,
            upvoted,
            "suggestion upvote toggled"
        );

        Ok(suggestion.absolute_url())
    }
}

fn not_found_as(entity: &'static str, err: RepositoryError) -> LibraryError {
    match err {
        RepositoryError::NotFound => LibraryError::NotFound(entity),
        other => LibraryError::Repository(other),
    }
}
