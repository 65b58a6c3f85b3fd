//! Partner catalogue and partner suggestions.

pub mod domain;
pub mod forms;
pub mod partners;
pub mod suggestions;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    AuthorizationMethod, Partner, PartnerId, PartnerStatus, Stream, StreamId, Suggestion,
    SuggestionId,
};
pub use forms::SuggestionForm;
pub use partners::PartnerService;
pub use suggestions::SuggestionService;
pub use views::{
    PartnerDetailPage, PartnerListPage, PartnerUsersPage, SuggestionPage, SuggestionQuery,
};
