use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::accounts::resolve_viewer;
use crate::applications::{
    ApplicationId, ApplicationRequest, ApplicationService, ApplicationStatus,
};
use crate::error::LibraryError;
use crate::messages::MessageBox;
use crate::resources::{
    PartnerDetailPage, PartnerId, PartnerListPage, PartnerService, PartnerUsersPage,
    SuggestionForm, SuggestionId, SuggestionPage, SuggestionQuery, SuggestionService,
};
use crate::store::LibraryStore;

/// Services sharing one store and one message box.
pub struct LibraryState<S> {
    pub store: Arc<S>,
    pub messages: Arc<MessageBox>,
    pub partners: PartnerService<S>,
    pub suggestions: SuggestionService<S>,
    pub applications: ApplicationService<S>,
}

impl<S> LibraryState<S>
where
    S: LibraryStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        let messages = Arc::new(MessageBox::default());
        Self {
            partners: PartnerService::new(store.clone(), messages.clone()),
            suggestions: SuggestionService::new(store.clone(), messages.clone()),
            applications: ApplicationService::new(store.clone(), messages.clone()),
            store,
            messages,
        }
    }
}

/// Router builder exposing the partner, suggestion and application pages.
pub fn library_router<S>(state: Arc<LibraryState<S>>) -> Router
where
    S: LibraryStore + 'static,
{
    Router::new()
        .route("/partners", get(partner_list::<S>))
        .route("/partners/:partner_id", get(partner_detail::<S>))
        .route(
            "/partners/:partner_id/toggle_waitlist",
            post(partner_toggle_waitlist::<S>),
        )
        .route("/partners/:partner_id/users", get(partner_users::<S>))
        .route(
            "/suggest",
            get(suggestion_page::<S>).post(suggestion_submit::<S>),
        )
        .route("/suggest/:suggestion_id/delete", post(suggestion_delete::<S>))
        .route("/suggest/:suggestion_id/upvote", get(suggestion_upvote::<S>))
        .route("/applications", post(application_submit::<S>))
        .route(
            "/applications/:application_id/status",
            post(application_status::<S>),
        )
        .with_state(state)
}

type LibraryRouteState<S> = State<Arc<LibraryState<S>>>;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) async fn partner_list<S>(
    State(state): LibraryRouteState<S>,
    headers: HeaderMap,
) -> Result<Json<PartnerListPage>, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    Ok(Json(state.partners.list(&viewer)?))
}

pub(crate) async fn partner_detail<S>(
    State(state): LibraryRouteState<S>,
    Path(partner_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<PartnerDetailPage>, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    let page = state
        .partners
        .detail(&viewer, PartnerId(partner_id), today())?;
    Ok(Json(page))
}

pub(crate) async fn partner_toggle_waitlist<S>(
    State(state): LibraryRouteState<S>,
    Path(partner_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Redirect, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    let url = state
        .partners
        .toggle_waitlist(&viewer, PartnerId(partner_id))?;
    Ok(Redirect::to(&url))
}

pub(crate) async fn partner_users<S>(
    State(state): LibraryRouteState<S>,
    Path(partner_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Json<PartnerUsersPage>, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    Ok(Json(state.partners.users(&viewer, PartnerId(partner_id))?))
}

pub(crate) async fn suggestion_page<S>(
    State(state): LibraryRouteState<S>,
    Query(query): Query<SuggestionQuery>,
    headers: HeaderMap,
) -> Result<Json<SuggestionPage>, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    Ok(Json(state.suggestions.page(&viewer, query)?))
}

pub(crate) async fn suggestion_submit<S>(
    State(state): LibraryRouteState<S>,
    headers: HeaderMap,
    Json(form): Json<SuggestionForm>,
) -> Result<Redirect, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    let url = state.suggestions.submit(&viewer, form)?;
    Ok(Redirect::to(url))
}

pub(crate) async fn suggestion_delete<S>(
    State(state): LibraryRouteState<S>,
    Path(suggestion_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Redirect, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    let url = state
        .suggestions
        .delete(&viewer, SuggestionId(suggestion_id))?;
    Ok(Redirect::to(url))
}

pub(crate) async fn suggestion_upvote<S>(
    State(state): LibraryRouteState<S>,
    Path(suggestion_id): Path<u64>,
    headers: HeaderMap,
) -> Result<Redirect, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    let url = state
        .suggestions
        .toggle_upvote(&viewer, SuggestionId(suggestion_id))?;
    Ok(Redirect::to(url))
}

pub(crate) async fn application_submit<S>(
    State(state): LibraryRouteState<S>,
    headers: HeaderMap,
    Json(request): Json<ApplicationRequest>,
) -> Result<Response, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    let stored = state.applications.apply(&viewer, request, today())?;
    Ok((StatusCode::CREATED, Json(stored)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusChange {
    pub(crate) status: ApplicationStatus,
}

pub(crate) async fn application_status<S>(
    State(state): LibraryRouteState<S>,
    Path(application_id): Path<u64>,
    headers: HeaderMap,
    Json(change): Json<StatusChange>,
) -> Result<Response, LibraryError>
where
    S: LibraryStore + 'static,
{
    let viewer = resolve_viewer(&*state.store, &headers)?;
    let updated = state.applications.update_status(
        &viewer,
        ApplicationId(application_id),
        change.status,
        today(),
    )?;
    Ok((StatusCode::OK, Json(updated)).into_response())
}
