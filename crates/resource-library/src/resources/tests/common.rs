use std::sync::Arc;

use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::accounts::{Editor, User, UserId, Viewer};
use crate::applications::{Application, ApplicationId, ApplicationStatus};
use crate::authorizations::{Authorization, AuthorizationId};
use crate::resources::domain::{
    AuthorizationMethod, Partner, PartnerId, PartnerStatus, Stream, StreamId,
};
use crate::router::{library_router, LibraryState};
use crate::store::{InMemoryLibraryStore, LibrarySeed};

pub(super) const ARCHIVE: PartnerId = PartnerId(1);
pub(super) const JOURNALS: PartnerId = PartnerId(2);
pub(super) const HIDDEN: PartnerId = PartnerId(3);
pub(super) const BUNDLED: PartnerId = PartnerId(4);

pub(super) const COORDINATOR: UserId = UserId(1);
pub(super) const STAFF: UserId = UserId(2);
pub(super) const EDITOR: UserId = UserId(3);
pub(super) const READER: UserId = UserId(4);
pub(super) const PARTNER_ACCOUNT: UserId = UserId(5);

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn days_ago(days: i64) -> NaiveDate {
    today() - chrono::Duration::days(days)
}

fn user(id: UserId, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        is_staff: false,
        is_superuser: false,
        is_coordinator: false,
        editor: None,
        partner: None,
        api_token: format!("token-{}", id.0),
    }
}

pub(super) fn users() -> Vec<User> {
    let mut coordinator = user(COORDINATOR, "coordinator");
    coordinator.is_coordinator = true;
    coordinator.editor = Some(Editor {
        wp_username: "CoordinatorWP".to_string(),
    });

    let mut staff = user(STAFF, "staff");
    staff.is_staff = true;

    let mut editor = user(EDITOR, "editor");
    editor.editor = Some(Editor {
        wp_username: "EditorWP".to_string(),
    });

    let reader = user(READER, "reader");

    let mut partner_account = user(PARTNER_ACCOUNT, "journals-account");
    partner_account.partner = Some(JOURNALS);

    vec![coordinator, staff, editor, reader, partner_account]
}

fn partner(
    id: PartnerId,
    name: &str,
    status: PartnerStatus,
    method: AuthorizationMethod,
) -> Partner {
    Partner {
        id,
        company_name: name.to_string(),
        short_description: String::new(),
        status,
        authorization_method: method,
        account_length_days: Some(365),
    }
}

pub(super) fn partners() -> Vec<Partner> {
    vec![
        partner(
            JOURNALS,
            "Biology Journals",
            PartnerStatus::Waitlist,
            AuthorizationMethod::Email,
        ),
        partner(
            ARCHIVE,
            "Archive Press",
            PartnerStatus::Available,
            AuthorizationMethod::Proxy,
        ),
        partner(
            HIDDEN,
            "Hidden Periodicals",
            PartnerStatus::NotAvailable,
            AuthorizationMethod::Email,
        ),
        partner(
            BUNDLED,
            "Bundle Books",
            PartnerStatus::Available,
            AuthorizationMethod::Bundle,
        ),
    ]
}

pub(super) fn streams() -> Vec<Stream> {
    vec![
        Stream {
            id: StreamId(21),
            partner: JOURNALS,
            name: "Botany".to_string(),
            description: String::new(),
        },
        Stream {
            id: StreamId(22),
            partner: JOURNALS,
            name: "Zoology".to_string(),
            description: String::new(),
        },
    ]
}

pub(super) fn application(
    id: u64,
    user: UserId,
    partner: PartnerId,
    status: ApplicationStatus,
) -> Application {
    Application {
        id: ApplicationId(id),
        user,
        partner,
        specific_stream: None,
        rationale: "Research".to_string(),
        title_requested: String::new(),
        stream_requested: String::new(),
        comments: String::new(),
        agreement_with_terms: true,
        status,
        date_created: days_ago(30),
        date_closed: None,
        days_open: None,
        imported: false,
    }
}

pub(super) fn closed_application(
    id: u64,
    user: UserId,
    partner: PartnerId,
    status: ApplicationStatus,
    days_open: u32,
) -> Application {
    let mut app = application(id, user, partner, status);
    app.date_closed = Some(days_ago(30 - i64::from(days_open)));
    app.days_open = Some(days_open);
    app
}

pub(super) fn authorization(
    id: u64,
    user: UserId,
    partner: PartnerId,
    stream: Option<StreamId>,
) -> Authorization {
    Authorization {
        id: AuthorizationId(id),
        user,
        partner,
        stream,
        date_authorized: days_ago(100),
        date_expires: None,
    }
}

pub(super) fn seed() -> LibrarySeed {
    LibrarySeed {
        users: users(),
        partners: partners(),
        streams: streams(),
        ..LibrarySeed::default()
    }
}

pub(super) fn store_with(seed: LibrarySeed) -> Arc<InMemoryLibraryStore> {
    Arc::new(InMemoryLibraryStore::from_seed(seed))
}

pub(super) fn state_with(seed: LibrarySeed) -> Arc<LibraryState<InMemoryLibraryStore>> {
    Arc::new(LibraryState::new(store_with(seed)))
}

pub(super) fn viewer(id: UserId) -> Viewer {
    users()
        .into_iter()
        .find(|user| user.id == id)
        .map(Viewer::Authenticated)
        .expect("fixture user exists")
}

pub(super) fn router_with(seed: LibrarySeed) -> axum::Router {
    library_router(state_with(seed))
}

pub(super) fn request(method: &str, uri: &str, user: Option<UserId>) -> Request<axum::body::Body> {
    request_with_body(method, uri, user, None)
}

pub(super) fn request_with_body(
    method: &str,
    uri: &str,
    user: Option<UserId>,
    body: Option<Value>,
) -> Request<axum::body::Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer token-{}", user.0));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            axum::body::Body::from(serde_json::to_vec(&json).expect("serializable body"))
        }
        None => axum::body::Body::empty(),
    };
    builder.body(body).expect("valid request")
}

pub(super) fn assert_redirect(response: &Response, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(location)
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
