use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tracing::info;

use super::domain::{Application, ApplicationId, ApplicationRequest, ApplicationStatus};
use crate::accounts::{access, Viewer};
use crate::authorizations::{Authorization, AuthorizationId};
use crate::error::LibraryError;
use crate::messages::{MessageBox, MessageLevel};
use crate::resources::domain::{AuthorizationMethod, Partner};
use crate::store::LibraryStore;

pub const APPLICATION_SUBMITTED: &str = "Your application has been submitted for review.";

/// Intake of access requests and coordinator status changes.
pub struct ApplicationService<S> {
    store: Arc<S>,
    messages: Arc<MessageBox>,
}

impl<S> ApplicationService<S>
where
    S: LibraryStore + 'static,
{
    pub fn new(store: Arc<S>, messages: Arc<MessageBox>) -> Self {
        Self { store, messages }
    }

    /// Record a pending application for the requesting editor.
    pub fn apply(
        &self,
        viewer: &Viewer,
        request: ApplicationRequest,
        today: NaiveDate,
    ) -> Result<Application, LibraryError> {
        let user = access::login_required(viewer)?;
        if !user.is_editor() {
            return Err(access::AccessError::Forbidden {
                required: "editors",
            }
            .into());
        }

        let partner = self
            .store
            .partner(request.partner)?
            .filter(|partner| partner.status.is_public())
            .ok_or(LibraryError::NotFound("partner"))?;
        if partner.authorization_method == AuthorizationMethod::Bundle {
            return Err(LibraryError::Invalid(format!(
                "{} is part of the library bundle and takes no applications",
                partner.company_name
            )));
        }

        let streams = self.store.streams_for(partner.id)?;
        match request.specific_stream {
            None if !streams.is_empty() => {
                return Err(LibraryError::Invalid(
                    "specific_stream: choose one of the partner's collections".to_string(),
                ))
            }
            Some(stream) if !streams.iter().any(|candidate| candidate.id == stream) => {
                return Err(LibraryError::Invalid(format!(
                    "specific_stream: collection {} does not belong to this partner",
                    stream.0
                )))
            }
            _ => {}
        }

        if !request.agreement_with_terms {
            return Err(LibraryError::Invalid(
                "agreement_with_terms: the partner's terms must be accepted".to_string(),
            ));
        }

        let stored = self.store.insert_application(Application {
            id: ApplicationId(0),
            user: user.id,
            partner: partner.id,
            specific_stream: request.specific_stream,
            rationale: request.rationale,
            title_requested: request.title_requested,
            stream_requested: request.stream_requested,
            comments: request.comments,
            agreement_with_terms: request.agreement_with_terms,
            status: ApplicationStatus::Pending,
            date_created: today,
            date_closed: None,
            days_open: None,
            imported: false,
        })?;
        info!(
            application = stored.id.0,
            partner = partner.id.0,
            user = %user.username,
            "application submitted"
        );

        self.messages
            .add(viewer, MessageLevel::Success, APPLICATION_SUBMITTED);
        Ok(stored)
    }

    /// Move an application to `status`, granting access when it is delivered.
    pub fn update_status(
        &self,
        viewer: &Viewer,
        id: ApplicationId,
        status: ApplicationStatus,
        today: NaiveDate,
    ) -> Result<Application, LibraryError> {
        let coordinator = access::coordinators_only(viewer)?;

        let mut application = self
            .store
            .application(id)?
            .ok_or(LibraryError::NotFound("application"))?;
        let partner = self
            .store
            .partner(application.partner)?
            .ok_or(LibraryError::NotFound("partner"))?;

        let previous = application.status;
        application.transition(status, today);
        self.store.update_application(application.clone())?;
        info!(
            application = id.0,
            coordinator = %coordinator.username,
            from = previous.label(),
            to = status.label(),
            "application status changed"
        );

        let grants = status == ApplicationStatus::Sent
            || (status == ApplicationStatus::Approved
                && partner.authorization_method.grants_on_approval());
        if grants {
            self.grant_access(&application, &partner, today)?;
        }

        Ok(application)
    }

    fn grant_access(
        &self,
        application: &Application,
        partner: &Partner,
        today: NaiveDate,
    ) -> Result<(), LibraryError> {
        let already_held = self
            .store
            .authorizations_for_partner(partner.id)?
            .iter()
            .any(|auth| {
                auth.user == application.user && auth.stream == application.specific_stream
            });
        if already_held {
            return Ok(());
        }

        let authorization = self.store.insert_authorization(Authorization {
            id: AuthorizationId(0),
            user: application.user,
            partner: partner.id,
            stream: application.specific_stream,
            date_authorized: today,
            date_expires: partner
                .account_length_days
                .map(|days| today + Duration::days(i64::from(days))),
        })?;
        info!(
            authorization = authorization.id.0,
            application = application.id.0,
            "authorization granted"
        );
        Ok(())
    }
}
