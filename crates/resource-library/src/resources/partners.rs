use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info};

use super::domain::{AuthorizationMethod, Partner, PartnerId, PartnerStatus};
use super::views::{
    PartnerDetailPage, PartnerListPage, PartnerUserEntry, PartnerUsersPage, StreamAccounts,
};
use crate::accounts::{access, Viewer};
use crate::applications::{Application, ApplicationStatus};
use crate::authorizations::count_valid_authorizations;
use crate::error::LibraryError;
use crate::messages::{MessageBox, MessageLevel};
use crate::stats::median;
use crate::store::LibraryStore;

pub const STAFF_LISTING_NOTICE: &str = "Because you are a staff member, this page may include \
     Partners who are not yet available to all users.";
pub const STAFF_DETAIL_NOTICE: &str = "This partner is not available. You can see it because you \
     are a staff member, but it is not visible to non-staff users.";
pub const MULTIPLE_AUTHORIZATIONS_NOTICE: &str = "Multiple authorizations were returned – \
     something's wrong. Please contact us and don't forget to mention this message.";
pub const NOW_WAITLISTED: &str = "This partner is now waitlisted";
pub const NOW_AVAILABLE: &str = "This partner is now available for applications";

/// Partner catalogue pages and the coordinator waitlist switch.
pub struct PartnerService<S> {
    store: Arc<S>,
    messages: Arc<MessageBox>,
}

impl<S> PartnerService<S>
where
    S: LibraryStore + 'static,
{
    pub fn new(store: Arc<S>, messages: Arc<MessageBox>) -> Self {
        Self { store, messages }
    }

    /// Partners ordered by name. Staff also see partners that are not available.
    pub fn list(&self, viewer: &Viewer) -> Result<PartnerListPage, LibraryError> {
        let staff = viewer.is_staff();
        if staff {
            self.messages
                .add(viewer, MessageLevel::Info, STAFF_LISTING_NOTICE);
        }

        let mut partners: Vec<Partner> = self
            .store
            .partners()?
            .into_iter()
            .filter(|partner| staff || partner.status.is_public())
            .collect();
        partners.sort_by(|a, b| {
            a.company_name
                .cmp(&b.company_name)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(PartnerListPage {
            partners,
            messages: self.messages.drain(viewer),
        })
    }

    pub fn detail(
        &self,
        viewer: &Viewer,
        id: PartnerId,
        today: NaiveDate,
    ) -> Result<PartnerDetailPage, LibraryError> {
        let partner = self.visible_partner(viewer, id)?;

        if partner.status == PartnerStatus::NotAvailable {
            self.messages
                .add(viewer, MessageLevel::Warning, STAFF_DETAIL_NOTICE);
        }

        let authorizations = self.store.authorizations_for_partner(id)?;
        let streams = self.store.streams_for(id)?;
        let applications = self.store.applications_for_partner(id)?;

        let total_accounts_distributed_partner =
            count_valid_authorizations(&authorizations, id, None, today);
        let total_accounts_distributed_streams = if streams.is_empty() {
            None
        } else {
            Some(
                streams
                    .iter()
                    .map(|stream| StreamAccounts {
                        stream: stream.id,
                        name: stream.name.clone(),
                        total: count_valid_authorizations(
                            &authorizations,
                            id,
                            Some(stream.id),
                            today,
                        ),
                    })
                    .collect(),
            )
        };

        let days_open: Vec<u32> = applications
            .iter()
            .filter(|app| app.status.is_terminal() && !app.imported)
            .filter_map(|app| app.days_open)
            .collect();

        let mut apply = true;
        let mut has_open_apps = false;
        if let Some(user) = viewer.user() {
            if partner.authorization_method != AuthorizationMethod::Bundle {
                has_open_apps = applications
                    .iter()
                    .any(|app| app.user == user.id && app.status.is_open());

                let held = authorizations
                    .iter()
                    .filter(|auth| auth.user == user.id)
                    .count();
                if streams.is_empty() {
                    match held {
                        0 => {}
                        1 => apply = false,
                        _ => {
                            info!(
                                partner = id.0,
                                user = %user.username,
                                held,
                                "multiple authorizations returned for partner without streams"
                            );
                            self.messages.add(
                                viewer,
                                MessageLevel::Error,
                                MULTIPLE_AUTHORIZATIONS_NOTICE,
                            );
                        }
                    }
                } else if held == streams.len() {
                    apply = false;
                }
            }
        }

        Ok(PartnerDetailPage {
            partner,
            total_accounts_distributed_partner,
            total_accounts_distributed_streams,
            total_users: authorizations.len(),
            median_days: median(&days_open),
            apply,
            has_open_apps,
            messages: self.messages.drain(viewer),
        })
    }

    /// Flip an open partner between AVAILABLE and WAITLIST, returning its URL.
    pub fn toggle_waitlist(&self, viewer: &Viewer, id: PartnerId) -> Result<String, LibraryError> {
        let user = access::coordinators_only(viewer)?;

        let mut partner = self
            .store
            .partner(id)?
            .filter(|partner| partner.status.is_public())
            .ok_or(LibraryError::NotFound("partner"))?;

        let notice = match partner.status {
            PartnerStatus::Available => {
                partner.status = PartnerStatus::Waitlist;
                NOW_WAITLISTED
            }
            PartnerStatus::Waitlist => {
                partner.status = PartnerStatus::Available;
                NOW_AVAILABLE
            }
            PartnerStatus::NotAvailable => {
                error!(partner = id.0, "waitlist toggle reached a hidden partner");
                return Err(LibraryError::UnexpectedStatus {
                    partner: id.0,
                    status: partner.status.label(),
                });
            }
        };

        let url = partner.absolute_url();
        let status = partner.status;
        self.store.update_partner(partner)?;
        info!(
            partner = id.0,
            coordinator = %user.username,
            status = status.label(),
            "partner waitlist toggled"
        );

        self.messages.add(viewer, MessageLevel::Success, notice);
        Ok(url)
    }

    /// Approved and sent applications for a partner, newest closures first.
    pub fn users(&self, viewer: &Viewer, id: PartnerId) -> Result<PartnerUsersPage, LibraryError> {
        access::coordinator_or_self(viewer, id)?;

        let partner = self
            .store
            .partner(id)?
            .filter(|partner| partner.status.is_public())
            .ok_or(LibraryError::NotFound("partner"))?;

        let applications = self.store.applications_for_partner(id)?;
        let approved_applications = self.bucket(&applications, ApplicationStatus::Approved)?;
        let sent_applications = self.bucket(&applications, ApplicationStatus::Sent)?;
        let partner_streams = !self.store.streams_for(id)?.is_empty();

        Ok(PartnerUsersPage {
            partner,
            approved_applications,
            sent_applications,
            partner_streams,
            messages: self.messages.drain(viewer),
        })
    }

    fn visible_partner(&self, viewer: &Viewer, id: PartnerId) -> Result<Partner, LibraryError> {
        let staff = viewer.is_staff();
        self.store
            .partner(id)?
            .filter(|partner| staff || partner.status.is_public())
            .ok_or(LibraryError::NotFound("partner"))
    }

    fn bucket(
        &self,
        applications: &[Application],
        status: ApplicationStatus,
    ) -> Result<Vec<PartnerUserEntry>, LibraryError> {
        let mut selected: Vec<&Application> = applications
            .iter()
            .filter(|app| app.status == status)
            .collect();
        selected.sort_by(|a, b| closing_order(a, b));

        selected
            .into_iter()
            .map(|app| -> Result<PartnerUserEntry, LibraryError> {
                let user = self.store.user(app.user)?;
                Ok(PartnerUserEntry {
                    application: app.id,
                    user: app.user,
                    username: user.as_ref().map(|user| user.username.clone()),
                    wp_username: user
                        .and_then(|user| user.editor)
                        .map(|editor| editor.wp_username),
                    status: app.status,
                    specific_stream: app.specific_stream,
                    date_closed: app.date_closed,
                    days_open: app.days_open,
                })
            })
            .collect()
    }
}

/// Closing date descending with undated rows first, then stream ascending with
/// unscoped rows last.
fn closing_order(a: &Application, b: &Application) -> Ordering {
    let by_date = match (a.date_closed, b.date_closed) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => right.cmp(&left),
    };
    by_date.then_with(|| match (a.specific_stream, b.specific_stream) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => left.cmp(&right),
    })
}
