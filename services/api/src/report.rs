use chrono::{Local, NaiveDate};
use clap::Args;
use resource_library::authorizations::count_valid_authorizations;
use resource_library::config::AppConfig;
use resource_library::error::AppError;
use resource_library::resources::{PartnerId, PartnerStatus};
use resource_library::stats::{earliest_creation_date, median};
use resource_library::store::{LibraryStore, RepositoryError};
use std::path::PathBuf;

use crate::infra::build_store;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Catalogue seed (JSON). Defaults to LIBRARY_SEED_PATH.
    #[arg(long)]
    pub(crate) seed: Option<PathBuf>,
    /// Legacy application export (CSV). Defaults to LIBRARY_IMPORT_CSV.
    #[arg(long)]
    pub(crate) import: Option<PathBuf>,
    /// Date used to decide which authorizations are still valid (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PartnerReportRow {
    pub(crate) partner: PartnerId,
    pub(crate) company_name: String,
    pub(crate) status: PartnerStatus,
    pub(crate) valid_accounts: usize,
    pub(crate) applications: usize,
    pub(crate) median_days: Option<u32>,
    pub(crate) first_application: Option<NaiveDate>,
}

pub(crate) fn run_partner_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        seed,
        import,
        today,
    } = args;

    let mut library = AppConfig::load()?.library;
    if seed.is_some() {
        library.seed_path = seed;
    }
    if import.is_some() {
        library.import_csv = import;
    }

    let store = build_store(&library)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let rows = build_partner_report(&store, today)?;
    render_partner_report(&rows, today);
    Ok(())
}

/// One row per partner, hidden partners included, ordered by name.
pub(crate) fn build_partner_report<S>(
    store: &S,
    today: NaiveDate,
) -> Result<Vec<PartnerReportRow>, RepositoryError>
where
    S: LibraryStore + ?Sized,
{
    let mut partners = store.partners()?;
    partners.sort_by(|a, b| a.company_name.cmp(&b.company_name));

    partners
        .into_iter()
        .map(|partner| -> Result<PartnerReportRow, RepositoryError> {
            let authorizations = store.authorizations_for_partner(partner.id)?;
            let applications = store.applications_for_partner(partner.id)?;
            let days_open: Vec<u32> = applications
                .iter()
                .filter(|app| app.status.is_terminal() && !app.imported)
                .filter_map(|app| app.days_open)
                .collect();

            Ok(PartnerReportRow {
                partner: partner.id,
                valid_accounts: count_valid_authorizations(
                    &authorizations,
                    partner.id,
                    None,
                    today,
                ),
                applications: applications.len(),
                median_days: median(&days_open),
                first_application: earliest_creation_date(
                    applications.iter().map(|app| app.date_created),
                ),
                company_name: partner.company_name,
                status: partner.status,
            })
        })
        .collect()
}

fn render_partner_report(rows: &[PartnerReportRow], today: NaiveDate) {
    println!("Partner report as of {today}");
    if rows.is_empty() {
        println!("  No partners in the catalogue.");
        return;
    }

    for row in rows {
        let median = row
            .median_days
            .map(|days| format!("{days} days"))
            .unwrap_or_else(|| "no data".to_string());
        let since = row
            .first_application
            .map(|date| date.to_string())
            .unwrap_or_else(|| "never".to_string());
        println!(
            "- #{} {} [{}]: {} valid accounts, {} applications (first {}), median review {}",
            row.partner.0,
            row.company_name,
            row.status.label(),
            row.valid_accounts,
            row.applications,
            since,
            median
        );
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use resource_library::accounts::UserId;
    use resource_library::applications::{Application, ApplicationId, ApplicationStatus};
    use resource_library::authorizations::{Authorization, AuthorizationId};
    use resource_library::resources::{AuthorizationMethod, Partner};
    use resource_library::store::{InMemoryLibraryStore, LibrarySeed};

    fn date(raw: &str) -> NaiveDate {
        parse_date(raw).expect("valid date")
    }

    fn partner(id: u64, name: &str, status: PartnerStatus) -> Partner {
        Partner {
            id: PartnerId(id),
            company_name: name.to_string(),
            short_description: String::new(),
            status,
            authorization_method: AuthorizationMethod::Email,
            account_length_days: None,
        }
    }

    fn application(id: u64, created: &str, days_open: Option<u32>, imported: bool) -> Application {
        Application {
            id: ApplicationId(id),
            user: UserId(id),
            partner: PartnerId(1),
            specific_stream: None,
            rationale: String::new(),
            title_requested: String::new(),
            stream_requested: String::new(),
            comments: String::new(),
            agreement_with_terms: true,
            status: if days_open.is_some() {
                ApplicationStatus::Sent
            } else {
                ApplicationStatus::Pending
            },
            date_created: date(created),
            date_closed: None,
            days_open,
            imported,
        }
    }

    #[test]
    fn report_summarises_each_partner() {
        let store = InMemoryLibraryStore::from_seed(LibrarySeed {
            partners: vec![
                partner(2, "Zeta Maps", PartnerStatus::NotAvailable),
                partner(1, "Alpha Letters", PartnerStatus::Available),
            ],
            applications: vec![
                application(1, "2020-05-01", Some(6), false),
                application(2, "2018-02-01", Some(900), true),
                application(3, "2021-01-10", None, false),
            ],
            authorizations: vec![
                Authorization {
                    id: AuthorizationId(1),
                    user: UserId(1),
                    partner: PartnerId(1),
                    stream: None,
                    date_authorized: date("2020-05-07"),
                    date_expires: Some(date("2020-12-31")),
                },
                Authorization {
                    id: AuthorizationId(2),
                    user: UserId(2),
                    partner: PartnerId(1),
                    stream: None,
                    date_authorized: date("2020-05-07"),
                    date_expires: None,
                },
            ],
            ..LibrarySeed::default()
        });

        let rows = build_partner_report(&store, date("2021-06-01")).expect("report builds");

        assert_eq!(rows.len(), 2);
        let alpha = &rows[0];
        assert_eq!(alpha.company_name, "Alpha Letters");
        assert_eq!(alpha.valid_accounts, 1);
        assert_eq!(alpha.applications, 3);
        assert_eq!(alpha.median_days, Some(6));
        assert_eq!(alpha.first_application, Some(date("2018-02-01")));

        let zeta = &rows[1];
        assert_eq!(zeta.status, PartnerStatus::NotAvailable);
        assert_eq!(zeta.applications, 0);
        assert_eq!(zeta.median_days, None);
        assert_eq!(zeta.first_application, None);
    }

    #[test]
    fn dates_must_be_iso_formatted() {
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("06/01/2024").is_err());
        assert_eq!(parse_date(" 2024-06-01 "), Ok(date("2024-06-01")));
    }
}
