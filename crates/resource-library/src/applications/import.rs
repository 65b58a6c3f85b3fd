//! Loads applications exported from the previous tracking system.
//!
//! Expected headers: `user_id,partner_id,stream_id,status,date_created,date_closed,rationale`.
//! Empty `stream_id`/`date_closed` cells mean "none".

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::info;

use super::domain::{days_between, Application, ApplicationId, ApplicationStatus};
use crate::accounts::UserId;
use crate::resources::domain::{PartnerId, StreamId};
use crate::store::{ApplicationRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read legacy export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid legacy CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    Row { row: usize, reason: String },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Deserialize)]
struct LegacyRow {
    user_id: u64,
    partner_id: u64,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    stream_id: Option<String>,
    status: String,
    date_created: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    date_closed: Option<String>,
    #[serde(default)]
    rationale: String,
}

pub struct LegacyApplicationImporter;

impl LegacyApplicationImporter {
    pub fn from_path<P, R>(path: P, repository: &R) -> Result<usize, ImportError>
    where
        P: AsRef<Path>,
        R: ApplicationRepository + ?Sized,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, repository)
    }

    /// Parse every row before storing any, so a bad file imports nothing.
    pub fn from_reader<Rd, R>(reader: Rd, repository: &R) -> Result<usize, ImportError>
    where
        Rd: Read,
        R: ApplicationRepository + ?Sized,
    {
        let applications = parse_rows(reader)?;
        let total = applications.len();
        for application in applications {
            repository.insert_application(application)?;
        }
        info!(total, "legacy applications imported");
        Ok(total)
    }
}

fn parse_rows<R: Read>(reader: R) -> Result<Vec<Application>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut applications = Vec::new();

    for (index, record) in csv_reader.deserialize::<LegacyRow>().enumerate() {
        let row = index + 1;
        applications.push(into_application(record?, row)?);
    }

    Ok(applications)
}

fn into_application(row: LegacyRow, line: usize) -> Result<Application, ImportError> {
    let invalid = |reason: String| ImportError::Row { row: line, reason };

    let status = ApplicationStatus::parse(&row.status)
        .ok_or_else(|| invalid(format!("unknown status '{}'", row.status)))?;
    let date_created = parse_date(&row.date_created).map_err(&invalid)?;
    let date_closed = row
        .date_closed
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(&invalid)?;
    let specific_stream = row
        .stream_id
        .as_deref()
        .map(|raw| {
            raw.parse::<u64>()
                .map(StreamId)
                .map_err(|_| format!("stream_id '{raw}' is not a number"))
        })
        .transpose()
        .map_err(&invalid)?;

    if let Some(closed) = date_closed {
        if closed < date_created {
            return Err(invalid(format!(
                "closed on {closed} before it was created on {date_created}"
            )));
        }
    }

    let days_open = match date_closed {
        Some(closed) if status.is_terminal() => Some(days_between(date_created, closed)),
        _ => None,
    };

    Ok(Application {
        id: ApplicationId(0),
        user: UserId(row.user_id),
        partner: PartnerId(row.partner_id),
        specific_stream,
        rationale: row.rationale,
        title_requested: String::new(),
        stream_requested: String::new(),
        comments: String::new(),
        agreement_with_terms: true,
        status,
        date_created,
        date_closed: if status.is_terminal() { date_closed } else { None },
        days_open,
        imported: true,
    })
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
