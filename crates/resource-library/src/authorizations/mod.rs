//! Granted access records and the counters partner pages display.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::accounts::UserId;
use crate::resources::domain::{PartnerId, StreamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AuthorizationId(pub u64);

/// Evidence that a user holds access to a partner, or to one of its streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    pub id: AuthorizationId,
    pub user: UserId,
    pub partner: PartnerId,
    #[serde(default)]
    pub stream: Option<StreamId>,
    pub date_authorized: NaiveDate,
    #[serde(default)]
    pub date_expires: Option<NaiveDate>,
}

impl Authorization {
    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        self.date_expires.map_or(true, |expires| expires >= today)
    }
}

/// Count authorizations for `partner` that are still valid on `today`.
///
/// With a `stream`, only authorizations scoped to that stream are counted.
pub fn count_valid_authorizations(
    authorizations: &[Authorization],
    partner: PartnerId,
    stream: Option<StreamId>,
    today: NaiveDate,
) -> usize {
    authorizations
        .iter()
        .filter(|auth| auth.partner == partner)
        .filter(|auth| stream.map_or(true, |stream| auth.stream == Some(stream)))
        .filter(|auth| auth.is_valid_on(today))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).expect("valid date")
    }

    fn auth(
        id: u64,
        partner: u64,
        stream: Option<u64>,
        expires: Option<NaiveDate>,
    ) -> Authorization {
        Authorization {
            id: AuthorizationId(id),
            user: UserId(id),
            partner: PartnerId(partner),
            stream: stream.map(StreamId),
            date_authorized: date(1),
            date_expires: expires,
        }
    }

    #[test]
    fn expired_authorizations_are_not_counted() {
        let rows = vec![
            auth(1, 1, None, None),
            auth(2, 1, None, Some(date(10))),
            auth(3, 1, None, Some(date(9))),
            auth(4, 2, None, None),
        ];

        assert_eq!(count_valid_authorizations(&rows, PartnerId(1), None, date(10)), 2);
    }

    #[test]
    fn stream_counts_only_include_that_stream() {
        let rows = vec![
            auth(1, 1, Some(10), None),
            auth(2, 1, Some(11), None),
            auth(3, 1, Some(10), None),
        ];

        assert_eq!(
            count_valid_authorizations(&rows, PartnerId(1), Some(StreamId(10)), date(1)),
            2
        );
        assert_eq!(count_valid_authorizations(&rows, PartnerId(1), None, date(1)), 3);
    }
}
