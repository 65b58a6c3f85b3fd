//! Small statistics helpers for partner pages and reports.

use chrono::NaiveDate;

/// Median of `values`, truncated to a whole number, or `None` when empty.
pub fn median(values: &[u32]) -> Option<u32> {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let len = sorted.len();
    let mid = len / 2;
    match len {
        0 => None,
        _ if len % 2 == 1 => sorted.get(mid).copied(),
        _ => {
            let lower = u64::from(*sorted.get(mid - 1)?);
            let upper = u64::from(*sorted.get(mid)?);
            u32::try_from((lower + upper) / 2).ok()
        }
    }
}

/// Earliest of the given creation dates.
pub fn earliest_creation_date<I>(dates: I) -> Option<NaiveDate>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates.into_iter().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn median_of_empty_set_is_no_data() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_of_odd_and_even_sets() {
        assert_eq!(median(&[9, 1, 5]), Some(5));
        assert_eq!(median(&[4, 1, 2, 7]), Some(3));
        assert_eq!(median(&[u32::MAX, u32::MAX]), Some(u32::MAX));
    }

    #[test]
    fn earliest_creation_date_picks_minimum() {
        let dates = [
            NaiveDate::from_ymd_opt(2023, 5, 2).expect("valid date"),
            NaiveDate::from_ymd_opt(2021, 1, 9).expect("valid date"),
        ];
        assert_eq!(earliest_creation_date(dates), Some(dates[1]));
        assert_eq!(earliest_creation_date(Vec::<NaiveDate>::new()), None);
    }
}
