//! Aggregation helpers for the `/stats` endpoints.
//!
//! Repositories return raw `(status, count)` rows from `GROUP BY` queries;
//! these helpers turn them into maps that always contain every known status.

use std::collections::BTreeMap;

use serde::Serialize;

/// Count per status value.
pub type StatusCounts = BTreeMap<String, i64>;

/// Build a count map containing every value of `known`, zero-filled, with
/// the counts from `rows` applied on top.
///
/// Values in `rows` that are not in `known` are kept as well.
pub fn zero_filled<I>(known: &[&str], rows: I) -> StatusCounts
where
    I: IntoIterator<Item = (String, i64)>,
{
    let mut counts: StatusCounts = known.iter().map(|s| (s.to_string(), 0)).collect();
    for (status, count) in rows {
        *counts.entry(status).or_insert(0) += count;
    }
    counts
}

/// Sum of every bucket.
pub fn total(counts: &StatusCounts) -> i64 {
    counts.values().sum()
}

/// Status counts for a single calendar month (`YYYY-MM`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCounts {
    pub month: String,
    pub counts: StatusCounts,
    pub total: i64,
}

/// Group `(month, status, count)` rows into per-month zero-filled buckets,
/// ordered by month ascending.
pub fn group_by_month<I>(known: &[&str], rows: I) -> Vec<MonthlyCounts>
where
    I: IntoIterator<Item = (String, String, i64)>,
{
    let mut months: BTreeMap<String, Vec<(String, i64)>> = BTreeMap::new();
    for (month, status, count) in rows {
        months.entry(month).or_default().push((status, count));
    }
    months
        .into_iter()
        .map(|(month, rows)| {
            let counts = zero_filled(known, rows);
            let total = total(&counts);
            MonthlyCounts {
                month,
                counts,
                total,
            }
        })
        .collect()
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: &[&str] = &["pending", "approved", "rejected"];

    #[test]
    fn empty_rows_still_list_every_status() {
        let counts = zero_filled(KNOWN, Vec::new());
        assert_eq!(counts.len(), 3);
        assert!(counts.values().all(|&c| c == 0));
    }

    #[test]
    fn counts_are_applied() {
        let counts = zero_filled(KNOWN, vec![("approved".to_string(), 4)]);
        assert_eq!(counts["approved"], 4);
        assert_eq!(counts["pending"], 0);
        assert_eq!(total(&counts), 4);
    }

    #[test]
    fn monthly_grouping_is_ordered_and_zero_filled() {
        let rows = vec![
            ("2024-03".to_string(), "pending".to_string(), 2),
            ("2024-01".to_string(), "approved".to_string(), 1),
            ("2024-03".to_string(), "rejected".to_string(), 1),
        ];
        let months = group_by_month(KNOWN, rows);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].month, "2024-01");
        assert_eq!(months[0].counts["pending"], 0);
        assert_eq!(months[1].total, 3);
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(90.0), 90.0);
        assert_eq!(round2(66.666_666), 66.67);
    }
}
