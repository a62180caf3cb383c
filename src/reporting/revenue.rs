//! Month-by-month revenue for the dashboard chart.

use rust_decimal::Decimal;
use serde::Serialize;
use time::OffsetDateTime;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Anything that carries an amount booked at a point in time.
pub trait Billable {
    fn amount(&self) -> Decimal;
    fn booked_at(&self) -> OffsetDateTime;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub month: &'static str,
    pub total: Decimal,
}

fn empty_buckets() -> [MonthlyBucket; 12] {
    MONTH_LABELS.map(|month| MonthlyBucket {
        month,
        total: Decimal::ZERO,
    })
}

/// Sums `amount` per calendar month (UTC) for every record booked in `year`.
///
/// Records from other years are skipped. The result is always the twelve
/// months in calendar order, untouched months staying at zero. Callers pass
/// only the records that count as revenue (completed payments).
pub fn aggregate_monthly_revenue<'a, T, I>(records: I, year: i32) -> [MonthlyBucket; 12]
where
    T: Billable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    aggregate_monthly_revenue_by(records, year, |_| true)
}

/// Same as [`aggregate_monthly_revenue`], counting only records accepted by `keep`.
pub fn aggregate_monthly_revenue_by<'a, T, I, F>(
    records: I,
    year: i32,
    mut keep: F,
) -> [MonthlyBucket; 12]
where
    T: Billable + 'a,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&T) -> bool,
{
    let mut buckets = empty_buckets();
    for record in records {
        let at = record.booked_at().to_offset(time::UtcOffset::UTC);
        if at.year() != year || !keep(record) {
            continue;
        }
        let idx = u8::from(at.month()) as usize - 1;
        buckets[idx].total += record.amount();
    }
    buckets
}

/// Grand total across all buckets.
pub fn total(buckets: &[MonthlyBucket]) -> Decimal {
    buckets.iter().map(|b| b.total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    struct Entry {
        amount: Decimal,
        at: OffsetDateTime,
        completed: bool,
    }

    impl Billable for Entry {
        fn amount(&self) -> Decimal {
            self.amount
        }
        fn booked_at(&self) -> OffsetDateTime {
            self.at
        }
    }

    fn entry(amount: i64, at: OffsetDateTime) -> Entry {
        Entry {
            amount: Decimal::from(amount),
            at,
            completed: true,
        }
    }

    #[test]
    fn empty_input_gives_twelve_zero_buckets() {
        let buckets = aggregate_monthly_revenue::<Entry, _>(&[], 2024);
        assert_eq!(buckets.len(), 12);
        for (bucket, label) in buckets.iter().zip(MONTH_LABELS) {
            assert_eq!(bucket.month, label);
            assert_eq!(bucket.total, Decimal::ZERO);
        }
    }

    #[test]
    fn only_target_year_is_counted() {
        let records = vec![
            entry(100, datetime!(2024-03-15 0:00 UTC)),
            entry(50, datetime!(2023-03-15 0:00 UTC)),
        ];
        let buckets = aggregate_monthly_revenue(&records, 2024);
        for bucket in &buckets {
            let expected = if bucket.month == "Mar" { 100 } else { 0 };
            assert_eq!(bucket.total, Decimal::from(expected), "{}", bucket.month);
        }
    }

    #[test]
    fn order_is_calendar_order_regardless_of_input() {
        let records = vec![
            entry(3, datetime!(2024-12-01 0:00 UTC)),
            entry(1, datetime!(2024-01-31 23:59 UTC)),
            entry(2, datetime!(2024-06-10 12:00 UTC)),
        ];
        let buckets = aggregate_monthly_revenue(&records, 2024);
        let labels: Vec<_> = buckets.iter().map(|b| b.month).collect();
        assert_eq!(labels, MONTH_LABELS.to_vec());
        assert_eq!(buckets[0].total, Decimal::from(1));
        assert_eq!(buckets[5].total, Decimal::from(2));
        assert_eq!(buckets[11].total, Decimal::from(3));
    }

    #[test]
    fn bucket_sum_matches_in_year_amounts() {
        let records = vec![
            Entry {
                amount: Decimal::new(1999, 2),
                at: datetime!(2025-02-01 10:00 UTC),
                completed: true,
            },
            Entry {
                amount: Decimal::new(1, 2),
                at: datetime!(2025-02-28 10:00 UTC),
                completed: true,
            },
            entry(40, datetime!(2025-11-11 11:11 UTC)),
            entry(1000, datetime!(2026-01-01 0:00 UTC)),
        ];
        let buckets = aggregate_monthly_revenue(&records, 2025);
        assert_eq!(buckets[1].total, Decimal::from(20));
        assert_eq!(total(&buckets), Decimal::from(60));
    }

    #[test]
    fn offsets_are_normalised_to_utc() {
        // 2024-01-01 01:00 +02:00 is still 2023-12-31 in UTC.
        let records = vec![entry(10, datetime!(2024-01-01 1:00 +2))];
        assert_eq!(total(&aggregate_monthly_revenue(&records, 2024)), Decimal::ZERO);
        assert_eq!(aggregate_monthly_revenue(&records, 2023)[11].total, Decimal::from(10));
    }

    #[test]
    fn predicate_variant_skips_rejected_records() {
        let mut failed = entry(70, datetime!(2024-04-02 0:00 UTC));
        failed.completed = false;
        let records = vec![entry(30, datetime!(2024-04-01 0:00 UTC)), failed];
        let buckets = aggregate_monthly_revenue_by(&records, 2024, |e| e.completed);
        assert_eq!(buckets[3].total, Decimal::from(30));
    }
}
