use crate::models::fund_request::{FundRequest, FundStatus};
use crate::models::summary::Aggregates;
use crate::validation::normalize_email;
use rust_decimal::Decimal;

/// Folds a request snapshot into counts and sums per status.
///
/// Pure and order-independent; every caller recomputes from the full set.
/// Sums saturate at the `Decimal` bounds instead of overflowing.
pub fn aggregate(records: &[FundRequest]) -> Aggregates {
    records.iter().fold(Aggregates::default(), |mut acc, record| {
        acc.total += 1;
        match record.status {
            FundStatus::Pending => {
                acc.pending += 1;
                acc.pending_total = acc.pending_total.saturating_add(record.amount);
            }
            FundStatus::Approved => {
                acc.approved += 1;
                acc.approved_total = acc.approved_total.saturating_add(record.amount);
                if record.is_disbursed() {
                    acc.disbursed += 1;
                }
            }
            FundStatus::Rejected => {
                acc.rejected += 1;
                acc.rejected_total = acc.rejected_total.saturating_add(record.amount);
            }
        }
        acc
    })
}

/// Sum of approved amounts submitted under `email` (compared case-insensitively).
pub fn approved_total_for(records: &[FundRequest], email: &str) -> Decimal {
    let wanted = normalize_email(email);
    records
        .iter()
        .filter(|r| r.status == FundStatus::Approved && normalize_email(&r.email) == wanted)
        .fold(Decimal::ZERO, |sum, r| sum.saturating_add(r.amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(id: &str, email: &str, amount: i64, status: FundStatus) -> FundRequest {
        FundRequest {
            id: id.to_string(),
            uid: format!("uid-{email}"),
            email: email.to_string(),
            amount: Decimal::from(amount),
            reason: "Supplies".to_string(),
            status,
            money_taken_by: None,
            created_at: 1_700_000_000,
            approved_at: None,
            done_at: None,
        }
    }

    #[test]
    fn mixed_statuses_produce_expected_counts() {
        let records = vec![
            request("a", "ana@example.com", 100, FundStatus::Approved),
            request("b", "ben@example.com", 200, FundStatus::Pending),
            request("c", "cy@example.com", 50, FundStatus::Rejected),
        ];

        let agg = aggregate(&records);
        assert_eq!(agg.total, 3);
        assert_eq!(agg.pending, 1);
        assert_eq!(agg.rejected, 1);
        assert_eq!(agg.approved_total, Decimal::from(100));
        assert_eq!(agg.pending_total, Decimal::from(200));
    }

    #[test]
    fn per_status_counts_always_sum_to_total() {
        let statuses = [FundStatus::Pending, FundStatus::Approved, FundStatus::Rejected];
        let records: Vec<_> = (0..40)
            .map(|i| request(&i.to_string(), "x@example.com", i, statuses[(i as usize * 7) % 3]))
            .collect();

        let agg = aggregate(&records);
        assert_eq!(agg.pending + agg.approved + agg.rejected, agg.total);
        assert_eq!(agg.total, 40);
    }

    #[test]
    fn ordering_does_not_change_the_result() {
        let mut records = vec![
            request("a", "ana@example.com", 10, FundStatus::Approved),
            request("b", "ana@example.com", 20, FundStatus::Approved),
            request("c", "ben@example.com", 30, FundStatus::Pending),
        ];
        let forward = aggregate(&records);
        records.reverse();
        assert_eq!(aggregate(&records), forward);
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        assert_eq!(aggregate(&[]), Aggregates::default());
    }

    #[test]
    fn extreme_amounts_saturate_instead_of_panicking() {
        let mut records = vec![
            request("a", "ana@example.com", 0, FundStatus::Approved),
            request("b", "ana@example.com", 0, FundStatus::Approved),
        ];
        for record in &mut records {
            record.amount = Decimal::MAX;
        }

        let agg = aggregate(&records);
        assert_eq!(agg.approved, 2);
        assert_eq!(agg.approved_total, Decimal::MAX);
        assert_eq!(approved_total_for(&records, "ana@example.com"), Decimal::MAX);
    }

    #[test]
    fn viewer_total_ignores_email_case() {
        let records = vec![
            request("a", "Ana@Example.com", 100, FundStatus::Approved),
            request("b", "ana@example.com", 40, FundStatus::Pending),
            request("c", "ben@example.com", 70, FundStatus::Approved),
        ];
        assert_eq!(approved_total_for(&records, " ANA@example.com"), Decimal::from(100));
    }
}
