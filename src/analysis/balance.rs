use crate::models::department_fund::DepartmentFund;
use crate::models::fund_request::{FundRequest, FundStatus};
use crate::models::summary::BalanceSummary;
use rust_decimal::Decimal;

/// Deposits minus approved requests. Never stored; recomputed per read.
pub fn summarize_balance(funds: &[DepartmentFund], requests: &[FundRequest]) -> BalanceSummary {
    let total_funds = funds
        .iter()
        .fold(Decimal::ZERO, |sum, f| sum.saturating_add(f.amount));
    let approved_total = requests
        .iter()
        .filter(|r| r.status == FundStatus::Approved)
        .fold(Decimal::ZERO, |sum, r| sum.saturating_add(r.amount));

    BalanceSummary {
        total_funds,
        approved_total,
        remaining: total_funds.saturating_sub(approved_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fund(amount: i64) -> DepartmentFund {
        DepartmentFund {
            id: format!("fund-{amount}"),
            amount: Decimal::from(amount),
            added_by: "Treasurer".to_string(),
            reason: String::new(),
            created_at: 0,
        }
    }

    fn request(amount: i64, status: FundStatus) -> FundRequest {
        FundRequest {
            id: format!("req-{amount}"),
            uid: "u1".to_string(),
            email: "ana@example.com".to_string(),
            amount: Decimal::from(amount),
            reason: "Supplies".to_string(),
            status,
            money_taken_by: None,
            created_at: 0,
            approved_at: None,
            done_at: None,
        }
    }

    #[test]
    fn remaining_is_deposits_minus_approved() {
        let funds = vec![fund(500), fund(300)];
        let requests = vec![request(200, FundStatus::Approved)];

        let summary = summarize_balance(&funds, &requests);
        assert_eq!(summary.total_funds, Decimal::from(800));
        assert_eq!(summary.remaining, Decimal::from(600));
    }

    #[test]
    fn pending_and_rejected_requests_do_not_draw_down() {
        let funds = vec![fund(100)];
        let requests = vec![
            request(40, FundStatus::Pending),
            request(60, FundStatus::Rejected),
        ];
        assert_eq!(summarize_balance(&funds, &requests).remaining, Decimal::from(100));
    }

    #[test]
    fn balance_can_go_negative() {
        let requests = vec![request(75, FundStatus::Approved)];
        assert_eq!(summarize_balance(&[], &requests).remaining, Decimal::from(-75));
    }

    #[test]
    fn extreme_totals_do_not_overflow() {
        let mut funds = vec![fund(1), fund(2)];
        let mut requests = vec![request(1, FundStatus::Approved), request(2, FundStatus::Approved)];
        funds.iter_mut().for_each(|f| f.amount = Decimal::MAX);
        requests.iter_mut().for_each(|r| r.amount = Decimal::MAX);

        let summary = summarize_balance(&funds, &requests);
        assert_eq!(summary.total_funds, Decimal::MAX);
        assert_eq!(summary.remaining, Decimal::ZERO);

        let summary = summarize_balance(&[], &requests);
        assert_eq!(summary.remaining, Decimal::MIN);
    }

    #[test]
    fn input_order_is_irrelevant() {
        let mut funds = vec![fund(5), fund(10), fund(20)];
        let mut requests = vec![request(3, FundStatus::Approved), request(4, FundStatus::Approved)];
        let forward = summarize_balance(&funds, &requests);
        funds.reverse();
        requests.reverse();
        assert_eq!(summarize_balance(&funds, &requests), forward);
    }
}
