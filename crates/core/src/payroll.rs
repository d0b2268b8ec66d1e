//! Salary derivation and payment statuses.
//!
//! `net_salary` is always recomputed from its components before a salary
//! row is written; any client-supplied value is ignored.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::transition::TransitionTable;

pub const PAYMENT_PENDING: &str = "pending";
pub const PAYMENT_PAID: &str = "paid";
pub const PAYMENT_CANCELLED: &str = "cancelled";

pub const VALID_PAYMENT_STATUSES: &[&str] = &[PAYMENT_PENDING, PAYMENT_PAID, PAYMENT_CANCELLED];

pub const PAYMENT_TRANSITIONS: TransitionTable =
    &[(PAYMENT_PENDING, &[PAYMENT_PAID, PAYMENT_CANCELLED])];

/// `basic + bonus - deductions`, with missing components treated as zero.
pub fn net_salary(basic: Decimal, bonus: Option<Decimal>, deductions: Option<Decimal>) -> Decimal {
    basic + bonus.unwrap_or(Decimal::ZERO) - deductions.unwrap_or(Decimal::ZERO)
}

/// Pay periods are stored as the first day of their month.
pub fn normalize_pay_period(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_salary_from_components() {
        let net = net_salary(
            Decimal::new(5000, 0),
            Some(Decimal::new(500, 0)),
            Some(Decimal::new(200, 0)),
        );
        assert_eq!(net, Decimal::new(5300, 0));
    }

    #[test]
    fn missing_components_count_as_zero() {
        assert_eq!(net_salary(Decimal::new(1200, 0), None, None), Decimal::new(1200, 0));
    }

    #[test]
    fn cents_are_preserved() {
        let net = net_salary(
            Decimal::new(100_050, 2),
            Some(Decimal::new(25, 2)),
            Some(Decimal::new(100, 2)),
        );
        assert_eq!(net, Decimal::new(99_975, 2));
    }

    #[test]
    fn pay_period_snaps_to_month_start() {
        let d = NaiveDate::from_ymd_opt(2024, 7, 19).unwrap();
        assert_eq!(
            normalize_pay_period(d),
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
        );
    }
}
