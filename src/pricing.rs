//! Sale arithmetic: line totals, discount, tax and grand total.
//!
//! Amounts are `Decimal` with two fractional digits. Discount and tax are
//! rounded half away from zero to the cent; the total is derived from the
//! rounded parts so `total = subtotal - discount + tax` holds exactly.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::{dto::sales::SaleLineRequest, error::AppError};

/// Flat sales tax applied after the discount.
pub const TAX_RATE: Decimal = dec!(0.08);

/// Products with stock strictly below this count as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

const MAX_DISCOUNT_PERCENT: Decimal = dec!(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

impl SaleTotals {
    pub fn compute(subtotal: Decimal, discount_percent: Decimal) -> Self {
        let discount_amount = to_cents(subtotal * discount_percent / dec!(100));
        let taxable = subtotal - discount_amount;
        let tax_amount = to_cents(taxable * TAX_RATE);
        Self {
            subtotal,
            discount_amount,
            tax_amount,
            total_amount: taxable + tax_amount,
        }
    }
}

pub fn line_total(unit_price: Decimal, quantity: i32) -> Decimal {
    unit_price * Decimal::from(quantity)
}

pub fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate request lines and sum quantities per product. Keyed by product
/// id so rows are later locked in a stable order.
pub fn aggregate_quantities(lines: &[SaleLineRequest]) -> Result<BTreeMap<i32, i32>, AppError> {
    if lines.is_empty() {
        return Err(AppError::Validation("Sale must contain at least one item".into()));
    }

    let mut totals: BTreeMap<i32, i32> = BTreeMap::new();
    for line in lines {
        if line.quantity <= 0 {
            return Err(AppError::Validation(format!(
                "Quantity for product ID {} must be positive",
                line.product_id
            )));
        }
        let entry = totals.entry(line.product_id).or_insert(0);
        *entry = entry.checked_add(line.quantity).ok_or_else(|| {
            AppError::Validation(format!("Quantity for product ID {} is too large", line.product_id))
        })?;
    }
    Ok(totals)
}

pub fn validate_discount(discount_percent: Option<Decimal>) -> Result<Decimal, AppError> {
    let discount = discount_percent.unwrap_or(Decimal::ZERO);
    if discount < Decimal::ZERO || discount > MAX_DISCOUNT_PERCENT {
        return Err(AppError::Validation(
            "discount_percent must be between 0 and 100".into(),
        ));
    }
    Ok(discount)
}

pub fn normalize_payment_method(payment_method: Option<String>) -> String {
    payment_method
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i32, quantity: i32) -> SaleLineRequest {
        SaleLineRequest {
            product_id,
            quantity,
        }
    }

    #[test]
    fn ten_percent_discount_on_twenty() {
        let subtotal = line_total(dec!(10.00), 2);
        let totals = SaleTotals::compute(subtotal, dec!(10));
        assert_eq!(totals.subtotal, dec!(20.00));
        assert_eq!(totals.discount_amount, dec!(2.00));
        assert_eq!(totals.tax_amount, dec!(1.44));
        assert_eq!(totals.total_amount, dec!(19.44));
    }

    #[test]
    fn no_discount_only_tax() {
        let totals = SaleTotals::compute(dec!(12.50), Decimal::ZERO);
        assert_eq!(totals.discount_amount, dec!(0));
        assert_eq!(totals.tax_amount, dec!(1.00));
        assert_eq!(totals.total_amount, dec!(13.50));
    }

    #[test]
    fn full_discount_zeroes_everything() {
        let totals = SaleTotals::compute(dec!(99.99), dec!(100));
        assert_eq!(totals.discount_amount, dec!(99.99));
        assert_eq!(totals.tax_amount, dec!(0));
        assert_eq!(totals.total_amount, dec!(0));
    }

    #[test]
    fn totals_identity_holds_after_rounding() {
        let cases = [
            (dec!(0.01), dec!(33.3)),
            (dec!(19.99), dec!(7.5)),
            (dec!(1234.56), dec!(12.345)),
            (dec!(3.33), dec!(0)),
        ];
        for (subtotal, discount) in cases {
            let t = SaleTotals::compute(subtotal, discount);
            assert_eq!(t.total_amount, t.subtotal - t.discount_amount + t.tax_amount);
            assert_eq!(t.tax_amount, to_cents((t.subtotal - t.discount_amount) * TAX_RATE));
            assert!(t.discount_amount.scale() <= 2);
            assert!(t.tax_amount.scale() <= 2);
        }
    }

    #[test]
    fn half_cent_rounds_away_from_zero() {
        assert_eq!(to_cents(dec!(0.125)), dec!(0.13));
        assert_eq!(to_cents(dec!(0.124)), dec!(0.12));
    }

    #[test]
    fn duplicate_lines_are_summed() {
        let totals = aggregate_quantities(&[line(3, 2), line(1, 1), line(3, 4)]).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&3], 6);
        assert_eq!(totals[&1], 1);
        assert_eq!(totals.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn empty_or_non_positive_lines_are_rejected() {
        assert!(matches!(aggregate_quantities(&[]), Err(AppError::Validation(_))));
        assert!(matches!(
            aggregate_quantities(&[line(1, 0)]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            aggregate_quantities(&[line(1, -3)]),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            aggregate_quantities(&[line(1, i32::MAX), line(1, 1)]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn discount_bounds() {
        assert_eq!(validate_discount(None).unwrap(), Decimal::ZERO);
        assert_eq!(validate_discount(Some(dec!(100))).unwrap(), dec!(100));
        assert!(validate_discount(Some(dec!(-1))).is_err());
        assert!(validate_discount(Some(dec!(100.01))).is_err());
    }

    #[test]
    fn payment_method_defaults_to_cash() {
        assert_eq!(normalize_payment_method(None), "Cash");
        assert_eq!(normalize_payment_method(Some("  ".into())), "Cash");
        assert_eq!(normalize_payment_method(Some(" Card ".into())), "Card");
    }
}
