//! Prices

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::LineItem;

/// Errors that can occur while calculating prices and discounts.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// No items were provided, so currency could not be determined.
    #[error("no items provided; cannot determine currency")]
    NoItems,

    /// Percentage calculation could not be safely represented.
    #[error("percentage calculation overflowed or was not representable")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the total full price of a list of line items
///
/// # Errors
///
/// - [`PricingError::NoItems`]: No items were provided, so currency could not be determined.
/// - [`PricingError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn total_price<'a>(items: &[LineItem<'a>]) -> Result<Money<'a, Currency>, PricingError> {
    let first = items.first().ok_or(PricingError::NoItems)?;

    let total = items.iter().try_fold(
        Money::from_minor(0, first.price().currency()),
        |acc, item| acc.add(*item.price()),
    )?;

    Ok(total)
}

/// Calculate the discount amount for an integer percentage of a price.
///
/// The amount is truncated toward zero, never rounded up: a 10% discount on
/// 65 minor units is 6, not 7.
///
/// # Errors
///
/// Returns [`PricingError::PercentConversion`] if the calculation cannot be
/// represented in minor units.
pub fn discount_amount<'a>(
    price: &Money<'a, Currency>,
    percent: u8,
) -> Result<Money<'a, Currency>, PricingError> {
    let discount_minor = percent_of_minor(percent, price.to_minor_units())?;

    Ok(Money::from_minor(discount_minor, price.currency()))
}

/// Calculate the price remaining after an integer percentage discount.
///
/// # Errors
///
/// Returns a [`PricingError`] if the discount cannot be represented or the
/// subtraction fails.
pub fn discounted_price<'a>(
    price: &Money<'a, Currency>,
    percent: u8,
) -> Result<Money<'a, Currency>, PricingError> {
    let discount = discount_amount(price, percent)?;

    Ok(price.sub(discount)?)
}

/// Calculate the truncated percentage of a minor unit amount.
fn percent_of_minor(percent: u8, minor: i64) -> Result<i64, PricingError> {
    let percent = Decimal::from(percent);

    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let Some(scaled) = percent.checked_mul(minor) else {
        return Err(PricingError::PercentConversion);
    };

    let Some(applied) = scaled.checked_div(Decimal::ONE_HUNDRED) else {
        return Err(PricingError::PercentConversion);
    };

    let truncated = applied.round_dp_with_strategy(0, RoundingStrategy::ToZero);

    truncated.to_i64().ok_or(PricingError::PercentConversion)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::products::ProductKey;

    use super::*;

    #[test]
    fn test_total_price() -> TestResult {
        let items = [
            LineItem::new(ProductKey::default(), Money::from_minor(100, GBP)),
            LineItem::new(ProductKey::default(), Money::from_minor(200, GBP)),
        ];

        assert_eq!(total_price(&items)?, Money::from_minor(300, GBP));

        Ok(())
    }

    #[test]
    fn test_total_price_empty() {
        let items: [LineItem<'static>; 0] = [];

        assert!(matches!(total_price(&items), Err(PricingError::NoItems)));
    }

    #[test]
    fn discount_amount_exact_percentage() -> TestResult {
        let price = Money::from_minor(80, GBP);

        assert_eq!(discount_amount(&price, 50)?, Money::from_minor(40, GBP));

        Ok(())
    }

    #[test]
    fn discount_amount_truncates_toward_zero() -> TestResult {
        // 10% of 65 is 6.5; the fractional part is dropped, not rounded.
        assert_eq!(
            discount_amount(&Money::from_minor(65, GBP), 10)?,
            Money::from_minor(6, GBP)
        );

        // 50% of 99 is 49.5.
        assert_eq!(
            discount_amount(&Money::from_minor(99, GBP), 50)?,
            Money::from_minor(49, GBP)
        );

        Ok(())
    }

    #[test]
    fn discount_amount_zero_percent_is_zero() -> TestResult {
        let price = Money::from_minor(130, GBP);

        assert_eq!(discount_amount(&price, 0)?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn discounted_price_subtracts_discount() -> TestResult {
        let price = Money::from_minor(100, GBP);

        assert_eq!(discounted_price(&price, 10)?, Money::from_minor(90, GBP));

        Ok(())
    }

    #[test]
    fn discounted_price_full_discount_is_free() -> TestResult {
        let price = Money::from_minor(130, GBP);

        assert_eq!(discounted_price(&price, 100)?, Money::from_minor(0, GBP));

        Ok(())
    }
}
