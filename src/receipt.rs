//! Receipt

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{basket::Basket, pricing::PricingError, products::ProductKey};

/// Errors that can occur when building a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error finding a product in the product catalog.
    #[error("Missing product")]
    MissingProduct(ProductKey),

    /// Errors bubbled up from price and discount calculations.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A single receipt line: one basket item with any applied discount.
#[derive(Debug, Clone)]
pub struct ReceiptLine<'a> {
    /// Product name
    pub name: String,

    /// Unit price before discounts
    pub unit_price: Money<'a, Currency>,

    /// Name of the promotion applied to this item, if any
    pub promotion: Option<String>,

    /// Discount amount; zero when no promotion applies
    pub discount: Money<'a, Currency>,

    /// Price due for this item after the discount
    pub due: Money<'a, Currency>,
}

/// Aggregate discount granted by one promotion across the whole basket.
#[derive(Debug, Clone)]
pub struct PromotionDiscount<'a> {
    /// Promotion name
    pub name: String,

    /// Total discount granted by this promotion
    pub amount: Money<'a, Currency>,
}

/// Final receipt for a priced basket.
///
/// A receipt is a derived snapshot: building one never mutates the basket.
/// The per-promotion totals are a projection of the per-item assignments,
/// grouped in ascending promotion id order; promotions that granted nothing
/// are omitted.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    lines: Vec<ReceiptLine<'a>>,
    promotion_discounts: Vec<PromotionDiscount<'a>>,
    subtotal: Money<'a, Currency>,
    total: Money<'a, Currency>,
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a basket.
    ///
    /// Call [`Basket::apply_promotions`] first; a receipt reflects whatever
    /// assignments the basket holds when it is built.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if an item's product cannot be found in the
    /// catalog or a price calculation fails.
    pub fn from_basket(basket: &Basket<'a>) -> Result<Self, ReceiptError> {
        let catalog = basket.catalog();
        let currency = basket.currency();

        let mut lines = Vec::with_capacity(basket.len());

        for item in basket.iter() {
            let product = catalog
                .product(item.product())
                .ok_or(ReceiptError::MissingProduct(item.product()))?;

            let promotion = item
                .promotion()
                .and_then(|key| catalog.promotion(key))
                .map(|promotion| promotion.name.clone());

            let discount = basket.item_discount(item)?;
            let due = item.price().sub(discount)?;

            lines.push(ReceiptLine {
                name: product.name.clone(),
                unit_price: *item.price(),
                promotion,
                discount,
                due,
            });
        }

        let mut promotion_discounts = Vec::new();

        for (key, promotion) in catalog.promotions_in_id_order() {
            let mut amount = Money::from_minor(0, currency);

            for item in basket.iter().filter(|item| item.promotion() == Some(key)) {
                amount = amount.add(basket.item_discount(item)?)?;
            }

            if amount.to_minor_units() > 0 {
                promotion_discounts.push(PromotionDiscount {
                    name: promotion.name.clone(),
                    amount,
                });
            }
        }

        Ok(Receipt {
            lines,
            promotion_discounts,
            subtotal: basket.subtotal()?,
            total: basket.total()?,
            currency,
        })
    }

    /// Per-item receipt lines, in basket insertion order.
    #[must_use]
    pub fn lines(&self) -> &[ReceiptLine<'a>] {
        &self.lines
    }

    /// Aggregate per-promotion discounts, in ascending promotion id order.
    ///
    /// Only promotions that actually discounted something appear.
    #[must_use]
    pub fn promotion_discounts(&self) -> &[PromotionDiscount<'a>] {
        &self.promotion_discounts
    }

    /// Total cost before any promotion applications
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Total amount payable after any promotion applications
    #[must_use]
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Calculate the savings made by applying promotions.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.subtotal.sub(self.total)
    }

    /// Calculates the savings made by applying the promotions as a percentage
    /// of the subtotal.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings = self.savings()?;

        // Percent savings is relative to the original subtotal. The ratio is
        // taken in decimal space to dodge integer truncation.
        let savings_minor = savings.to_minor_units();
        let subtotal_minor = self.subtotal.to_minor_units();

        if subtotal_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let subtotal_dec = Decimal::from_i64(subtotal_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / subtotal_dec))
    }

    /// Render the receipt as an itemised text table.
    #[must_use]
    pub fn to_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Price", "Promotion", "Discount", "Due"]);

        for line in &self.lines {
            let discount = if line.discount.to_minor_units() == 0 {
                String::new()
            } else {
                format_price(&line.discount)
            };

            builder.push_record([
                line.name.clone(),
                format_price(&line.unit_price),
                line.promotion.clone().unwrap_or_default(),
                discount,
                format_price(&line.due),
            ]);
        }

        builder.push_record([
            "Subtotal".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format_price(&self.subtotal),
        ]);

        builder.push_record([
            "Total".to_string(),
            String::new(),
            String::new(),
            String::new(),
            format_price(&self.total),
        ]);

        let mut table = builder.build();

        table.with(Style::rounded());
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::new(1..), Alignment::right());

        table.to_string()
    }
}

/// Render a money amount the way a checkout display does: symbol-prefixed
/// major units from one major unit upward (`£3.10`), bare minor units with a
/// pence-style suffix below that (`67p`).
#[must_use]
pub fn format_price(amount: &Money<'_, Currency>) -> String {
    let minor = amount.to_minor_units();

    if minor >= 100 {
        format!(
            "{}{}.{:02}",
            amount.currency().symbol,
            minor / 100,
            minor % 100
        )
    } else {
        format!("{minor}p")
    }
}
