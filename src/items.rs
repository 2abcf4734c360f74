//! Line items

use rusty_money::{Money, iso::Currency};

use crate::{products::ProductKey, promotions::PromotionKey};

/// A single basket line: one purchased instance of a catalog product.
///
/// The price is captured from the catalog at insertion time. The optional
/// promotion key is the per-item promotion assignment; an item holds at most
/// one promotion, the last one applied.
#[derive(Clone, Debug, PartialEq)]
pub struct LineItem<'a> {
    product: ProductKey,
    price: Money<'a, Currency>,
    promotion: Option<PromotionKey>,
}

impl<'a> LineItem<'a> {
    /// Creates a new, promotion-free line item.
    #[must_use]
    pub fn new(product: ProductKey, price: Money<'a, Currency>) -> Self {
        Self {
            product,
            price,
            promotion: None,
        }
    }

    /// Returns the product of the item
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the captured unit price of the item
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the promotion applied to this item, if any
    pub fn promotion(&self) -> Option<PromotionKey> {
        self.promotion
    }

    /// Assign a promotion to this item, replacing any earlier assignment.
    pub fn set_promotion(&mut self, promotion: PromotionKey) {
        self.promotion = Some(promotion);
    }

    /// Remove any applied promotion from this item.
    pub fn clear_promotion(&mut self) {
        self.promotion = None;
    }
}
