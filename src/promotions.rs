//! Promotions

use slotmap::new_key_type;

use crate::products::ProductKey;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// Numeric promotion identifier, as assigned by the catalog data.
pub type PromotionId = u32;

/// Promotion
///
/// Immutable reference data sourced from the catalog. A promotion grants a
/// percent discount on instances of its discounted product, once per
/// `qualifying_quantity` purchases of its qualifying product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    /// Promotion id; promotions are applied in ascending id order
    pub id: PromotionId,

    /// Promotion name, as shown on receipts
    pub name: String,

    /// Inactive promotions are skipped entirely
    pub active: bool,

    /// Product whose purchase quantity triggers the promotion
    pub qualifying_product: ProductKey,

    /// Purchases of the qualifying product needed per grant; validated
    /// nonzero at catalog load
    pub qualifying_quantity: usize,

    /// Product discounted when the promotion triggers
    pub discounted_product: ProductKey,

    /// Percent discount (0-100) applied to each granted instance of the
    /// discounted product
    pub percent_discount: u8,
}

impl Promotion {
    /// Number of times this promotion may be granted for the given
    /// qualifying-product count.
    #[must_use]
    pub fn allowance(&self, qualifying_count: usize) -> usize {
        qualifying_count / self.qualifying_quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promotion(qualifying_quantity: usize) -> Promotion {
        Promotion {
            id: 1,
            name: "Test promotion".to_string(),
            active: true,
            qualifying_product: ProductKey::default(),
            qualifying_quantity,
            discounted_product: ProductKey::default(),
            percent_discount: 50,
        }
    }

    #[test]
    fn allowance_floors_partial_qualification() {
        let promo = promotion(2);

        assert_eq!(promo.allowance(0), 0, "no qualifying items, no grants");
        assert_eq!(promo.allowance(1), 0, "one short of the threshold");
        assert_eq!(promo.allowance(2), 1, "exactly one grant");
        assert_eq!(promo.allowance(5), 2, "surplus below a full grant is dropped");
    }

    #[test]
    fn allowance_with_unit_quantity_matches_count() {
        let promo = promotion(1);

        assert_eq!(promo.allowance(4), 4, "every qualifying item grants once");
    }
}
