//! Promotion catalog records

use serde::Deserialize;

use crate::{products::ProductId, promotions::PromotionId};

/// Top-level shape of a promotions data file
#[derive(Debug, Deserialize)]
pub struct PromotionsFile {
    /// Promotion records in file order
    pub promotions: Vec<PromotionRecord>,
}

/// One promotion entry in a promotions data file
///
/// Every field is required; a missing field fails the whole load. Range
/// checks (nonzero quantity, percentage at most 100) happen during catalog
/// construction.
#[derive(Debug, Deserialize)]
pub struct PromotionRecord {
    /// Promotion id
    pub id: PromotionId,

    /// Promotion name
    pub name: String,

    /// Whether the promotion is currently in effect
    pub active: bool,

    /// Id of the product whose purchase quantity triggers the promotion
    pub qualifying_product_id: ProductId,

    /// Purchases of the qualifying product needed per grant
    pub qualifying_product_quantity: usize,

    /// Id of the product discounted when the promotion triggers
    pub discounted_product_id: ProductId,

    /// Percent discount applied to each granted instance
    pub percent_discount: u8,
}
