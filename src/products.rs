//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Numeric product identifier, as assigned by the catalog data.
pub type ProductId = u32;

/// Product
///
/// Immutable reference data sourced from the catalog. Names are held in
/// canonical upper-case form; lookup is case-insensitive at the catalog
/// boundary, never in business logic.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Canonical product name
    pub name: String,

    /// Unit price
    pub unit_price: Money<'a, Currency>,

    /// Whether the product can currently be purchased
    pub available: bool,
}
