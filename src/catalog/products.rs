//! Product catalog records

use serde::Deserialize;

use crate::products::ProductId;

/// Top-level shape of a products data file
#[derive(Debug, Deserialize)]
pub struct ProductsFile {
    /// Product records in file order
    pub products: Vec<ProductRecord>,
}

/// One product entry in a products data file
///
/// Every field is required; a missing field fails the whole load.
#[derive(Debug, Deserialize)]
pub struct ProductRecord {
    /// Product id
    pub id: ProductId,

    /// Product name, in any casing
    pub name: String,

    /// Unit price in minor currency units
    pub unit_price: i64,

    /// Whether the product can currently be purchased
    pub available: bool,
}
