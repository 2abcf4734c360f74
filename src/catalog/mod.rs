//! Catalog
//!
//! Loads product and promotion definitions from YAML data files, validates
//! them, and exposes lookups by canonical name, by id and by key. All
//! integrity problems are fatal here, at load time; the basket trusts a
//! loaded catalog and never re-validates.

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    catalog::{
        products::{ProductRecord, ProductsFile},
        promotions::{PromotionRecord, PromotionsFile},
    },
    products::{Product, ProductId, ProductKey},
    promotions::{Promotion, PromotionId, PromotionKey},
};

pub mod products;
pub mod promotions;

/// Catalog loading and validation errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading catalog data files
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Two products share an id
    #[error("Duplicate product id {0} in product catalog")]
    DuplicateProductId(ProductId),

    /// Two products share a canonical name
    #[error("Duplicate product name {0} in product catalog")]
    DuplicateProductName(String),

    /// Two promotions share an id
    #[error("Duplicate promotion id {0} in promotion catalog")]
    DuplicatePromotionId(PromotionId),

    /// A promotion references a product id not in the product catalog
    #[error("Promotion {promotion} references unknown product id {product}")]
    UnknownProductId {
        /// Id of the referencing promotion
        promotion: PromotionId,
        /// The unresolved product id
        product: ProductId,
    },

    /// A promotion has a qualifying quantity of zero
    #[error("Promotion {0} has a qualifying product quantity of zero")]
    InvalidQualifyingQuantity(PromotionId),

    /// A promotion discounts by more than 100 percent
    #[error("Promotion {promotion} has a percent discount of {percent}, which exceeds 100")]
    InvalidPercentDiscount {
        /// Id of the offending promotion
        promotion: PromotionId,
        /// The out-of-range percentage
        percent: u8,
    },
}

/// Catalog of products and promotions, indexed for basket pricing.
#[derive(Debug)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    promotions: SlotMap<PromotionKey, Promotion>,
    product_name_index: FxHashMap<String, ProductKey>,
    product_id_index: FxHashMap<ProductId, ProductKey>,
    promotion_id_index: FxHashMap<PromotionId, PromotionKey>,
    promotion_order: Vec<PromotionKey>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Load a catalog from product and promotion YAML files.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if either file cannot be read or parsed, or
    /// if the parsed data fails validation.
    pub fn from_paths(
        products_path: &Path,
        promotions_path: &Path,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let products_yaml = fs::read_to_string(products_path)?;
        let promotions_yaml = fs::read_to_string(promotions_path)?;

        Self::from_yaml(&products_yaml, &promotions_yaml, currency)
    }

    /// Build a catalog from product and promotion YAML content.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the YAML cannot be parsed, required
    /// fields are missing, ids or names collide, a promotion references an
    /// unknown product, a qualifying quantity is zero, or a percent discount
    /// exceeds 100.
    pub fn from_yaml(
        products_yaml: &str,
        promotions_yaml: &str,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let products_file: ProductsFile = serde_norway::from_str(products_yaml)?;
        let promotions_file: PromotionsFile = serde_norway::from_str(promotions_yaml)?;

        let mut catalog = Catalog {
            products: SlotMap::with_key(),
            promotions: SlotMap::with_key(),
            product_name_index: FxHashMap::default(),
            product_id_index: FxHashMap::default(),
            promotion_id_index: FxHashMap::default(),
            promotion_order: Vec::new(),
            currency,
        };

        for record in products_file.products {
            catalog.insert_product(record)?;
        }

        for record in promotions_file.promotions {
            catalog.insert_promotion(record)?;
        }

        // Application order must not depend on file order.
        let mut order: Vec<(PromotionId, PromotionKey)> = catalog
            .promotions
            .iter()
            .map(|(key, promotion)| (promotion.id, key))
            .collect();

        order.sort_unstable_by_key(|&(id, _)| id);

        catalog.promotion_order = order.into_iter().map(|(_, key)| key).collect();

        Ok(catalog)
    }

    /// Look up a product by name, case-insensitively.
    pub fn product_by_name(&self, name: &str) -> Option<(ProductKey, &Product<'a>)> {
        let canonical = name.to_ascii_uppercase();
        let &key = self.product_name_index.get(&canonical)?;

        self.products.get(key).map(|product| (key, product))
    }

    /// Look up a product by its catalog id.
    pub fn product_by_id(&self, id: ProductId) -> Option<(ProductKey, &Product<'a>)> {
        let &key = self.product_id_index.get(&id)?;

        self.products.get(key).map(|product| (key, product))
    }

    /// Get a product record by key.
    pub fn product(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Look up a promotion by its catalog id.
    pub fn promotion_by_id(&self, id: PromotionId) -> Option<(PromotionKey, &Promotion)> {
        let &key = self.promotion_id_index.get(&id)?;

        self.promotions.get(key).map(|promotion| (key, promotion))
    }

    /// Get a promotion record by key.
    pub fn promotion(&self, key: PromotionKey) -> Option<&Promotion> {
        self.promotions.get(key)
    }

    /// Iterate over all promotions in ascending id order.
    pub fn promotions_in_id_order(&self) -> impl Iterator<Item = (PromotionKey, &Promotion)> {
        self.promotion_order
            .iter()
            .filter_map(|&key| self.promotions.get(key).map(|promotion| (key, promotion)))
    }

    /// Get the currency all catalog prices are denominated in.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    fn insert_product(&mut self, record: ProductRecord) -> Result<(), CatalogError> {
        let canonical = record.name.to_ascii_uppercase();

        if self.product_id_index.contains_key(&record.id) {
            return Err(CatalogError::DuplicateProductId(record.id));
        }

        if self.product_name_index.contains_key(&canonical) {
            return Err(CatalogError::DuplicateProductName(canonical));
        }

        let product = Product {
            id: record.id,
            name: canonical.clone(),
            unit_price: Money::from_minor(record.unit_price, self.currency),
            available: record.available,
        };

        let key = self.products.insert(product);

        self.product_id_index.insert(record.id, key);
        self.product_name_index.insert(canonical, key);

        Ok(())
    }

    fn insert_promotion(&mut self, record: PromotionRecord) -> Result<(), CatalogError> {
        if self.promotion_id_index.contains_key(&record.id) {
            return Err(CatalogError::DuplicatePromotionId(record.id));
        }

        if record.qualifying_product_quantity == 0 {
            return Err(CatalogError::InvalidQualifyingQuantity(record.id));
        }

        if record.percent_discount > 100 {
            return Err(CatalogError::InvalidPercentDiscount {
                promotion: record.id,
                percent: record.percent_discount,
            });
        }

        let qualifying_product = self.resolve_product(record.id, record.qualifying_product_id)?;
        let discounted_product = self.resolve_product(record.id, record.discounted_product_id)?;

        let promotion = Promotion {
            id: record.id,
            name: record.name,
            active: record.active,
            qualifying_product,
            qualifying_quantity: record.qualifying_product_quantity,
            discounted_product,
            percent_discount: record.percent_discount,
        };

        let key = self.promotions.insert(promotion);

        self.promotion_id_index.insert(record.id, key);

        Ok(())
    }

    fn resolve_product(
        &self,
        promotion: PromotionId,
        product: ProductId,
    ) -> Result<ProductKey, CatalogError> {
        self.product_id_index
            .get(&product)
            .copied()
            .ok_or(CatalogError::UnknownProductId { promotion, product })
    }
}
