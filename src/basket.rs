//! Basket

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    catalog::Catalog,
    items::LineItem,
    pricing::{self, PricingError},
};

/// Outcome of adding a product name to the basket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// The product was valid and available; a line item was appended.
    Added,

    /// The name is not in the product catalog; recorded as invalid.
    UnknownProduct,

    /// The product exists but cannot be purchased; recorded as unavailable.
    Unavailable,
}

impl AddOutcome {
    /// Whether the product was added to the basket contents.
    #[must_use]
    pub fn is_added(self) -> bool {
        matches!(self, AddOutcome::Added)
    }
}

/// Basket
///
/// Holds added line items in insertion order, applies catalog promotions to
/// them, and derives subtotal and total on demand. Rejected product names
/// are recorded, split into invalid (unknown to the catalog) and unavailable
/// (known but not purchasable).
#[derive(Debug)]
pub struct Basket<'a> {
    catalog: &'a Catalog<'a>,
    contents: Vec<LineItem<'a>>,
    promoted: SmallVec<[usize; 10]>,
    invalid: Vec<String>,
    unavailable: Vec<String>,
}

impl<'a> Basket<'a> {
    /// Create a new, empty basket priced against the given catalog.
    #[must_use]
    pub fn new(catalog: &'a Catalog<'a>) -> Self {
        Basket {
            catalog,
            contents: Vec::new(),
            promoted: SmallVec::new(),
            invalid: Vec::new(),
            unavailable: Vec::new(),
        }
    }

    /// Add a product to the basket by name, case-insensitively.
    ///
    /// Unknown and unavailable names are recorded and leave the contents
    /// untouched. This never fails for well-formed input.
    pub fn add(&mut self, name: &str) -> AddOutcome {
        let Some((key, product)) = self.catalog.product_by_name(name) else {
            self.invalid.push(name.to_string());
            return AddOutcome::UnknownProduct;
        };

        if !product.available {
            self.unavailable.push(name.to_string());
            return AddOutcome::Unavailable;
        }

        self.contents.push(LineItem::new(key, product.unit_price));

        AddOutcome::Added
    }

    /// Calculate the cost of the basket before any promotions are applied.
    ///
    /// Re-derived on every access; applying or resetting promotions never
    /// changes it.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if there was a money arithmetic or currency
    /// mismatch error.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        if self.is_empty() {
            return Ok(Money::from_minor(0, self.catalog.currency()));
        }

        pricing::total_price(&self.contents)
    }

    /// Calculate the cost of the basket after promotions are applied.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a discount could not be represented or
    /// money arithmetic failed.
    pub fn total(&self) -> Result<Money<'a, Currency>, PricingError> {
        let zero = Money::from_minor(0, self.catalog.currency());

        self.contents
            .iter()
            .try_fold(zero, |acc, item| Ok(acc.add(self.item_price(item)?)?))
    }

    /// Calculate the discount on a single line item.
    ///
    /// An item with no promotion has a zero discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount could not be represented.
    pub fn item_discount(&self, item: &LineItem<'a>) -> Result<Money<'a, Currency>, PricingError> {
        // A stored key always resolves against the catalog it came from; a
        // missing record reads as no discount.
        let Some(key) = item.promotion() else {
            return Ok(Money::from_minor(0, self.catalog.currency()));
        };

        let Some(promotion) = self.catalog.promotion(key) else {
            return Ok(Money::from_minor(0, self.catalog.currency()));
        };

        pricing::discount_amount(item.price(), promotion.percent_discount)
    }

    /// Calculate the price due for a single line item after its discount.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the discount could not be represented.
    pub fn item_price(&self, item: &LineItem<'a>) -> Result<Money<'a, Currency>, PricingError> {
        match item.promotion().and_then(|key| self.catalog.promotion(key)) {
            Some(promotion) => pricing::discounted_price(item.price(), promotion.percent_discount),
            None => Ok(*item.price()),
        }
    }

    /// Apply the catalog's promotions to the items in the basket.
    ///
    /// Any previously applied promotions are cleared first, so repeated calls
    /// produce identical assignments. Promotions are walked in ascending id
    /// order; each active promotion is granted once per `qualifying_quantity`
    /// matching items, to instances of its discounted product in insertion
    /// order. An item holds one promotion at most; a later promotion
    /// overwrites an earlier one. Surplus allowance is discarded.
    pub fn apply_promotions(&mut self) {
        self.reset_promotions();

        let catalog = self.catalog;

        for (key, promotion) in catalog.promotions_in_id_order() {
            if !promotion.active {
                continue;
            }

            let qualifying_count = self
                .contents
                .iter()
                .filter(|item| item.product() == promotion.qualifying_product)
                .count();

            let mut allowance = promotion.allowance(qualifying_count);

            for (index, item) in self.contents.iter_mut().enumerate() {
                if allowance == 0 {
                    break;
                }

                if item.product() != promotion.discounted_product {
                    continue;
                }

                if item.promotion().is_none() {
                    self.promoted.push(index);
                }

                item.set_promotion(key);
                allowance -= 1;
            }
        }
    }

    /// Remove any applied promotions from the basket's items.
    ///
    /// Contents and the invalid/unavailable histories are untouched.
    pub fn reset_promotions(&mut self) {
        self.promoted.clear();

        for item in &mut self.contents {
            item.clear_promotion();
        }
    }

    /// Empty the basket, returning it to its just-constructed state.
    pub fn empty(&mut self) {
        self.reset_promotions();
        self.contents.clear();
        self.invalid.clear();
        self.unavailable.clear();
    }

    /// The line items currently in the basket, in insertion order.
    #[must_use]
    pub fn contents(&self) -> &[LineItem<'a>] {
        &self.contents
    }

    /// Iterate over the items in the basket.
    pub fn iter(&self) -> impl Iterator<Item = &LineItem<'a>> {
        self.contents.iter()
    }

    /// Indexes of items with a promotion applied, in application order.
    #[must_use]
    pub fn promoted_items(&self) -> &[usize] {
        &self.promoted
    }

    /// Names rejected because they are not in the product catalog.
    #[must_use]
    pub fn invalid(&self) -> &[String] {
        &self.invalid
    }

    /// Names rejected because the product is not available for purchase.
    #[must_use]
    pub fn unavailable(&self) -> &[String] {
        &self.unavailable
    }

    /// Get the number of items in the basket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Check if the basket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Get the catalog this basket is priced against.
    #[must_use]
    pub fn catalog(&self) -> &'a Catalog<'a> {
        self.catalog
    }

    /// Get the currency of the basket.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.catalog.currency()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use crate::catalog::CatalogError;

    use super::*;

    const PRODUCTS_YAML: &str = r"
products:
  - id: 1
    name: Soup
    unit_price: 65
    available: true
  - id: 2
    name: Bread
    unit_price: 80
    available: true
  - id: 3
    name: Milk
    unit_price: 130
    available: true
  - id: 4
    name: Apples
    unit_price: 100
    available: true
  - id: 5
    name: Tomatoes
    unit_price: 95
    available: false
";

    const PROMOTIONS_YAML: &str = r"
promotions:
  - id: 1
    name: Apples 10% off
    active: true
    qualifying_product_id: 4
    qualifying_product_quantity: 1
    discounted_product_id: 4
    percent_discount: 10
  - id: 2
    name: Purchase 2 tins of soup and get half price off bread
    active: true
    qualifying_product_id: 1
    qualifying_product_quantity: 2
    discounted_product_id: 2
    percent_discount: 50
";

    fn demo_catalog() -> Result<Catalog<'static>, CatalogError> {
        Catalog::from_yaml(PRODUCTS_YAML, PROMOTIONS_YAML, GBP)
    }

    #[test]
    fn add_known_available_product_appends_item() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        let outcome = basket.add("MILK");

        assert!(outcome.is_added(), "MILK is valid and available");
        assert_eq!(basket.len(), 1);
        assert_eq!(basket.subtotal()?, Money::from_minor(130, GBP));

        Ok(())
    }

    #[test]
    fn add_is_case_insensitive() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        assert_eq!(basket.add("milk"), AddOutcome::Added);
        assert_eq!(basket.add("MiLk"), AddOutcome::Added);
        assert_eq!(basket.len(), 2);

        Ok(())
    }

    #[test]
    fn add_unknown_product_records_invalid_and_leaves_basket_untouched() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        basket.add("MILK");
        let outcome = basket.add("CHICKEN");

        assert_eq!(outcome, AddOutcome::UnknownProduct);
        assert_eq!(basket.invalid(), ["CHICKEN"]);
        assert_eq!(basket.len(), 1, "contents unchanged");
        assert_eq!(basket.subtotal()?, Money::from_minor(130, GBP));
        assert_eq!(basket.total()?, Money::from_minor(130, GBP));

        Ok(())
    }

    #[test]
    fn add_unavailable_product_records_unavailable() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        let outcome = basket.add("tomatoes");

        assert_eq!(outcome, AddOutcome::Unavailable);
        assert_eq!(basket.unavailable(), ["tomatoes"]);
        assert!(basket.is_empty());

        Ok(())
    }

    #[test]
    fn subtotal_of_empty_basket_is_zero() -> TestResult {
        let catalog = demo_catalog()?;
        let basket = Basket::new(&catalog);

        assert_eq!(basket.subtotal()?, Money::from_minor(0, GBP));
        assert_eq!(basket.total()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn subtotal_is_invariant_under_promotion_application() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        basket.add("APPLES");
        basket.add("MILK");

        let before = basket.subtotal()?;

        basket.apply_promotions();
        assert_eq!(basket.subtotal()?, before);

        basket.reset_promotions();
        assert_eq!(basket.subtotal()?, before);

        Ok(())
    }

    #[test]
    fn apply_promotions_assigns_in_insertion_order() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        basket.add("BREAD");
        basket.add("BREAD");
        basket.add("SOUP");
        basket.add("SOUP");

        basket.apply_promotions();

        // One grant; the first bread in insertion order gets it.
        assert_eq!(basket.promoted_items(), [0]);
        assert_eq!(basket.total()?, Money::from_minor(250, GBP));

        Ok(())
    }

    #[test]
    fn apply_promotions_is_idempotent() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        basket.add("BREAD");
        basket.add("BREAD");
        basket.add("SOUP");
        basket.add("SOUP");
        basket.add("APPLES");

        basket.apply_promotions();
        let first_assignments: Vec<_> = basket.iter().map(LineItem::promotion).collect();
        let first_total = basket.total()?;

        basket.apply_promotions();
        let second_assignments: Vec<_> = basket.iter().map(LineItem::promotion).collect();

        assert_eq!(first_assignments, second_assignments);
        assert_eq!(basket.total()?, first_total);

        Ok(())
    }

    #[test]
    fn reset_promotions_clears_assignments_but_not_history() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        basket.add("APPLES");
        basket.add("CHICKEN");
        basket.apply_promotions();

        assert_eq!(basket.promoted_items().len(), 1);

        basket.reset_promotions();

        assert!(basket.promoted_items().is_empty());
        assert!(basket.iter().all(|item| item.promotion().is_none()));
        assert_eq!(basket.invalid(), ["CHICKEN"], "history is untouched");
        assert_eq!(basket.total()?, basket.subtotal()?);

        Ok(())
    }

    #[test]
    fn empty_restores_just_constructed_state() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        basket.add("APPLES");
        basket.add("CHICKEN");
        basket.add("TOMATOES");
        basket.apply_promotions();

        basket.empty();

        assert!(basket.is_empty());
        assert!(basket.invalid().is_empty());
        assert!(basket.unavailable().is_empty());
        assert!(basket.promoted_items().is_empty());
        assert_eq!(basket.subtotal()?, Money::from_minor(0, GBP));
        assert_eq!(basket.total()?, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn inactive_promotion_is_skipped() -> TestResult {
        let promotions = r"
promotions:
  - id: 1
    name: Apples 10% off
    active: false
    qualifying_product_id: 4
    qualifying_product_quantity: 1
    discounted_product_id: 4
    percent_discount: 10
";
        let catalog = Catalog::from_yaml(PRODUCTS_YAML, promotions, GBP)?;
        let mut basket = Basket::new(&catalog);

        basket.add("APPLES");
        basket.apply_promotions();

        assert!(basket.promoted_items().is_empty());
        assert_eq!(basket.total()?, Money::from_minor(100, GBP));

        Ok(())
    }

    #[test]
    fn later_promotion_overwrites_earlier_on_shared_item() -> TestResult {
        // Both promotions discount apples; the higher id is applied second
        // and wins the shared instance.
        let promotions = r"
promotions:
  - id: 1
    name: Apples 10% off
    active: true
    qualifying_product_id: 4
    qualifying_product_quantity: 1
    discounted_product_id: 4
    percent_discount: 10
  - id: 2
    name: Buy milk, get apples 20% off
    active: true
    qualifying_product_id: 3
    qualifying_product_quantity: 1
    discounted_product_id: 4
    percent_discount: 20
";
        let catalog = Catalog::from_yaml(PRODUCTS_YAML, promotions, GBP)?;
        let mut basket = Basket::new(&catalog);

        basket.add("APPLES");
        basket.add("MILK");
        basket.apply_promotions();

        let (promo_key, _) = catalog.promotion_by_id(2).ok_or("promotion not found")?;
        let apples = basket.contents().first().ok_or("no items")?;

        assert_eq!(apples.promotion(), Some(promo_key));
        assert_eq!(basket.promoted_items(), [0], "item listed once, not twice");

        // 230 subtotal, minus 20% of 100.
        assert_eq!(basket.total()?, Money::from_minor(210, GBP));

        Ok(())
    }

    #[test]
    fn surplus_allowance_is_discarded() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        // Four soups earn two grants, but there is only one bread.
        basket.add("BREAD");
        basket.add("SOUP");
        basket.add("SOUP");
        basket.add("SOUP");
        basket.add("SOUP");

        basket.apply_promotions();

        assert_eq!(basket.promoted_items(), [0]);

        // 340 subtotal, minus 40 off the single bread; no carry-over.
        assert_eq!(basket.total()?, Money::from_minor(300, GBP));

        Ok(())
    }

    #[test]
    fn total_equals_subtotal_minus_item_discounts() -> TestResult {
        let catalog = demo_catalog()?;
        let mut basket = Basket::new(&catalog);

        for name in ["APPLES", "APPLES", "BREAD", "BREAD", "SOUP", "SOUP", "MILK"] {
            basket.add(name);
        }

        basket.apply_promotions();

        let discounts: i64 = basket
            .iter()
            .map(|item| basket.item_discount(item).map(|d| d.to_minor_units()))
            .sum::<Result<i64, _>>()?;

        let expected = basket.subtotal()?.to_minor_units() - discounts;

        assert_eq!(basket.total()?.to_minor_units(), expected);

        Ok(())
    }
}
