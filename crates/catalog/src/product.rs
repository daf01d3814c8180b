//! Catalog records: products, bundle price tiers, stock-tracked variants.
//!
//! Products are authored by an external admin surface; the console consumes
//! them read-only to resolve commission and cost figures. Every lookup here
//! is total: a missing product or tier degrades to zero contribution in the
//! aggregation paths (the ledger's operations are stricter and reject
//! unknown references outright).

use serde::{Deserialize, Serialize};

use affilia_core::{BundleId, Money, ProductId, VariantId};

/// Sentinel product id attached to synthetic bonus credit sales.
pub const BONUS_PRODUCT: &str = "BONUS-MANUALE";

/// Sentinel product id attached to manager-side bonus debits.
pub const BONUS_DEBIT_PRODUCT: &str = "BONUS-DEBIT";

/// Returns true for the synthetic product ids that must never surface in
/// order views or duplicate detection.
pub fn is_bonus_sentinel(product_id: &ProductId) -> bool {
    matches!(product_id.as_str(), BONUS_PRODUCT | BONUS_DEBIT_PRODUCT)
}

/// A bundle price tier (multi-unit offer) within a product.
///
/// A sale referencing a tier takes its commission and platform fee from the
/// tier, not the base product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleTier {
    pub id: BundleId,
    pub quantity: u32,
    pub price: Money,
    #[serde(default)]
    pub commission_value: Option<Money>,
    #[serde(default)]
    pub platform_fee: Option<Money>,
}

/// A stock-tracked product variant (size, color).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: VariantId,
    pub name: String,
    #[serde(default)]
    pub stock_quantity: u32,
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Money,
    /// Per-unit cost of goods sold.
    #[serde(default)]
    pub cost_of_goods: Money,
    /// Per-order shipping cost borne by the platform.
    #[serde(default)]
    pub shipping_cost: Money,
    /// Shipping amount charged to the customer.
    #[serde(default)]
    pub shipping_charge: Money,
    /// Affiliate commission per sale.
    #[serde(default)]
    pub commission_value: Money,
    /// Per-order logistics commission.
    #[serde(default)]
    pub fulfillment_cost: Money,
    /// Commission paid to the customer-care operator who closed the sale.
    #[serde(default)]
    pub customer_care_commission: Money,
    /// Margin retained by the platform operator.
    #[serde(default)]
    pub platform_fee: Money,
    #[serde(default)]
    pub bundles: Vec<BundleTier>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub stock_quantity: Option<u32>,
}

impl Product {
    pub fn bundle(&self, id: &BundleId) -> Option<&BundleTier> {
        self.bundles.iter().find(|b| &b.id == id)
    }

    /// Platform fee for a sale, honoring the bundle tier override when the
    /// sale references one.
    pub fn platform_fee_for(&self, bundle_id: Option<&BundleId>) -> Money {
        bundle_id
            .and_then(|id| self.bundle(id))
            .and_then(|tier| tier.platform_fee)
            .unwrap_or(self.platform_fee)
    }

    /// Affiliate commission for a sale, honoring the bundle tier override.
    pub fn commission_for(&self, bundle_id: Option<&BundleId>) -> Money {
        bundle_id
            .and_then(|id| self.bundle(id))
            .and_then(|tier| tier.commission_value)
            .unwrap_or(self.commission_value)
    }
}

/// Find a product by id. Missing products are an expected condition in
/// aggregation paths (deleted catalog entries with surviving sales).
pub fn find_product<'a>(products: &'a [Product], id: &ProductId) -> Option<&'a Product> {
    products.iter().find(|p| &p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiered_product() -> Product {
        Product {
            id: ProductId::from("p1"),
            name: "Crema Viso".to_string(),
            price: Money::from_cents(4990),
            cost_of_goods: Money::from_cents(800),
            shipping_cost: Money::from_cents(500),
            shipping_charge: Money::from_cents(0),
            commission_value: Money::from_cents(1200),
            fulfillment_cost: Money::from_cents(150),
            customer_care_commission: Money::from_cents(200),
            platform_fee: Money::from_cents(700),
            bundles: vec![BundleTier {
                id: BundleId::from("b3"),
                quantity: 3,
                price: Money::from_cents(9990),
                commission_value: Some(Money::from_cents(2500)),
                platform_fee: Some(Money::from_cents(1500)),
            }],
            variants: Vec::new(),
            stock_quantity: None,
        }
    }

    #[test]
    fn bundle_tier_overrides_fee_and_commission() {
        let product = tiered_product();
        let tier = BundleId::from("b3");

        assert_eq!(product.platform_fee_for(Some(&tier)), Money::from_cents(1500));
        assert_eq!(product.commission_for(Some(&tier)), Money::from_cents(2500));
    }

    #[test]
    fn base_figures_apply_without_a_tier() {
        let product = tiered_product();
        let unknown = BundleId::from("nope");

        assert_eq!(product.platform_fee_for(None), Money::from_cents(700));
        // Unknown tier falls back to the base product figures.
        assert_eq!(product.platform_fee_for(Some(&unknown)), Money::from_cents(700));
        assert_eq!(product.commission_for(Some(&unknown)), Money::from_cents(1200));
    }

    #[test]
    fn bonus_sentinels_are_recognized() {
        assert!(is_bonus_sentinel(&ProductId::from(BONUS_PRODUCT)));
        assert!(is_bonus_sentinel(&ProductId::from(BONUS_DEBIT_PRODUCT)));
        assert!(!is_bonus_sentinel(&ProductId::from("p1")));
    }

    #[test]
    fn deserializes_sparse_wire_records() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p2","name":"Siero","price":29.9}"#,
        )
        .unwrap();
        assert_eq!(product.commission_value, Money::ZERO);
        assert!(product.bundles.is_empty());
        assert_eq!(product.price, Money::from_cents(2990));
    }
}
