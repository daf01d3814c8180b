//! Per-product grouping and ranking.
//!
//! Products are ranked by a role-dependent figure: affiliates care about
//! their commission, logistics about volume handled, customer care about its
//! own commission, admins about gross revenue. Ties keep first-seen order.

use std::collections::HashMap;

use serde::Serialize;

use affilia_auth::Role;
use affilia_catalog::{find_product, Product};
use affilia_core::{Money, ProductId};
use affilia_sales::{Sale, SaleStatus};

/// The figure a product list is ordered by.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RankMetric {
    /// Affiliate commission booked through the product.
    Commission,
    /// Customer-care commission earned on delivered sales.
    CareCommission,
    /// Number of sales handled.
    HandledCount,
    /// Gross revenue.
    Revenue,
}

impl RankMetric {
    pub const fn for_role(role: Role) -> RankMetric {
        match role {
            Role::Affiliate => RankMetric::Commission,
            Role::Logistics => RankMetric::HandledCount,
            Role::CustomerCare => RankMetric::CareCommission,
            Role::Admin | Role::Manager => RankMetric::Revenue,
        }
    }
}

/// One product's aggregated line in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub product_id: ProductId,
    pub product_name: String,
    pub sales_count: usize,
    /// Revenue over revenue-bearing sales only.
    pub revenue: Money,
    /// Affiliate commission, or the care commission under
    /// [`RankMetric::CareCommission`].
    pub commission: Money,
}

impl ProductRow {
    fn rank_key(&self, metric: RankMetric) -> i64 {
        match metric {
            RankMetric::HandledCount => self.sales_count as i64,
            RankMetric::Revenue => self.revenue.cents(),
            RankMetric::Commission | RankMetric::CareCommission => self.commission.cents(),
        }
    }
}

/// Group the given sales by product, descending by `metric`, unbounded.
///
/// Sales pointing at a product no longer in the catalog keep the name
/// recorded on the sale and contribute zero care commission.
pub fn product_rows<'a>(
    sales: impl IntoIterator<Item = &'a Sale>,
    products: &[Product],
    metric: RankMetric,
) -> Vec<ProductRow> {
    let mut rows: Vec<ProductRow> = Vec::new();
    let mut slots: HashMap<ProductId, usize> = HashMap::new();

    for sale in sales {
        let slot = *slots.entry(sale.product_id.clone()).or_insert_with(|| {
            let product_name = find_product(products, &sale.product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| sale.product_name.clone());
            rows.push(ProductRow {
                product_id: sale.product_id.clone(),
                product_name,
                sales_count: 0,
                revenue: Money::ZERO,
                commission: Money::ZERO,
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        row.sales_count += 1;
        if sale.counts_revenue() {
            row.revenue += sale.sale_amount;
        }
        row.commission += match metric {
            RankMetric::CareCommission if sale.status == SaleStatus::Consegnato => {
                find_product(products, &sale.product_id)
                    .map(|p| p.customer_care_commission)
                    .unwrap_or(Money::ZERO)
            }
            RankMetric::CareCommission => Money::ZERO,
            _ => sale.commission_amount,
        };
    }

    rows.sort_by(|a, b| b.rank_key(metric).cmp(&a.rank_key(metric)));
    rows
}

/// The dashboard widget variant: same ranking, truncated to `n` rows.
pub fn top_products<'a>(
    sales: impl IntoIterator<Item = &'a Sale>,
    products: &[Product],
    metric: RankMetric,
    n: usize,
) -> Vec<ProductRow> {
    let mut rows = product_rows(sales, products, metric);
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    use affilia_core::{SaleId, UserId};
    use affilia_sales::Address;

    fn test_time() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn sale(id: &str, product: &str, status: SaleStatus, amount_cents: i64) -> Sale {
        Sale {
            id: SaleId::from(id),
            product_id: ProductId::from(product),
            product_name: format!("{product} (snapshot)"),
            affiliate_id: UserId::from("a1"),
            affiliate_name: "Anna".to_string(),
            bundle_id: None,
            variant_id: None,
            sale_amount: Money::from_cents(amount_cents),
            commission_amount: Money::from_cents(amount_cents / 5),
            quantity: 1,
            status,
            status_updated_at: None,
            last_contacted_by: None,
            last_contacted_by_name: None,
            is_bonus: false,
            customer_name: String::new(),
            customer_phone: String::new(),
            customer_email: String::new(),
            address: Address::default(),
            sub_id: String::new(),
            sale_date: test_time(),
            tracking_code: None,
            notes: None,
            contact_history: Vec::new(),
        }
    }

    fn product(id: &str, name: &str, care_cents: i64) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            price: Money::from_cents(4990),
            cost_of_goods: Money::ZERO,
            shipping_cost: Money::ZERO,
            shipping_charge: Money::ZERO,
            commission_value: Money::ZERO,
            fulfillment_cost: Money::ZERO,
            customer_care_commission: Money::from_cents(care_cents),
            platform_fee: Money::ZERO,
            bundles: Vec::new(),
            variants: Vec::new(),
            stock_quantity: None,
        }
    }

    #[test]
    fn revenue_ranking_ignores_cancelled_sales() {
        let sales = vec![
            sale("s1", "p1", SaleStatus::Consegnato, 5000),
            sale("s2", "p1", SaleStatus::Annullato, 90_000),
            sale("s3", "p2", SaleStatus::Spedito, 6000),
        ];
        let products = [product("p1", "Crema Viso", 0), product("p2", "Siero", 0)];

        let rows = product_rows(&sales, &products, RankMetric::Revenue);
        assert_eq!(rows[0].product_id, ProductId::from("p2"));
        assert_eq!(rows[0].revenue, Money::from_cents(6000));
        assert_eq!(rows[1].revenue, Money::from_cents(5000));
        // Cancelled sales still count as handled rows.
        assert_eq!(rows[1].sales_count, 2);
    }

    #[test]
    fn care_metric_pays_only_on_delivery() {
        let sales = vec![
            sale("s1", "p1", SaleStatus::Consegnato, 5000),
            sale("s2", "p1", SaleStatus::Contattato, 5000),
            sale("s3", "p2", SaleStatus::Consegnato, 5000),
        ];
        let products = [product("p1", "Crema Viso", 300), product("p2", "Siero", 150)];

        let rows = product_rows(&sales, &products, RankMetric::CareCommission);
        assert_eq!(rows[0].product_id, ProductId::from("p1"));
        assert_eq!(rows[0].commission, Money::from_cents(300));
        assert_eq!(rows[1].commission, Money::from_cents(150));
    }

    #[test]
    fn deleted_product_keeps_snapshot_name_and_degrades_to_zero() {
        let sales = vec![sale("s1", "ghost", SaleStatus::Consegnato, 5000)];

        let rows = product_rows(&sales, &[], RankMetric::CareCommission);
        assert_eq!(rows[0].product_name, "ghost (snapshot)");
        assert_eq!(rows[0].commission, Money::ZERO);
    }

    #[test]
    fn ties_keep_first_seen_order_and_widget_truncates() {
        let sales = vec![
            sale("s1", "p1", SaleStatus::Spedito, 1000),
            sale("s2", "p2", SaleStatus::Spedito, 1000),
            sale("s3", "p3", SaleStatus::Spedito, 1000),
        ];
        let products: Vec<Product> = Vec::new();

        let rows = top_products(&sales, &products, RankMetric::Revenue, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].product_id, ProductId::from("p1"));
        assert_eq!(rows[1].product_id, ProductId::from("p2"));
    }

    #[test]
    fn metric_follows_the_viewer_role() {
        assert_eq!(RankMetric::for_role(Role::Affiliate), RankMetric::Commission);
        assert_eq!(RankMetric::for_role(Role::Logistics), RankMetric::HandledCount);
        assert_eq!(
            RankMetric::for_role(Role::CustomerCare),
            RankMetric::CareCommission
        );
        assert_eq!(RankMetric::for_role(Role::Manager), RankMetric::Revenue);
    }
}
