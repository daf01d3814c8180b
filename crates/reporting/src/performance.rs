//! The detailed performance report.
//!
//! Unbounded variant of the admin dashboard: every money figure is split
//! into its settled and still-maturing part, and the caller can narrow the
//! sale set by product, affiliate, status set, or traffic-source substring.
//!
//! The status histogram is the one figure computed before filtering (window
//! only), so the status breakdown always reflects the raw period even when
//! the operator has drilled into a single product.

use std::collections::BTreeMap;

use chrono::TimeZone;
use serde::Serialize;

use affilia_catalog::{find_product, Product};
use affilia_core::{Money, ProductId, UserId};
use affilia_sales::{Sale, SaleStatus};

use crate::leaderboard::{
    affiliate_rows, sort_leaderboard, AffiliateRow, LeaderboardColumn, SortDirection,
};
use crate::rank::{product_rows, ProductRow, RankMetric};
use crate::window::DateWindow;

/// Optional narrowing of the report's sale set. The default filters nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportFilter {
    pub product_id: Option<ProductId>,
    pub affiliate_id: Option<UserId>,
    /// Empty means every status.
    pub statuses: Vec<SaleStatus>,
    /// Case-insensitive substring over the sale's `subId`; empty matches all.
    pub sub_id_query: String,
}

impl ReportFilter {
    fn matches(&self, sale: &Sale, sub_id_query: &str) -> bool {
        if let Some(product_id) = &self.product_id {
            if &sale.product_id != product_id {
                return false;
            }
        }
        if let Some(affiliate_id) = &self.affiliate_id {
            if &sale.affiliate_id != affiliate_id {
                return false;
            }
        }
        if !sub_id_query.is_empty() && !sale.sub_id.trim().to_lowercase().contains(sub_id_query) {
            return false;
        }
        if !self.statuses.is_empty() && !self.statuses.contains(&sale.status) {
            return false;
        }
        true
    }
}

/// A figure split into its settled and still-maturing parts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Split {
    pub confirmed: Money,
    pub pending: Money,
}

/// The full platform report for Admin and Manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformReport {
    /// Filtered sales excluding cancelled, voided and duplicate entries.
    pub sales_count: usize,
    pub approval_rate: f64,
    pub revenue: Split,
    pub affiliate_commissions: Split,
    pub logistics_commissions: Split,
    pub care_commissions: Split,
    /// Platform fee per sale, the bundle tier's fee when one is referenced.
    pub platform_profit: Split,
    /// Goods, shipping and settled handling commissions on confirmed sales.
    pub direct_costs: Money,
    /// The settled platform profit.
    pub net_profit: Money,
    /// Status breakdown of the raw window, before any other filter.
    pub status_counts: BTreeMap<SaleStatus, usize>,
    pub products: Vec<ProductRow>,
    pub leaderboard: Vec<AffiliateRow>,
}

pub fn platform_report<Tz: TimeZone>(
    sales: &[Sale],
    products: &[Product],
    filter: &ReportFilter,
    window: &DateWindow,
    tz: &Tz,
) -> PlatformReport {
    let sub_id_query = filter.sub_id_query.trim().to_lowercase();
    let filtered: Vec<&Sale> = sales
        .iter()
        .filter(|s| {
            s.status != SaleStatus::Test
                && window.contains(&s.sale_date, tz)
                && filter.matches(s, &sub_id_query)
        })
        .collect();
    let commissionable: Vec<&Sale> = filtered
        .iter()
        .filter(|s| !s.status.excluded_from_counts())
        .copied()
        .collect();

    let mut revenue = Split::default();
    let mut affiliate_commissions = Split::default();
    let mut logistics_commissions = Split::default();
    let mut care_commissions = Split::default();
    let mut platform_profit = Split::default();
    let mut direct_costs = Money::ZERO;

    for sale in &commissionable {
        // A sale whose product left the catalog contributes nothing here.
        let Some(product) = find_product(products, &sale.product_id) else {
            continue;
        };
        let logistics = product.fulfillment_cost;
        let care = product.customer_care_commission;
        let platform_fee = product.platform_fee_for(sale.bundle_id.as_ref());
        let base_cost = (product.cost_of_goods + product.shipping_cost).times(sale.quantity);

        if sale.commission_approved() {
            affiliate_commissions.confirmed += sale.commission_amount;
        } else if sale.commission_pending() {
            affiliate_commissions.pending += sale.commission_amount;
        }

        if sale.is_bonus {
            // Synthetic entries never settle handling commissions.
            logistics_commissions.pending += logistics;
            care_commissions.pending += care;
            platform_profit.pending += platform_fee;
            continue;
        }

        if sale.status.affiliate_commission_approved() {
            revenue.confirmed += sale.sale_amount;
            direct_costs += base_cost;
            if sale.status.handling_commission_approved() {
                logistics_commissions.confirmed += logistics;
                care_commissions.confirmed += care;
                platform_profit.confirmed += platform_fee;
                direct_costs += logistics + care;
            } else {
                // Svincolato: the affiliate is paid, handling is not.
                logistics_commissions.pending += logistics;
                care_commissions.pending += care;
                platform_profit.pending += platform_fee;
            }
        } else if sale.status.affiliate_commission_pending() {
            revenue.pending += sale.sale_amount;
            logistics_commissions.pending += logistics;
            care_commissions.pending += care;
            platform_profit.pending += platform_fee;
        }
    }

    let delivered = commissionable
        .iter()
        .filter(|s| s.status == SaleStatus::Consegnato)
        .count();
    let approval_rate = if commissionable.is_empty() {
        0.0
    } else {
        delivered as f64 / commissionable.len() as f64 * 100.0
    };

    let mut status_counts: BTreeMap<SaleStatus, usize> = BTreeMap::new();
    for sale in sales.iter().filter(|s| window.contains(&s.sale_date, tz)) {
        *status_counts.entry(sale.status).or_insert(0) += 1;
    }

    let mut leaderboard = affiliate_rows(filtered.iter().copied());
    sort_leaderboard(
        &mut leaderboard,
        LeaderboardColumn::Revenue,
        SortDirection::Descending,
    );

    PlatformReport {
        sales_count: commissionable.len(),
        approval_rate,
        revenue,
        affiliate_commissions,
        logistics_commissions,
        care_commissions,
        platform_profit,
        direct_costs,
        net_profit: platform_profit.confirmed,
        status_counts,
        products: product_rows(filtered.iter().copied(), products, RankMetric::Revenue),
        leaderboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    use affilia_catalog::BundleTier;
    use affilia_core::{BundleId, SaleId};
    use affilia_sales::Address;

    use crate::window::Period;

    fn day(n: u32) -> DateTime<Utc> {
        format!("2024-06-{n:02}T10:00:00Z").parse().unwrap()
    }

    fn sale(id: &str, affiliate: &str, status: SaleStatus, amount_cents: i64) -> Sale {
        Sale {
            id: SaleId::from(id),
            product_id: ProductId::from("p1"),
            product_name: "Crema Viso".to_string(),
            affiliate_id: UserId::from(affiliate),
            affiliate_name: affiliate.to_uppercase(),
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
            sub_id: "fb-campagna-1".to_string(),
            sale_date: day(10),
            tracking_code: None,
            notes: None,
            contact_history: Vec::new(),
        }
    }

    fn product() -> Product {
        Product {
            id: ProductId::from("p1"),
            name: "Crema Viso".to_string(),
            price: Money::from_cents(4990),
            cost_of_goods: Money::from_cents(800),
            shipping_cost: Money::from_cents(500),
            shipping_charge: Money::ZERO,
            commission_value: Money::ZERO,
            fulfillment_cost: Money::from_cents(150),
            customer_care_commission: Money::from_cents(200),
            platform_fee: Money::from_cents(700),
            bundles: vec![BundleTier {
                id: BundleId::from("b2"),
                quantity: 2,
                price: Money::from_cents(8990),
                commission_value: Some(Money::from_cents(2000)),
                platform_fee: Some(Money::from_cents(1200)),
            }],
            variants: Vec::new(),
            stock_quantity: None,
        }
    }

    fn june() -> DateWindow {
        Period::ThisMonth.window("2024-06-30".parse().unwrap())
    }

    #[test]
    fn svincolato_settles_the_affiliate_but_not_the_handling_side() {
        let sales = vec![sale("s1", "a1", SaleStatus::Svincolato, 4990)];

        let report =
            platform_report(&sales, &[product()], &ReportFilter::default(), &june(), &Utc);

        assert_eq!(report.revenue.confirmed, Money::from_cents(4990));
        assert_eq!(report.affiliate_commissions.confirmed, Money::from_cents(998));
        assert_eq!(report.logistics_commissions.confirmed, Money::ZERO);
        assert_eq!(report.logistics_commissions.pending, Money::from_cents(150));
        assert_eq!(report.care_commissions.pending, Money::from_cents(200));
        assert_eq!(report.platform_profit.pending, Money::from_cents(700));
        assert_eq!(report.net_profit, Money::ZERO);
        // Goods and shipping are booked, handling commissions are not yet.
        assert_eq!(report.direct_costs, Money::from_cents(1300));
    }

    #[test]
    fn delivery_settles_everything_and_drives_net_profit() {
        let sales = vec![
            sale("s1", "a1", SaleStatus::Consegnato, 4990),
            sale("s2", "a1", SaleStatus::Contattato, 4990),
        ];

        let report =
            platform_report(&sales, &[product()], &ReportFilter::default(), &june(), &Utc);

        assert_eq!(report.revenue.confirmed, Money::from_cents(4990));
        assert_eq!(report.revenue.pending, Money::from_cents(4990));
        assert_eq!(report.platform_profit.confirmed, Money::from_cents(700));
        assert_eq!(report.net_profit, Money::from_cents(700));
        assert_eq!(report.direct_costs, Money::from_cents(1300 + 150 + 200));
        assert!((report.approval_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bundle_sales_use_the_tier_platform_fee() {
        let mut bundled = sale("s1", "a1", SaleStatus::Consegnato, 8990);
        bundled.bundle_id = Some(BundleId::from("b2"));

        let report = platform_report(
            &[bundled],
            &[product()],
            &ReportFilter::default(),
            &june(),
            &Utc,
        );

        assert_eq!(report.platform_profit.confirmed, Money::from_cents(1200));
    }

    #[test]
    fn bonus_sales_keep_their_handling_side_pending() {
        let mut bonus = sale("s1", "a1", SaleStatus::Consegnato, 0);
        bonus.is_bonus = true;
        bonus.commission_amount = Money::from_cents(500);

        let report = platform_report(
            &[bonus],
            &[product()],
            &ReportFilter::default(),
            &june(),
            &Utc,
        );

        assert_eq!(report.affiliate_commissions.confirmed, Money::from_cents(500));
        assert_eq!(report.revenue.confirmed, Money::ZERO);
        assert_eq!(report.logistics_commissions.pending, Money::from_cents(150));
        assert_eq!(report.platform_profit.confirmed, Money::ZERO);
    }

    #[test]
    fn missing_product_contributes_nothing_to_the_money_figures() {
        let mut orphan = sale("s1", "a1", SaleStatus::Consegnato, 4990);
        orphan.product_id = ProductId::from("deleted");

        let report = platform_report(
            &[orphan],
            &[product()],
            &ReportFilter::default(),
            &june(),
            &Utc,
        );

        assert_eq!(report.revenue.confirmed, Money::ZERO);
        assert_eq!(report.affiliate_commissions.confirmed, Money::ZERO);
        // The sale still counts and still appears in the product rows.
        assert_eq!(report.sales_count, 1);
        assert_eq!(report.products.len(), 1);
    }

    #[test]
    fn sub_id_filter_is_a_case_insensitive_substring() {
        let mut other = sale("s2", "a1", SaleStatus::Consegnato, 4990);
        other.sub_id = "tiktok-2".to_string();
        let sales = vec![sale("s1", "a1", SaleStatus::Consegnato, 4990), other];

        let filter = ReportFilter {
            sub_id_query: "  FB-Campagna  ".to_string(),
            ..ReportFilter::default()
        };
        let report = platform_report(&sales, &[product()], &filter, &june(), &Utc);

        assert_eq!(report.sales_count, 1);
        assert_eq!(report.revenue.confirmed, Money::from_cents(4990));
    }

    #[test]
    fn status_filter_narrows_but_histogram_sees_the_whole_window() {
        let sales = vec![
            sale("s1", "a1", SaleStatus::Consegnato, 4990),
            sale("s2", "a1", SaleStatus::Spedito, 4990),
            sale("s3", "a1", SaleStatus::Spedito, 4990),
        ];

        let filter = ReportFilter {
            statuses: vec![SaleStatus::Consegnato],
            ..ReportFilter::default()
        };
        let report = platform_report(&sales, &[product()], &filter, &june(), &Utc);

        assert_eq!(report.sales_count, 1);
        assert_eq!(report.status_counts[&SaleStatus::Spedito], 2);
        assert_eq!(report.status_counts[&SaleStatus::Consegnato], 1);
    }

    #[test]
    fn affiliate_filter_scopes_every_figure_but_not_the_histogram() {
        let sales = vec![
            sale("s1", "a1", SaleStatus::Consegnato, 4990),
            sale("s2", "a2", SaleStatus::Consegnato, 8990),
        ];

        let filter = ReportFilter {
            affiliate_id: Some(UserId::from("a1")),
            ..ReportFilter::default()
        };
        let report = platform_report(&sales, &[product()], &filter, &june(), &Utc);

        assert_eq!(report.revenue.confirmed, Money::from_cents(4990));
        assert_eq!(report.leaderboard.len(), 1);
        assert_eq!(report.status_counts[&SaleStatus::Consegnato], 2);
    }
}
