//! Role-scoped dashboard stat bundles.
//!
//! Each bundle is one pure fold over the sale snapshot for a given window.
//! Test orders are invisible to every dashboard. A couple of operational
//! counters deliberately ignore the window: logistics must see every order
//! waiting to ship and customer care every order waiting for a first call,
//! however old.

use chrono::TimeZone;
use serde::Serialize;

use affilia_auth::User;
use affilia_catalog::{find_product, Product};
use affilia_core::Money;
use affilia_sales::{Sale, SaleStatus};

use crate::leaderboard::{
    affiliate_rows, sort_leaderboard, AffiliateRow, LeaderboardColumn, SortDirection,
};
use crate::rank::{top_products, ProductRow, RankMetric};
use crate::window::DateWindow;

/// Row count of the dashboard product widget.
pub const TOP_PRODUCTS_WIDGET: usize = 5;

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Platform-wide economics for Admin and Manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub revenue: Money,
    /// Cost of goods and shipping over revenue sales, plus fulfillment and
    /// care commissions on delivered ones.
    pub direct_costs: Money,
    pub approved_commissions: Money,
    pub net_profit: Money,
    pub sales_count: usize,
    pub approval_rate: f64,
    pub top_products: Vec<ProductRow>,
    pub leaderboard: Vec<AffiliateRow>,
}

pub fn admin_dashboard<Tz: TimeZone>(
    sales: &[Sale],
    products: &[Product],
    window: &DateWindow,
    tz: &Tz,
) -> AdminDashboard {
    let windowed: Vec<&Sale> = sales
        .iter()
        .filter(|s| s.status != SaleStatus::Test && window.contains(&s.sale_date, tz))
        .collect();

    let revenue = Money::total(
        windowed
            .iter()
            .filter(|s| s.counts_revenue())
            .map(|s| s.sale_amount),
    );

    let mut direct_costs = Money::ZERO;
    for sale in windowed.iter().filter(|s| !s.is_bonus) {
        let Some(product) = find_product(products, &sale.product_id) else {
            continue;
        };
        if sale.status.counts_revenue() {
            direct_costs += (product.cost_of_goods + product.shipping_cost).times(sale.quantity);
        }
        if sale.status == SaleStatus::Consegnato {
            direct_costs += product.fulfillment_cost + product.customer_care_commission;
        }
    }

    let approved_commissions = Money::total(
        windowed
            .iter()
            .filter(|s| s.commission_approved())
            .map(|s| s.commission_amount),
    );

    let delivered = windowed
        .iter()
        .filter(|s| s.status == SaleStatus::Consegnato)
        .count();
    let valid = windowed
        .iter()
        .filter(|s| !s.status.excluded_from_counts())
        .count();

    let mut leaderboard = affiliate_rows(windowed.iter().copied());
    sort_leaderboard(
        &mut leaderboard,
        LeaderboardColumn::Revenue,
        SortDirection::Descending,
    );

    AdminDashboard {
        revenue,
        direct_costs,
        approved_commissions,
        net_profit: revenue - direct_costs - approved_commissions,
        sales_count: windowed.len(),
        approval_rate: percentage(delivered, valid),
        top_products: top_products(
            windowed.iter().copied(),
            products,
            RankMetric::Revenue,
            TOP_PRODUCTS_WIDGET,
        ),
        leaderboard,
    }
}

/// An affiliate's own numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateDashboard {
    pub revenue: Money,
    pub approved_commissions: Money,
    pub pending_commissions: Money,
    pub sales_count: usize,
    pub approval_rate: f64,
    pub top_products: Vec<ProductRow>,
}

pub fn affiliate_dashboard<Tz: TimeZone>(
    user: &User,
    sales: &[Sale],
    products: &[Product],
    window: &DateWindow,
    tz: &Tz,
) -> AffiliateDashboard {
    let own: Vec<&Sale> = sales
        .iter()
        .filter(|s| {
            s.affiliate_id == user.id
                && s.status != SaleStatus::Test
                && window.contains(&s.sale_date, tz)
        })
        .collect();

    let delivered = own
        .iter()
        .filter(|s| s.status == SaleStatus::Consegnato)
        .count();
    let valid = own
        .iter()
        .filter(|s| !s.status.excluded_from_counts())
        .count();

    AffiliateDashboard {
        revenue: Money::total(
            own.iter()
                .filter(|s| s.counts_revenue())
                .map(|s| s.sale_amount),
        ),
        approved_commissions: Money::total(
            own.iter()
                .filter(|s| s.commission_approved())
                .map(|s| s.commission_amount),
        ),
        pending_commissions: Money::total(
            own.iter()
                .filter(|s| s.commission_pending())
                .map(|s| s.commission_amount),
        ),
        sales_count: valid,
        approval_rate: percentage(delivered, valid),
        top_products: top_products(
            own.iter().copied(),
            products,
            RankMetric::Commission,
            TOP_PRODUCTS_WIDGET,
        ),
    }
}

/// Shipment pipeline counters for Logistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsDashboard {
    /// `Confermato` across the whole snapshot, not windowed.
    pub orders_to_ship: usize,
    pub shipped: usize,
    pub delivered: usize,
    pub held: usize,
    /// Fulfillment commission on delivered sales in the window.
    pub fulfillment_earnings: Money,
}

pub fn logistics_dashboard<Tz: TimeZone>(
    sales: &[Sale],
    products: &[Product],
    window: &DateWindow,
    tz: &Tz,
) -> LogisticsDashboard {
    let live = sales.iter().filter(|s| s.status != SaleStatus::Test);
    let windowed: Vec<&Sale> = live
        .clone()
        .filter(|s| window.contains(&s.sale_date, tz))
        .collect();

    let count = |status: SaleStatus| windowed.iter().filter(|s| s.status == status).count();

    LogisticsDashboard {
        orders_to_ship: live
            .filter(|s| s.status == SaleStatus::Confermato)
            .count(),
        shipped: count(SaleStatus::Spedito),
        delivered: count(SaleStatus::Consegnato),
        held: count(SaleStatus::Giacenza),
        fulfillment_earnings: Money::total(
            windowed
                .iter()
                .filter(|s| !s.is_bonus && s.status == SaleStatus::Consegnato)
                .map(|s| {
                    find_product(products, &s.product_id)
                        .map(|p| p.fulfillment_cost)
                        .unwrap_or(Money::ZERO)
                }),
        ),
    }
}

/// Statuses that count as "worked" for the handled-orders counter.
const CARE_HANDLED: [SaleStatus; 4] = [
    SaleStatus::Contattato,
    SaleStatus::Confermato,
    SaleStatus::Cancellato,
    SaleStatus::NonRaggiungibile,
];

/// Call-center counters for CustomerCare.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCareDashboard {
    /// `In attesa` across the whole snapshot, not windowed.
    pub to_contact: usize,
    /// Sales this operator last touched, in the window.
    pub handled: usize,
    pub approved_commissions: Money,
    pub pending_commissions: Money,
    /// Confirmed over confirmed-plus-cancelled among this operator's
    /// contacts, as a percentage.
    pub conversion_rate: f64,
}

pub fn customer_care_dashboard<Tz: TimeZone>(
    user: &User,
    sales: &[Sale],
    products: &[Product],
    window: &DateWindow,
    tz: &Tz,
) -> CustomerCareDashboard {
    let live = sales.iter().filter(|s| s.status != SaleStatus::Test);
    let windowed: Vec<&Sale> = live
        .clone()
        .filter(|s| window.contains(&s.sale_date, tz))
        .collect();

    let care_commission = |sale: &Sale| {
        find_product(products, &sale.product_id)
            .map(|p| p.customer_care_commission)
            .unwrap_or(Money::ZERO)
    };

    let own: Vec<&&Sale> = windowed
        .iter()
        .filter(|s| s.last_contacted_by.as_ref() == Some(&user.id))
        .collect();
    let confirmed = own
        .iter()
        .filter(|s| s.status == SaleStatus::Confermato)
        .count();
    let cancelled = own
        .iter()
        .filter(|s| s.status == SaleStatus::Cancellato)
        .count();

    CustomerCareDashboard {
        to_contact: live.filter(|s| s.status == SaleStatus::InAttesa).count(),
        handled: own
            .iter()
            .filter(|s| CARE_HANDLED.contains(&s.status))
            .count(),
        approved_commissions: Money::total(
            windowed
                .iter()
                .filter(|s| s.status == SaleStatus::Consegnato)
                .map(|s| care_commission(s)),
        ),
        pending_commissions: Money::total(
            windowed
                .iter()
                .filter(|s| matches!(s.status, SaleStatus::Contattato | SaleStatus::Spedito))
                .map(|s| care_commission(s)),
        ),
        conversion_rate: percentage(confirmed, confirmed + cancelled),
    }
}
