//! Per-affiliate performance rows.
//!
//! One row per affiliate seen in the sale set, in first-seen order. Sorting
//! is a separate step so the caller can re-sort by any column without
//! recomputing the fold; sorts are stable, so equal rows keep their
//! insertion order.

use std::collections::HashMap;

use serde::Serialize;

use affilia_core::{Money, UserId};
use affilia_sales::Sale;

/// One affiliate's aggregated line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AffiliateRow {
    pub affiliate_id: UserId,
    pub affiliate_name: String,
    /// Sales excluding cancelled, voided and duplicate entries.
    pub sales_count: usize,
    /// Revenue over revenue-bearing sales.
    pub revenue: Money,
    pub approved_commissions: Money,
    pub pending_commissions: Money,
}

/// A sortable leaderboard column.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LeaderboardColumn {
    SalesCount,
    Revenue,
    ApprovedCommissions,
    PendingCommissions,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Fold the sales into per-affiliate rows, in first-seen order.
pub fn affiliate_rows<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Vec<AffiliateRow> {
    let mut rows: Vec<AffiliateRow> = Vec::new();
    let mut slots: HashMap<UserId, usize> = HashMap::new();

    for sale in sales {
        let slot = *slots.entry(sale.affiliate_id.clone()).or_insert_with(|| {
            rows.push(AffiliateRow {
                affiliate_id: sale.affiliate_id.clone(),
                affiliate_name: sale.affiliate_name.clone(),
                sales_count: 0,
                revenue: Money::ZERO,
                approved_commissions: Money::ZERO,
                pending_commissions: Money::ZERO,
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        if !sale.status.excluded_from_counts() {
            row.sales_count += 1;
        }
        if sale.counts_revenue() {
            row.revenue += sale.sale_amount;
        }
        if sale.commission_approved() {
            row.approved_commissions += sale.commission_amount;
        } else if sale.commission_pending() {
            row.pending_commissions += sale.commission_amount;
        }
    }

    rows
}

/// Stable in-place sort by one column.
pub fn sort_leaderboard(
    rows: &mut [AffiliateRow],
    column: LeaderboardColumn,
    direction: SortDirection,
) {
    rows.sort_by(|a, b| {
        let ordering = match column {
            LeaderboardColumn::SalesCount => a.sales_count.cmp(&b.sales_count),
            LeaderboardColumn::Revenue => a.revenue.cmp(&b.revenue),
            LeaderboardColumn::ApprovedCommissions => {
                a.approved_commissions.cmp(&b.approved_commissions)
            }
            LeaderboardColumn::PendingCommissions => {
                a.pending_commissions.cmp(&b.pending_commissions)
            }
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}
