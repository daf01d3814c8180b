//! Derived state.
//!
//! The console never trusts stored derived values: every view is rebuilt
//! from the snapshot. Duplicate flags are re-derived over the whole sale
//! set, balances come from the ledger fold, and the badges are recomputed
//! per account. After an accepted write the caller simply derives again.

use std::collections::HashMap;

use chrono::TimeZone;

use affilia_auth::User;
use affilia_catalog::is_bonus_sentinel;
use affilia_core::{Money, UserId};
use affilia_ledger::{balances, pending_payout_count};
use affilia_reporting::{
    admin_dashboard, affiliate_dashboard, customer_care_dashboard, logistics_dashboard,
    platform_report, AdminDashboard, AffiliateDashboard, CustomerCareDashboard, DateWindow,
    LogisticsDashboard, PlatformReport, ReportFilter,
};
use affilia_sales::{annotate, Sale};
use affilia_support::{assistance_badge, unread_count};

use crate::snapshot::Snapshot;

/// One snapshot's worth of derived state.
pub struct ConsoleView<'a> {
    snapshot: &'a Snapshot,
    /// The sale set with duplicate flags re-derived.
    pub sales: Vec<Sale>,
    /// Balance per balance-carrying account.
    pub balances: HashMap<UserId, Money>,
    /// Payouts awaiting settlement, the admin payments badge.
    pub pending_payouts: usize,
}

impl<'a> ConsoleView<'a> {
    /// Rebuild every derived value from the snapshot.
    pub fn derive(snapshot: &'a Snapshot) -> Self {
        let sales = annotate(&snapshot.sales);
        let users = snapshot.users();
        let balances = balances(&users, &sales, &snapshot.transactions, &snapshot.products);
        let pending_payouts = pending_payout_count(&snapshot.transactions, None);

        tracing::debug!(
            sales = sales.len(),
            accounts = balances.len(),
            pending_payouts,
            "view derived"
        );

        ConsoleView {
            snapshot,
            sales,
            balances,
            pending_payouts,
        }
    }

    /// Balance of one account; roles without a balance read as zero.
    pub fn balance_of(&self, user: &UserId) -> Money {
        self.balances.get(user).copied().unwrap_or(Money::ZERO)
    }

    /// The sale rows one account may list. Affiliates see their own orders,
    /// every other role sees the whole book. Bonus sentinel rows never show.
    pub fn visible_sales(&self, user: &User) -> Vec<&Sale> {
        self.sales
            .iter()
            .filter(|sale| !is_bonus_sentinel(&sale.product_id))
            .filter(|sale| user.role.sees_all_sales() || sale.affiliate_id == user.id)
            .collect()
    }

    pub fn unread_notifications(&self, user: &User) -> usize {
        unread_count(&self.snapshot.notifications, user)
    }

    pub fn assistance_badge(&self, user: &User) -> usize {
        assistance_badge(&self.snapshot.tickets, user)
    }

    pub fn admin_dashboard<Tz: TimeZone>(&self, window: &DateWindow, tz: &Tz) -> AdminDashboard {
        admin_dashboard(&self.sales, &self.snapshot.products, window, tz)
    }

    pub fn affiliate_dashboard<Tz: TimeZone>(
        &self,
        user: &User,
        window: &DateWindow,
        tz: &Tz,
    ) -> AffiliateDashboard {
        affiliate_dashboard(user, &self.sales, &self.snapshot.products, window, tz)
    }

    pub fn logistics_dashboard<Tz: TimeZone>(
        &self,
        window: &DateWindow,
        tz: &Tz,
    ) -> LogisticsDashboard {
        logistics_dashboard(&self.sales, &self.snapshot.products, window, tz)
    }

    pub fn customer_care_dashboard<Tz: TimeZone>(
        &self,
        user: &User,
        window: &DateWindow,
        tz: &Tz,
    ) -> CustomerCareDashboard {
        customer_care_dashboard(user, &self.sales, &self.snapshot.products, window, tz)
    }

    pub fn platform_report<Tz: TimeZone>(
        &self,
        filter: &ReportFilter,
        window: &DateWindow,
        tz: &Tz,
    ) -> PlatformReport {
        platform_report(&self.sales, &self.snapshot.products, filter, window, tz)
    }
}
