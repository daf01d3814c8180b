//! `affilia-reporting` — date windows and role-scoped KPI reduction.
//!
//! Every report is a pure fold over the sale snapshot: no state, no I/O,
//! recomputed from scratch on every refresh. The window module owns the
//! period vocabulary; the dashboard module the per-role stat bundles; the
//! performance module the filtered, confirmed-versus-pending deep dive.

pub mod dashboard;
pub mod leaderboard;
pub mod performance;
pub mod rank;
pub mod window;

pub use dashboard::{
    admin_dashboard, affiliate_dashboard, customer_care_dashboard, logistics_dashboard,
    AdminDashboard, AffiliateDashboard, CustomerCareDashboard, LogisticsDashboard,
    TOP_PRODUCTS_WIDGET,
};
pub use leaderboard::{
    affiliate_rows, sort_leaderboard, AffiliateRow, LeaderboardColumn, SortDirection,
};
pub use performance::{platform_report, PlatformReport, ReportFilter, Split};
pub use rank::{product_rows, top_products, ProductRow, RankMetric};
pub use window::{DateWindow, Period};
