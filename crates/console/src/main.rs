use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};

use affilia_auth::{Role, User};
use affilia_console::{ConsoleView, Snapshot};
use affilia_core::{ProductId, UserId};
use affilia_reporting::{Period, ReportFilter};

/// Operations console: load a snapshot document, derive state, print reports.
#[derive(Parser)]
#[command(name = "affilia-console", version, about)]
struct Cli {
    /// Path to the snapshot JSON document.
    #[arg(long, value_name = "FILE")]
    snapshot: PathBuf,

    /// Report period ("today", "this_week", "7d", "30d", "all", ...).
    #[arg(long, default_value = "30d", value_parser = parse_period)]
    period: Period,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Platform performance report, the admin and manager deep dive.
    Report {
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        affiliate: Option<String>,
        /// Case-insensitive Sub ID substring.
        #[arg(long, default_value = "")]
        sub_id: String,
    },
    /// Role dashboard for one account.
    Dashboard { user: String },
    /// Balance of every balance-carrying account.
    Balances,
    /// Badge counters for one account.
    Badges { user: String },
}

fn parse_period(value: &str) -> Result<Period, String> {
    serde_json::from_value(serde_json::Value::String(value.to_string()))
        .map_err(|_| format!("unknown period '{value}'"))
}

fn account<'a>(snapshot: &'a Snapshot, id: &str) -> anyhow::Result<&'a User> {
    snapshot
        .find_user(&UserId::from(id))
        .ok_or_else(|| anyhow::anyhow!("no account with id '{id}'"))
}

fn main() -> anyhow::Result<()> {
    affilia_observability::init();
    let cli = Cli::parse();

    let json = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("reading snapshot {}", cli.snapshot.display()))?;
    let snapshot = Snapshot::from_json(&json).context("parsing snapshot document")?;

    tracing::info!(
        sales = snapshot.sales.len(),
        products = snapshot.products.len(),
        transactions = snapshot.transactions.len(),
        "snapshot loaded"
    );

    let view = ConsoleView::derive(&snapshot);
    let window = cli.period.window(Utc::now().date_naive());

    let output = match cli.command {
        Command::Report {
            product,
            affiliate,
            sub_id,
        } => {
            let filter = ReportFilter {
                product_id: product.map(ProductId::from),
                affiliate_id: affiliate.map(UserId::from),
                statuses: Vec::new(),
                sub_id_query: sub_id,
            };
            serde_json::to_value(view.platform_report(&filter, &window, &Utc))?
        }
        Command::Dashboard { user } => {
            let user = account(&snapshot, &user)?;
            match user.role {
                Role::Admin | Role::Manager => {
                    serde_json::to_value(view.admin_dashboard(&window, &Utc))?
                }
                Role::Affiliate => {
                    serde_json::to_value(view.affiliate_dashboard(user, &window, &Utc))?
                }
                Role::Logistics => serde_json::to_value(view.logistics_dashboard(&window, &Utc))?,
                Role::CustomerCare => {
                    serde_json::to_value(view.customer_care_dashboard(user, &window, &Utc))?
                }
            }
        }
        Command::Balances => {
            let mut balances = serde_json::Map::new();
            for user in snapshot.users() {
                if let Some(balance) = view.balances.get(&user.id) {
                    balances.insert(user.id.to_string(), serde_json::to_value(balance)?);
                }
            }
            serde_json::Value::Object(balances)
        }
        Command::Badges { user } => {
            let user = account(&snapshot, &user)?;
            serde_json::json!({
                "balance": view.balance_of(&user.id),
                "unreadNotifications": view.unread_notifications(user),
                "assistanceBadge": view.assistance_badge(user),
                "pendingPayouts": view.pending_payouts,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
