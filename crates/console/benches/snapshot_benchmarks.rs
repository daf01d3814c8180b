use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::{DateTime, Duration, Utc};

use affilia_auth::{Role, User};
use affilia_catalog::Product;
use affilia_console::{ConsoleView, Snapshot};
use affilia_core::{Money, ProductId, SaleId, UserId};
use affilia_reporting::{DateWindow, ReportFilter};
use affilia_sales::{Address, Sale, SaleStatus};

const STATUSES: &[SaleStatus] = &[
    SaleStatus::InAttesa,
    SaleStatus::Contattato,
    SaleStatus::Confermato,
    SaleStatus::Spedito,
    SaleStatus::Consegnato,
    SaleStatus::Svincolato,
    SaleStatus::Annullato,
    SaleStatus::Giacenza,
];

fn base_date() -> DateTime<Utc> {
    "2024-01-01T08:00:00Z".parse().unwrap()
}

fn product(i: usize) -> Product {
    Product {
        id: ProductId::from(format!("p{i}")),
        name: format!("Prodotto {i}"),
        price: Money::from_cents(3990 + i as i64 * 1000),
        cost_of_goods: Money::from_cents(800),
        shipping_cost: Money::from_cents(500),
        shipping_charge: Money::ZERO,
        commission_value: Money::from_cents(1200),
        fulfillment_cost: Money::from_cents(150),
        customer_care_commission: Money::from_cents(200),
        platform_fee: Money::from_cents(300),
        bundles: Vec::new(),
        variants: Vec::new(),
        stock_quantity: None,
    }
}

fn sale(i: usize) -> Sale {
    // Customer identities repeat every 40 orders, so the duplicate scan has
    // real collisions to find.
    Sale {
        id: SaleId::from(format!("s{i}")),
        product_id: ProductId::from(format!("p{}", i % 5)),
        product_name: format!("Prodotto {}", i % 5),
        affiliate_id: UserId::from(format!("a{}", i % 8)),
        affiliate_name: format!("Affiliato {}", i % 8),
        bundle_id: None,
        variant_id: None,
        sale_amount: Money::from_cents(3990 + (i % 5) as i64 * 1000),
        commission_amount: Money::from_cents(1000 + (i % 7) as i64 * 100),
        quantity: 1 + (i % 3) as u32,
        status: STATUSES[i % STATUSES.len()],
        status_updated_at: None,
        last_contacted_by: (i % 4 == 0).then(|| UserId::from("c1")),
        last_contacted_by_name: (i % 4 == 0).then(|| "Carla".to_string()),
        is_bonus: false,
        customer_name: format!("Cliente {}", i % 40),
        customer_phone: format!("333 000 {:03}", i % 40),
        customer_email: String::new(),
        address: Address::default(),
        sub_id: format!("sub-{}", i % 12),
        sale_date: base_date() + Duration::minutes(i as i64),
        tracking_code: None,
        notes: None,
        contact_history: Vec::new(),
    }
}

fn synthetic_snapshot(sales: usize) -> Snapshot {
    Snapshot {
        products: (0..5).map(product).collect(),
        admins: vec![User::new("x1", "Root", "root@example.com", Role::Admin)],
        managers: vec![User::new("m1", "Marco", "marco@example.com", Role::Manager)],
        affiliates: (0..8)
            .map(|i| {
                User::new(
                    format!("a{i}"),
                    format!("Affiliato {i}"),
                    format!("a{i}@example.com"),
                    Role::Affiliate,
                )
            })
            .collect(),
        logistics_users: vec![User::new("l1", "Luca", "luca@example.com", Role::Logistics)],
        customer_care_users: vec![User::new(
            "c1",
            "Carla",
            "carla@example.com",
            Role::CustomerCare,
        )],
        sales: (0..sales).map(sale).collect(),
        ..Snapshot::default()
    }
}

fn bench_view_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_derivation");

    for size in [100usize, 1_000, 10_000] {
        let snapshot = synthetic_snapshot(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &snapshot,
            |b, snapshot| {
                b.iter(|| ConsoleView::derive(black_box(snapshot)));
            },
        );
    }

    group.finish();
}

fn bench_platform_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("platform_report");

    for size in [100usize, 1_000, 10_000] {
        let snapshot = synthetic_snapshot(size);
        let view = ConsoleView::derive(&snapshot);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &view, |b, view| {
            b.iter(|| {
                view.platform_report(
                    black_box(&ReportFilter::default()),
                    &DateWindow::ALL,
                    &Utc,
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_view_derivation, bench_platform_report);
criterion_main!(benches);
