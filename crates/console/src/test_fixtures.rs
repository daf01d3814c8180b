//! Shared fixtures for the console tests.

use chrono::{DateTime, Utc};

use affilia_auth::{Role, User};
use affilia_catalog::Product;
use affilia_core::{Money, ProductId, SaleId, UserId};
use affilia_sales::{Address, Sale, SaleStatus};

use crate::snapshot::Snapshot;

pub fn test_time() -> DateTime<Utc> {
    "2024-06-01T12:00:00Z".parse().unwrap()
}

pub fn product(id: &str) -> Product {
    Product {
        id: ProductId::from(id),
        name: "Crema Viso".to_string(),
        price: Money::from_cents(4990),
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

pub fn delivered_sale(id: &str, affiliate: &str, commission_cents: i64) -> Sale {
    Sale {
        id: SaleId::from(id),
        product_id: ProductId::from("p1"),
        product_name: "Crema Viso".to_string(),
        affiliate_id: UserId::from(affiliate),
        affiliate_name: String::new(),
        bundle_id: None,
        variant_id: None,
        sale_amount: Money::from_cents(4990),
        commission_amount: Money::from_cents(commission_cents),
        quantity: 1,
        status: SaleStatus::Consegnato,
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

pub fn snapshot_with_users() -> Snapshot {
    Snapshot {
        products: vec![product("p1")],
        admins: vec![User::new("x1", "Root", "root@example.com", Role::Admin)],
        managers: vec![User::new("m1", "Marco", "marco@example.com", Role::Manager)],
        affiliates: vec![User::new("a1", "Anna", "anna@example.com", Role::Affiliate)],
        logistics_users: vec![User::new("l1", "Luca", "luca@example.com", Role::Logistics)],
        customer_care_users: vec![User::new(
            "c1",
            "Carla",
            "carla@example.com",
            Role::CustomerCare,
        )],
        ..Snapshot::default()
    }
}
