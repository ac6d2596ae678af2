#![allow(dead_code)]

use std::sync::OnceLock;

use serde_json::{json, Value};
use uuid::Uuid;

use storefront_search::search::engine::SearchEngine;
use storefront_search::search::scope::{CallerIdentity, Role};
use storefront_search::search::types::SearchRequest;
use storefront_search::store::memory::MemoryStore;

pub const CUSTOMER_A: u128 = 0xA;
pub const CUSTOMER_B: u128 = 0xB;
pub const CATEGORY_ONE: u128 = 0xC1;
pub const CATEGORY_TWO: u128 = 0xC2;

/// 25 live products (15 active, 10 draft) plus 3 soft-deleted ones.
pub const LIVE_PRODUCTS: i64 = 25;
pub const ACTIVE_PRODUCTS: i64 = 15;

/// Customer A: 12 live orders and 1 soft-deleted; customer B: 8 live orders.
pub const LIVE_ORDERS_A: i64 = 12;
pub const LIVE_ORDERS_B: i64 = 8;

static TRACING: OnceLock<()> = OnceLock::new();

fn init_tracing() {
    TRACING.get_or_init(|| {
        use tracing_subscriber::EnvFilter;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn uuid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn admin() -> CallerIdentity {
    CallerIdentity { id: uuid(0xAD), role: Role::Admin }
}

pub fn customer(n: u128) -> CallerIdentity {
    CallerIdentity { id: uuid(n), role: Role::Customer }
}

pub fn req(value: Value) -> SearchRequest {
    serde_json::from_value(value).expect("request fixture must deserialize")
}

pub fn order_status(i: i64) -> &'static str {
    match i % 3 {
        1 => "pending",
        2 => "paid",
        _ => "shipped",
    }
}

fn product_rows() -> Vec<Value> {
    let mut rows = Vec::new();
    for i in 1..=25i64 {
        let category = if i % 2 == 1 { CATEGORY_ONE } else { CATEGORY_TWO };
        rows.push(json!({
            "id": uuid(i as u128).to_string(),
            "name": format!("Widget {:02}", i),
            "description": if i % 5 == 0 { json!("A premium gadget") } else { Value::Null },
            "sku": format!("W-{:03}", i),
            "status": if i <= 15 { "active" } else { "draft" },
            "category_id": uuid(category).to_string(),
            "price": i * 10,
            // epoch millis on purpose: the mapper must canonicalize them
            "created_at": 1_700_000_000_000i64 + i * 86_400_000,
            "updated_at": Value::Null,
            "deleted_at": Value::Null,
        }));
    }
    for i in 26..=28i64 {
        rows.push(json!({
            "id": uuid(i as u128).to_string(),
            "name": format!("Widget {:02}", i),
            "description": Value::Null,
            "sku": format!("W-{:03}", i),
            "status": "active",
            "category_id": uuid(CATEGORY_ONE).to_string(),
            "price": i * 10,
            "created_at": 1_700_000_000_000i64 + i * 86_400_000,
            "updated_at": Value::Null,
            "deleted_at": 1_710_000_000_000i64,
        }));
    }
    rows
}

fn order_row(id: u128, owner: u128, day: i64, amount: i64, status: &str, deleted: bool) -> Value {
    json!({
        "id": uuid(id).to_string(),
        "customer_id": uuid(owner).to_string(),
        "status": status,
        "amount": amount,
        "currency": "USD",
        "placed_at": format!("2026-01-{:02}T10:00:00Z", day),
        "shipped_at": if status == "shipped" {
            json!(format!("2026-01-{:02}T10:00:00Z", day + 2))
        } else {
            Value::Null
        },
        "deleted_at": if deleted { json!("2026-02-01T00:00:00Z") } else { Value::Null },
    })
}

fn order_rows() -> Vec<Value> {
    let mut rows = Vec::new();
    for i in 1..=12i64 {
        rows.push(order_row(0x1000 + i as u128, CUSTOMER_A, i, i * 50, order_status(i), false));
    }
    // a cancelled order that was soft-deleted
    rows.push(order_row(0x100D, CUSTOMER_A, 21, 999, "pending", true));
    for i in 1..=8i64 {
        rows.push(order_row(0x2000 + i as u128, CUSTOMER_B, 12 + i, i * 100, order_status(i), false));
    }
    rows
}

fn customer_rows() -> Vec<Value> {
    let people = [
        (CUSTOMER_A, "alice@example.com", "Alice", "active"),
        (CUSTOMER_B, "bob@example.com", "Bob", "active"),
        (0xC, "carol@example.com", "Carol", "active"),
        (0xD, "dave@example.com", "Dave", "disabled"),
        (0xE, "erin@example.com", "Erin", "active"),
    ];
    people
        .iter()
        .enumerate()
        .map(|(i, (id, email, name, status))| {
            json!({
                "id": uuid(*id).to_string(),
                "email": email,
                "name": name,
                "status": status,
                "created_at": format!("2025-06-{:02}T08:00:00Z", i + 1),
                "updated_at": Value::Null,
                "deleted_at": Value::Null,
            })
        })
        .collect()
}

pub fn engine() -> SearchEngine<MemoryStore> {
    init_tracing();
    let store = MemoryStore::new()
        .with_collection("products", product_rows())
        .with_collection("orders", order_rows())
        .with_collection("customers", customer_rows());
    SearchEngine::new(store)
}
