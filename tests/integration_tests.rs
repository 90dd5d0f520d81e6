use chrono::Utc;
use httpmock::prelude::*;
use small_checkout::{
    CartState, CatalogConfig, CheckoutSession, FileCartStore, HttpCheckoutGateway, Money,
    NewCartLine, ReplayEngine, ReplayOp, SubmissionReceipt,
};
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use uuid::Uuid;

const CATALOG_TOML: &str = r#"
[catalog.base_prices]
home-regular = 15000
office = 30000

[catalog.size_multipliers]
small = 1.0
medium = 1.5

[catalog.frequency_discounts]
one-time = 1.0
weekly = 0.85

[catalog.add_on_prices]
window-cleaning = 5000

[cart]
per_vendor_fee = 500
tax_rate = 0.075

[submission]
timeout_seconds = 5
simulated_delay_ms = 1
"#;

fn line(product: &str, price: u64, quantity: u32, vendor: &str, stock: u32) -> NewCartLine {
    NewCartLine {
        product_id: product.to_string(),
        unit_price: Money::new(price),
        quantity,
        variant_key: None,
        vendor_id: vendor.to_string(),
        stock,
    }
}

#[tokio::test]
async fn test_end_to_end_quote_cart_and_http_submission() {
    // Load the catalog from an actual file
    let mut catalog_file = NamedTempFile::new().unwrap();
    catalog_file.write_all(CATALOG_TOML.as_bytes()).unwrap();
    let config = CatalogConfig::from_file(catalog_file.path()).unwrap();
    let timeout = config.timeout_seconds();

    // Fill the cart alongside the booking
    let mut session = CheckoutSession::new(config);
    session
        .cart_mut()
        .add_item(line("home-regular", 10_000, 2, "sparkle-co", 10));
    session
        .cart_mut()
        .add_item(line("office", 20_000, 1, "bright-side", 5));
    assert_eq!(session.cart().totals().grand_total, Money::new(44_000));

    // Walk the wizard
    session.wizard_mut().update_form(|form| {
        form.full_name = "Ada Lovelace".to_string();
        form.email = "ada@example.com".to_string();
        form.phone = "555-0100".to_string();
        form.preferred_date = "2025-11-03".to_string();
        form.payment_method = "card".to_string();
        form.terms_accepted = true;
    });
    let quote = session
        .set_service_details(
            "home-regular",
            "medium",
            "weekly",
            BTreeSet::from(["window-cleaning".to_string()]),
        )
        .unwrap();
    assert_eq!(quote.total, Money::new(24_125));

    session.wizard_mut().next();
    session.wizard_mut().next();
    session.wizard_mut().next();

    // Submit against a mock booking endpoint
    let server = MockServer::start();
    let receipt = SubmissionReceipt {
        booking_id: Uuid::new_v4(),
        confirmed_at: Utc::now(),
    };
    let booking_mock = server.mock(|when, then| {
        when.method(POST).path("/bookings");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::to_value(&receipt).unwrap());
    });

    let gateway = HttpCheckoutGateway::new(server.url("/bookings"), timeout);
    let confirmed = session.submit(&gateway).await.unwrap();

    booking_mock.assert();
    assert_eq!(confirmed.booking_id, receipt.booking_id);
    assert!(session.wizard().is_submitted());
}

#[tokio::test]
async fn test_replayed_cart_persists_between_runs() {
    let config = CatalogConfig::from_toml_str(CATALOG_TOML).unwrap();
    let store_dir = TempDir::new().unwrap();
    let store_path = store_dir.path().join("cart.json");

    // First visit: add two products and save
    let store = FileCartStore::new(&store_path);
    let engine = ReplayEngine::new(Some(store));
    let mut cart = CartState::new(config.cart.clone());
    let totals = engine
        .run(
            &mut cart,
            vec![
                ReplayOp::AddItem {
                    line: line("home-regular", 10_000, 2, "sparkle-co", 10),
                },
                ReplayOp::AddItem {
                    line: line("office", 20_000, 1, "bright-side", 5),
                },
            ],
        )
        .await
        .unwrap();
    assert_eq!(totals.grand_total, Money::new(44_000));
    assert!(store_path.exists());

    // Second visit: restore, drop a vendor, save again
    let store = FileCartStore::new(&store_path);
    let engine = ReplayEngine::new(Some(store));
    let mut cart = CartState::new(config.cart.clone());
    let totals = engine
        .run(
            &mut cart,
            vec![ReplayOp::RemoveItem {
                product_id: "office".to_string(),
                variant_key: None,
            }],
        )
        .await
        .unwrap();

    // one vendor left: 20 000 + 500 + 1 500
    assert_eq!(totals.subtotal, Money::new(20_000));
    assert_eq!(totals.shipping_fee, Money::new(500));
    assert_eq!(totals.grand_total, Money::new(22_000));

    // Third visit: the stored file reflects the second run
    let store = FileCartStore::new(&store_path);
    let engine = ReplayEngine::new(Some(store));
    let mut cart = CartState::new(config.cart.clone());
    let totals = engine.run(&mut cart, Vec::new()).await.unwrap();
    assert_eq!(totals.grand_total, Money::new(22_000));
    assert_eq!(cart.lines().len(), 1);
}

#[tokio::test]
async fn test_ops_file_format_replays_end_to_end() {
    let config = CatalogConfig::from_toml_str(CATALOG_TOML).unwrap();

    // the on-disk format a recorded session produces
    let ops_json = r#"[
        {"op": "add_item", "product_id": "home-regular", "unit_price": 10000,
         "quantity": 1, "vendor_id": "sparkle-co", "stock": 10},
        {"op": "update_quantity", "product_id": "home-regular", "quantity": 2},
        {"op": "apply_coupon", "code": "SAVE10", "kind": "percentage", "value": 10}
    ]"#;
    let ops: Vec<ReplayOp> = serde_json::from_str(ops_json).unwrap();

    let engine = ReplayEngine::<FileCartStore>::new(None);
    let mut cart = CartState::new(config.cart.clone());
    let totals = engine.run(&mut cart, ops).await.unwrap();

    // 20 000 subtotal, 500 shipping, 1 500 tax, 2 000 off
    assert_eq!(totals.subtotal, Money::new(20_000));
    assert_eq!(totals.discount_amount, Money::new(2_000));
    assert_eq!(totals.grand_total, Money::new(20_000));
}
