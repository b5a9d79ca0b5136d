// tests/invoice_flow.rs
//
// End-to-end checks of invoice creation, atomicity and snapshot semantics
// against an in-memory SQLite database.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use gst_invoicing::{
    common::error::AppError,
    config::AppState,
    db::{
        invoice_repo::NewInvoice, migrations, InvoiceRepository, PartyRepository,
        ProductRepository,
    },
    handlers::parties::{self, CreatePartyPayload},
    models::{
        invoice::{InvoiceTotals, LineAmounts},
        party::{Party, PartyKind},
        product::Product,
    },
    services::{invoice_service::LineSubmission, InvoiceService, PdfService},
};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

struct TestEnv {
    pool: SqlitePool,
    sellers: PartyRepository,
    receivers: PartyRepository,
    products: ProductRepository,
    invoices: InvoiceRepository,
    service: InvoiceService,
}

async fn setup() -> TestEnv {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    migrations::run(&pool).await.expect("schema");

    let sellers = PartyRepository::new(pool.clone(), PartyKind::Seller);
    let receivers = PartyRepository::new(pool.clone(), PartyKind::Receiver);
    let products = ProductRepository::new(pool.clone());
    let invoices = InvoiceRepository::new(pool.clone());
    let service = InvoiceService::new(
        sellers.clone(),
        receivers.clone(),
        products.clone(),
        invoices.clone(),
    );

    TestEnv {
        pool,
        sellers,
        receivers,
        products,
        invoices,
        service,
    }
}

async fn seed_parties(env: &TestEnv, seller_state: &str, receiver_state: &str) -> (Party, Party) {
    let seller = env
        .sellers
        .create("Acme Traders", seller_state, "12 MG Road\nPune", "27ACME1234F1Z5")
        .await
        .unwrap();
    let receiver = env
        .receivers
        .create("Bharat Retail", receiver_state, "4 Brigade Road", "29BRT5678K1Z3")
        .await
        .unwrap();
    (seller, receiver)
}

async fn seed_product(env: &TestEnv, gst_rate: &str) -> Product {
    env.products
        .create("Steel Bolt", "7318", "NOS", dec(gst_rate))
        .await
        .unwrap()
}

fn line(product_id: i64, rate: &str, qty: &str, discount: &str) -> LineSubmission {
    LineSubmission {
        product_id,
        rate: dec(rate),
        qty: dec(qty),
        discount: dec(discount),
    }
}

async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn intra_state_invoice_matches_worked_example() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let invoice = env
        .service
        .create_invoice(
            Some("INV-001".to_string()),
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "1000", "2", "0")],
        )
        .await
        .unwrap();

    assert_eq!(invoice.invoice_no, "INV-001");
    assert_eq!(invoice.date, "15-07-2024");
    assert_eq!(invoice.taxable, dec("2000"));
    assert_eq!(invoice.cgst, dec("180"));
    assert_eq!(invoice.sgst, dec("180"));
    assert_eq!(invoice.igst, Decimal::ZERO);
    assert_eq!(invoice.total, dec("2360"));

    let items = env.invoices.list_items(invoice.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].taxable, dec("2000"));
    assert_eq!(items[0].cgst, dec("180"));
    assert_eq!(items[0].igst, Decimal::ZERO);
}

#[tokio::test]
async fn inter_state_invoice_carries_igst_only() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "KA").await;
    let product = seed_product(&env, "18").await;

    let invoice = env
        .service
        .create_invoice(
            None,
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "1000", "2", "0")],
        )
        .await
        .unwrap();

    assert_eq!(invoice.cgst, Decimal::ZERO);
    assert_eq!(invoice.sgst, Decimal::ZERO);
    assert_eq!(invoice.igst, dec("360"));
    assert_eq!(invoice.total, dec("2360"));

    for item in env.invoices.list_items(invoice.id).await.unwrap() {
        assert_eq!(item.cgst, Decimal::ZERO);
        assert_eq!(item.sgst, Decimal::ZERO);
    }
}

#[tokio::test]
async fn auto_invoice_numbers_get_the_prefix() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let invoice = env
        .service
        .create_invoice(
            Some("   ".to_string()),
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "10", "1", "0")],
        )
        .await
        .unwrap();

    assert!(invoice.invoice_no.starts_with("AUTO-"));
}

#[tokio::test]
async fn empty_rows_are_not_persisted_and_do_not_count() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let invoice = env
        .service
        .create_invoice(
            None,
            "2024-07-15",
            seller.id,
            receiver.id,
            &[
                line(product.id, "1000", "2", "0"),
                line(product.id, "500", "0", "0"),
                // An empty row may carry a bogus product id; it must be
                // skipped before any lookup.
                line(9999, "0", "0", "0"),
            ],
        )
        .await
        .unwrap();

    let items = env.invoices.list_items(invoice.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(invoice.taxable, dec("2000"));
    assert_eq!(invoice.total, dec("2360"));
}

#[tokio::test]
async fn unknown_product_aborts_with_no_partial_writes() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let err = env
        .service
        .create_invoice(
            None,
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "1000", "2", "0"), line(4242, "50", "1", "0")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound("product")));
    assert_eq!(count(&env.pool, "invoices").await, 0);
    assert_eq!(count(&env.pool, "invoice_items").await, 0);
}

#[tokio::test]
async fn uncommitted_invoice_transaction_leaves_no_rows() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let totals = InvoiceTotals {
        taxable: dec("2000"),
        cgst: dec("180"),
        sgst: dec("180"),
        igst: Decimal::ZERO,
        total: dec("2360"),
    };
    let amounts = LineAmounts {
        product_id: product.id,
        rate: dec("1000"),
        qty: dec("2"),
        discount: Decimal::ZERO,
        taxable: dec("2000"),
        cgst: dec("180"),
        sgst: dec("180"),
        igst: Decimal::ZERO,
    };

    // Simulate a failure after the header and one item were written:
    // the transaction is dropped instead of committed.
    {
        let mut tx = env.pool.begin().await.unwrap();
        let header = NewInvoice {
            invoice_no: "DOOMED-1",
            date: "15-07-2024",
            seller_id: seller.id,
            receiver_id: receiver.id,
            totals: &totals,
        };
        let invoice = InvoiceRepository::insert_header(&mut *tx, &header)
            .await
            .unwrap();
        InvoiceRepository::insert_item(&mut *tx, invoice.id, &amounts)
            .await
            .unwrap();
        drop(tx);
    }

    assert_eq!(count(&env.pool, "invoices").await, 0);
    assert_eq!(count(&env.pool, "invoice_items").await, 0);
}

#[tokio::test]
async fn negative_taxable_is_rejected_before_any_write() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let err = env
        .service
        .create_invoice(
            None,
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "100", "1", "150")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
    assert_eq!(count(&env.pool, "invoices").await, 0);
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let err = env
        .service
        .create_invoice(
            None,
            "15/07/2024",
            seller.id,
            receiver.id,
            &[line(product.id, "10", "1", "0")],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest(_)));
}

#[tokio::test]
async fn header_totals_equal_the_sum_over_items() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "KA").await;
    let bolts = seed_product(&env, "18").await;
    let paint = env
        .products
        .create("Enamel Paint", "3208", "LTR", dec("28"))
        .await
        .unwrap();

    let invoice = env
        .service
        .create_invoice(
            None,
            "2024-07-15",
            seller.id,
            receiver.id,
            &[
                line(bolts.id, "12.50", "40", "25"),
                line(paint.id, "320", "3", "0"),
            ],
        )
        .await
        .unwrap();

    let items = env.invoices.list_items(invoice.id).await.unwrap();
    let sum: Decimal = items
        .iter()
        .map(|i| i.taxable + i.cgst + i.sgst + i.igst)
        .sum();
    assert_eq!(invoice.total, sum);
    assert_eq!(
        invoice.total,
        invoice.taxable + invoice.cgst + invoice.sgst + invoice.igst
    );
}

#[tokio::test]
async fn deleting_referenced_records_keeps_the_invoice_snapshot() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let created = env
        .service
        .create_invoice(
            Some("INV-SNAP".to_string()),
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "1000", "2", "0")],
        )
        .await
        .unwrap();

    env.products.delete(product.id).await.unwrap();
    env.receivers.delete(receiver.id).await.unwrap();

    let reloaded = env.invoices.find(created.id).await.unwrap();
    assert_eq!(reloaded.taxable, created.taxable);
    assert_eq!(reloaded.cgst, created.cgst);
    assert_eq!(reloaded.total, created.total);

    let items = env.invoices.list_items(created.id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].product_id, product.id);
    assert_eq!(items[0].taxable, dec("2000"));
}

#[tokio::test]
async fn document_totals_come_from_the_header_not_the_items() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let invoice = env
        .service
        .create_invoice(
            None,
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "1000", "2", "0")],
        )
        .await
        .unwrap();

    // Corrupt an item row behind the system's back; the document must still
    // report the header values.
    sqlx::query("UPDATE invoice_items SET cgst = '999' WHERE invoice_id = ?")
        .bind(invoice.id)
        .execute(&env.pool)
        .await
        .unwrap();

    let document = env.invoices.find_document(invoice.id).await.unwrap();
    assert_eq!(document.invoice.cgst, dec("180"));
    assert_eq!(document.invoice.total, dec("2360"));
    assert_eq!(document.seller.name, "Acme Traders");
    assert_eq!(document.items.len(), 1);
    assert_eq!(document.items[0].gst_rate, dec("18"));
}

#[tokio::test]
async fn document_for_an_orphaned_invoice_is_a_render_error() {
    let env = setup().await;
    let (seller, receiver) = seed_parties(&env, "MH", "MH").await;
    let product = seed_product(&env, "18").await;

    let invoice = env
        .service
        .create_invoice(
            None,
            "2024-07-15",
            seller.id,
            receiver.id,
            &[line(product.id, "1000", "2", "0")],
        )
        .await
        .unwrap();

    env.products.delete(product.id).await.unwrap();

    let err = env.invoices.find_document(invoice.id).await.unwrap_err();
    assert!(matches!(err, AppError::Render(_)));
}

fn app_state(env: &TestEnv) -> AppState {
    AppState {
        db_pool: env.pool.clone(),
        bind_addr: String::new(),
        sellers: env.sellers.clone(),
        receivers: env.receivers.clone(),
        products: env.products.clone(),
        invoice_service: env.service.clone(),
        pdf_service: PdfService::new(
            env.invoices.clone(),
            "fonts".into(),
            "Roboto".to_string(),
            "invoices".into(),
        ),
    }
}

// The seller and receiver handlers share one helper; this drives both
// through their axum signatures end to end.
#[tokio::test]
async fn party_handlers_create_and_delete() {
    let env = setup().await;
    let state = app_state(&env);

    let payload = CreatePartyPayload {
        name: "Acme Traders".to_string(),
        state: "MH".to_string(),
        address: String::new(),
        gstin: String::new(),
    };
    let response = parties::create_seller(State(state.clone()), Json(payload))
        .await
        .unwrap()
        .into_response();
    assert_eq!(response.status(), StatusCode::CREATED);

    let payload = CreatePartyPayload {
        name: "Bharat Retail".to_string(),
        state: "KA".to_string(),
        address: String::new(),
        gstin: String::new(),
    };
    let response = parties::create_receiver(State(state.clone()), Json(payload))
        .await
        .unwrap()
        .into_response();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(env.receivers.list().await.unwrap().len(), 1);

    let seller_id = env.sellers.list().await.unwrap()[0].id;
    let response = parties::delete_seller(State(state), Path(seller_id))
        .await
        .unwrap()
        .into_response();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(env.sellers.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_invoice_is_not_found() {
    let env = setup().await;
    let err = env.invoices.find(123).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("invoice")));
}
