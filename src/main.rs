// src/main.rs

use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;

use gst_invoicing::{config::AppState, db, handlers};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // If configuration or the database is unavailable the process should
    // not come up at all.
    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    db::migrations::run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");
    tracing::info!("database schema is up to date");

    let bind_addr = app_state.bind_addr.clone();

    let app = Router::new()
        .route("/", get(handlers::invoices::dashboard))
        .route("/health", get(|| async { "OK" }))
        .route(
            "/seller",
            get(handlers::parties::list_sellers).post(handlers::parties::create_seller),
        )
        .route("/seller/{id}", delete(handlers::parties::delete_seller))
        .route(
            "/receiver",
            get(handlers::parties::list_receivers).post(handlers::parties::create_receiver),
        )
        .route("/receiver/{id}", delete(handlers::parties::delete_receiver))
        .route(
            "/product",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/product/{id}", delete(handlers::products::delete_product))
        .route("/invoice", post(handlers::invoices::create_invoice))
        .route("/pdf/{id}", get(handlers::invoices::download_pdf))
        .with_state(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("server listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("axum server error");
}
