use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
};
use configuration::Config;
use database::{BillingStore, DbRepository};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BillingStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self { store }
    }
}

/// Builds the full router: every route, the error envelope, CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route(
            "/clients/:id_client",
            get(handlers::get_client)
                .put(handlers::update_client)
                .delete(handlers::delete_client),
        )
        .route("/pending_invoices", get(handlers::pending_invoices))
        .route(
            "/total_paid_by_customer",
            get(handlers::total_paid_by_customer),
        )
        .route(
            "/transactions_by_platform/:platform",
            get(handlers::transactions_by_platform),
        )
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
        .layer(middleware::from_fn(error::error_envelope))
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}

/// The main function to configure and run the web server.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;

    let db_pool = database::connect_lazy(&config.database)?;
    // A failed probe is logged but does not stop the server; requests will
    // keep failing with 500 until the database becomes reachable.
    match database::check_connection(&db_pool).await {
        Ok(()) => tracing::info!("Successfully connected to the database"),
        Err(e) => tracing::error!(error = %e, "Error connecting to the database"),
    }

    let app_state = Arc::new(AppState::new(Arc::new(DbRepository::new(db_pool))));
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server is ready at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
