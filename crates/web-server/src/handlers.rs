use crate::{
    AppState,
    error::{AppError, CUSTOMER_NOT_FOUND},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use core_types::{
    Client, ClientPayload, CreatedClient, CustomerTotal, MessageResponse, PendingInvoice,
    PlatformTransaction,
};
use std::sync::Arc;

type ClientId = WithRejection<Path<i32>, AppError>;
type ClientBody = WithRejection<Json<ClientPayload>, AppError>;

/// # GET /clients
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = state.store.list_clients().await?;
    Ok(Json(clients))
}

/// # GET /clients/:id_client
/// Answers 404 when the id matches no row, like the update and delete routes.
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id_client), _): ClientId,
) -> Result<Json<Client>, AppError> {
    state
        .store
        .get_client(id_client)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(CUSTOMER_NOT_FOUND.to_string()))
}

/// # POST /clients
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(payload), _): ClientBody,
) -> Result<(StatusCode, Json<CreatedClient>), AppError> {
    let fields = payload.into_fields()?;
    let id_client = state.store.create_client(&fields).await?;
    tracing::info!(id_client, "Customer created.");
    Ok((
        StatusCode::CREATED,
        Json(CreatedClient {
            message: "Customer created successfully".to_string(),
            id_client,
        }),
    ))
}

/// # PUT /clients/:id_client
/// Full replace of the five editable fields.
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id_client), _): ClientId,
    WithRejection(Json(payload), _): ClientBody,
) -> Result<Json<MessageResponse>, AppError> {
    let fields = payload.into_fields()?;
    if !state.store.update_client(id_client, &fields).await? {
        return Err(AppError::NotFound(CUSTOMER_NOT_FOUND.to_string()));
    }
    tracing::info!(id_client, "Customer updated.");
    Ok(Json(MessageResponse::new("Customer updated")))
}

/// # DELETE /clients/:id_client
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(id_client), _): ClientId,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.store.delete_client(id_client).await? {
        return Err(AppError::NotFound(CUSTOMER_NOT_FOUND.to_string()));
    }
    tracing::info!(id_client, "Customer deleted.");
    Ok(Json(MessageResponse::new("Customer deleted")))
}

/// # GET /pending_invoices
pub async fn pending_invoices(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PendingInvoice>>, AppError> {
    let invoices = state.store.pending_invoices().await?;
    Ok(Json(invoices))
}

/// # GET /total_paid_by_customer
pub async fn total_paid_by_customer(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CustomerTotal>>, AppError> {
    let totals = state.store.total_paid_by_customer().await?;
    Ok(Json(totals))
}

/// # GET /transactions_by_platform/:platform
pub async fn transactions_by_platform(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(platform), _): WithRejection<Path<String>, AppError>,
) -> Result<Json<Vec<PlatformTransaction>>, AppError> {
    let transactions = state.store.transactions_by_platform(&platform).await?;
    Ok(Json(transactions))
}

pub async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Known path, wrong verb.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed("Method not allowed".to_string())
}
