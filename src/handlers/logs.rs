// src/handlers/logs.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        rbac::{PermLogsView, RequirePermission},
        request_log::RequestContext,
    },
    models::logs::{
        CleanupQuery, CleanupResponse, ClientLogPayload, ClientLogResponse, LogEntry, LogsQuery,
    },
};

// GET /api/logs
#[utoipa::path(
    get,
    path = "/api/logs",
    tag = "Logs",
    params(LogsQuery),
    responses(
        (status = 200, description = "Registros mais recentes primeiro", body = Vec<LogEntry>),
        (status = 403, description = "Requer 'logs:view'")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_logs(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermLogsView>,
    Query(query): Query<LogsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let logs = app_state.log_service.list(query).await?;
    Ok(Json(logs))
}

// POST /api/logs/client (público: o front registra erros mesmo sem sessão)
#[utoipa::path(
    post,
    path = "/api/logs/client",
    tag = "Logs",
    request_body = ClientLogPayload,
    responses(
        (status = 200, body = ClientLogResponse),
        (status = 400, description = "Mensagem ausente")
    )
)]
pub async fn create_client_log(
    State(app_state): State<AppState>,
    request: RequestContext,
    Json(payload): Json<ClientLogPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .log_service
        .client_log(payload, request.log_context())
        .await?;
    Ok(Json(ClientLogResponse { success: true }))
}

// DELETE /api/logs/cleanup?days=N
#[utoipa::path(
    delete,
    path = "/api/logs/cleanup",
    tag = "Logs",
    params(CleanupQuery),
    responses(
        (status = 200, body = CleanupResponse),
        (status = 400, description = "Número de dias inválido"),
        (status = 403, description = "Requer 'logs:view'")
    ),
    security(("api_jwt" = []))
)]
pub async fn cleanup_logs(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermLogsView>,
    Query(query): Query<CleanupQuery>,
) -> Result<impl IntoResponse, AppError> {
    let result = app_state.log_service.cleanup(query.days).await?;
    Ok(Json(result))
}
