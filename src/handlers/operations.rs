// src/handlers/operations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{
        PermOperationsCreate, PermOperationsDelete, PermOperationsEdit, PermOperationsRead,
        RequirePermission,
    },
    models::{
        auth::MessageResponse,
        operations::{
            CreateOperationPayload, OperationWithRelations, OperationsQuery, ProgressPayload,
            TransitionPayload, UpdateOperationPayload,
        },
    },
};

// GET /api/operations
#[utoipa::path(
    get,
    path = "/api/operations",
    tag = "Operations",
    params(OperationsQuery),
    responses(
        (status = 200, description = "Operações com veículo e material (mais recentes primeiro)", body = Vec<OperationWithRelations>),
        (status = 401, description = "Não autenticado"),
        (status = 403, description = "Sem acesso às telas de operações")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_operations(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOperationsRead>,
    Query(query): Query<OperationsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let operations = app_state.operation_service.list(query.status).await?;
    Ok(Json(operations))
}

// GET /api/operations/{id}
#[utoipa::path(
    get,
    path = "/api/operations/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    responses(
        (status = 200, body = OperationWithRelations),
        (status = 404, description = "Operação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_operation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOperationsRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let operation = app_state.operation_service.get(id).await?;
    Ok(Json(operation))
}

// POST /api/operations
#[utoipa::path(
    post,
    path = "/api/operations",
    tag = "Operations",
    request_body = CreateOperationPayload,
    responses(
        (status = 201, description = "Operação agendada", body = OperationWithRelations),
        (status = 400, description = "Campos obrigatórios ausentes ou inválidos"),
        (status = 404, description = "Veículo ou material inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_operation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOperationsCreate>,
    Json(payload): Json<CreateOperationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let operation = app_state.operation_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(operation)))
}

// PUT /api/operations/{id}
#[utoipa::path(
    put,
    path = "/api/operations/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    request_body = UpdateOperationPayload,
    responses(
        (status = 200, body = OperationWithRelations),
        (status = 400, description = "Campo inválido"),
        (status = 404, description = "Operação não encontrada"),
        (status = 409, description = "Revisão desatualizada"),
        (status = 422, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_operation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOperationsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOperationPayload>,
) -> Result<impl IntoResponse, AppError> {
    let operation = app_state.operation_service.update(id, payload).await?;
    Ok(Json(operation))
}

// POST /api/operations/{id}/transition
#[utoipa::path(
    post,
    path = "/api/operations/{id}/transition",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    request_body = TransitionPayload,
    responses(
        (status = 200, body = OperationWithRelations),
        (status = 404, description = "Operação não encontrada"),
        (status = 409, description = "Revisão desatualizada"),
        (status = 422, description = "Transição de status inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_operation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOperationsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse, AppError> {
    let operation = app_state.operation_service.transition(id, payload).await?;
    Ok(Json(operation))
}

// PUT /api/operations/{id}/progress
#[utoipa::path(
    put,
    path = "/api/operations/{id}/progress",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    request_body = ProgressPayload,
    responses(
        (status = 200, body = OperationWithRelations),
        (status = 400, description = "Progresso fora de 0-100 ou fora da etapa de carga/descarga"),
        (status = 404, description = "Operação não encontrada"),
        (status = 409, description = "Revisão desatualizada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_progress(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOperationsEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProgressPayload>,
) -> Result<impl IntoResponse, AppError> {
    let operation = app_state.operation_service.set_progress(id, payload).await?;
    Ok(Json(operation))
}

// DELETE /api/operations/{id}
#[utoipa::path(
    delete,
    path = "/api/operations/{id}",
    tag = "Operations",
    params(("id" = Uuid, Path, description = "ID da operação")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Operação não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_operation(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermOperationsDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.operation_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Operação excluída com sucesso")))
}
