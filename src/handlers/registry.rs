// src/handlers/registry.rs
// Cadastros: veículos e materiais

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermMaterialsWrite, PermVehiclesWrite, RequirePermission},
    },
    models::{
        auth::MessageResponse,
        registry::{
            CreateMaterialPayload, CreateVehiclePayload, Material, UpdateMaterialPayload,
            UpdateVehiclePayload, Vehicle,
        },
    },
};

// =========================================================================
//  VEÍCULOS
// =========================================================================

// GET /api/vehicles
#[utoipa::path(
    get,
    path = "/api/vehicles",
    tag = "Registry",
    responses(
        (status = 200, description = "Veículos cadastrados (mais recentes primeiro)", body = Vec<Vehicle>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = app_state.vehicle_service.list().await?;
    Ok(Json(vehicles))
}

// GET /api/vehicles/{id}
#[utoipa::path(
    get,
    path = "/api/vehicles/{id}",
    tag = "Registry",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, body = Vehicle),
        (status = 404, description = "Veículo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_vehicle(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.get(id).await?;
    Ok(Json(vehicle))
}

// POST /api/vehicles
#[utoipa::path(
    post,
    path = "/api/vehicles",
    tag = "Registry",
    request_body = CreateVehiclePayload,
    responses(
        (status = 201, description = "Veículo cadastrado", body = Vehicle),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Requer 'register:vehicles'"),
        (status = 409, description = "Placa já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermVehiclesWrite>,
    Json(payload): Json<CreateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

// PUT /api/vehicles/{id}
#[utoipa::path(
    put,
    path = "/api/vehicles/{id}",
    tag = "Registry",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    request_body = UpdateVehiclePayload,
    responses(
        (status = 200, body = Vehicle),
        (status = 404, description = "Veículo não encontrado"),
        (status = 409, description = "Placa já cadastrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermVehiclesWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.update(id, payload).await?;
    Ok(Json(vehicle))
}

// DELETE /api/vehicles/{id}
#[utoipa::path(
    delete,
    path = "/api/vehicles/{id}",
    tag = "Registry",
    params(("id" = Uuid, Path, description = "ID do veículo")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Veículo não encontrado"),
        (status = 409, description = "Veículo em uso por operações")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermVehiclesWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.vehicle_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Veículo excluído com sucesso")))
}

// =========================================================================
//  MATERIAIS
// =========================================================================

// GET /api/materials
#[utoipa::path(
    get,
    path = "/api/materials",
    tag = "Registry",
    responses(
        (status = 200, description = "Materiais cadastrados (mais recentes primeiro)", body = Vec<Material>),
        (status = 401, description = "Não autenticado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let materials = app_state.material_service.list().await?;
    Ok(Json(materials))
}

// GET /api/materials/{id}
#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    tag = "Registry",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, body = Material),
        (status = 404, description = "Material não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_material(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let material = app_state.material_service.get(id).await?;
    Ok(Json(material))
}

// POST /api/materials
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = "Registry",
    request_body = CreateMaterialPayload,
    responses(
        (status = 201, description = "Material cadastrado", body = Material),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Requer 'register:materials'"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermMaterialsWrite>,
    Json(payload): Json<CreateMaterialPayload>,
) -> Result<impl IntoResponse, AppError> {
    let material = app_state.material_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(material)))
}

// PUT /api/materials/{id}
#[utoipa::path(
    put,
    path = "/api/materials/{id}",
    tag = "Registry",
    params(("id" = Uuid, Path, description = "ID do material")),
    request_body = UpdateMaterialPayload,
    responses(
        (status = 200, body = Material),
        (status = 404, description = "Material não encontrado"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_material(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermMaterialsWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialPayload>,
) -> Result<impl IntoResponse, AppError> {
    let material = app_state.material_service.update(id, payload).await?;
    Ok(Json(material))
}

// DELETE /api/materials/{id}
#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    tag = "Registry",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, body = MessageResponse),
        (status = 404, description = "Material não encontrado"),
        (status = 409, description = "Material em uso por operações")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_material(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermMaterialsWrite>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.material_service.delete(id).await?;
    Ok(Json(MessageResponse::new("Material excluído com sucesso")))
}
