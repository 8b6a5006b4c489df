// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermManagePermissions, RequirePermission},
    },
    models::{
        auth::User,
        rbac::{Permission, PermissionInfo, UpdatePermissionsPayload, UserPermissionsResponse},
    },
};

// GET /api/permissions (Para o frontend saber o que mostrar na tela de permissões)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Catálogo de permissões", body = Vec<PermissionInfo>)
    )
)]
pub async fn list_permissions() -> Json<Vec<PermissionInfo>> {
    Json(Permission::ALL.into_iter().map(PermissionInfo::from).collect())
}

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "RBAC",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<User>),
        (status = 403, description = "Requer 'register:perms'")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManagePermissions>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list().await?;
    Ok(Json(users))
}

// GET /api/users/{id}/permissions
// Sem guard de rota: o próprio usuário sempre pode ler as suas permissões.
#[utoipa::path(
    get,
    path = "/api/users/{id}/permissions",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, body = UserPermissionsResponse),
        (status = 403, description = "Requer 'register:perms' para ler permissões de outro usuário"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user_permissions(
    State(app_state): State<AppState>,
    AuthenticatedUser(requester): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = app_state.user_service.get_permissions(&requester, id).await?;
    Ok(Json(permissions))
}

// PUT /api/users/{id}/permissions
#[utoipa::path(
    put,
    path = "/api/users/{id}/permissions",
    tag = "RBAC",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdatePermissionsPayload,
    responses(
        (status = 200, description = "Usuário com as novas permissões", body = User),
        (status = 403, description = "Requer 'register:perms'"),
        (status = 404, description = "Usuário não encontrado"),
        (status = 422, description = "Permissão fora do catálogo")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user_permissions(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermManagePermissions>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePermissionsPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state
        .user_service
        .update_permissions(id, &payload.permissions)
        .await?;
    Ok(Json(user))
}
