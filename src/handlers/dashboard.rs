// src/handlers/dashboard.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{PermReportView, PermStatsView, RequirePermission},
    models::{
        dashboard::{OperationStats, ReportSummary},
        operations::OperationWithRelations,
    },
};

// GET /api/stats
#[utoipa::path(
    get,
    path = "/api/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Contadores por etapa do pipeline", body = OperationStats),
        (status = 401, description = "Não autorizado"),
        (status = 403, description = "Requer 'dashboard:view' ou 'report:view'")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermStatsView>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.dashboard_service.stats().await?;
    Ok(Json(stats))
}

// GET /api/reports/summary
#[utoipa::path(
    get,
    path = "/api/reports/summary",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores da tela de relatórios", body = ReportSummary),
        (status = 403, description = "Requer 'report:view'")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_report_summary(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermReportView>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.dashboard_service.report().await?;
    Ok(Json(summary))
}

// GET /api/reports/stuck
#[utoipa::path(
    get,
    path = "/api/reports/stuck",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Operações em carga/descarga há mais de 4 horas", body = Vec<OperationWithRelations>),
        (status = 403, description = "Requer 'report:view'")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_stuck_operations(
    State(app_state): State<AppState>,
    _guard: RequirePermission<PermReportView>,
) -> Result<impl IntoResponse, AppError> {
    let stuck = app_state.dashboard_service.stuck().await?;
    Ok(Json(stuck))
}
