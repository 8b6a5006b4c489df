// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Registry ---
        handlers::registry::list_vehicles,
        handlers::registry::get_vehicle,
        handlers::registry::create_vehicle,
        handlers::registry::update_vehicle,
        handlers::registry::delete_vehicle,
        handlers::registry::list_materials,
        handlers::registry::get_material,
        handlers::registry::create_material,
        handlers::registry::update_material,
        handlers::registry::delete_material,

        // --- Operations ---
        handlers::operations::list_operations,
        handlers::operations::get_operation,
        handlers::operations::create_operation,
        handlers::operations::update_operation,
        handlers::operations::transition_operation,
        handlers::operations::update_progress,
        handlers::operations::delete_operation,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_report_summary,
        handlers::dashboard::get_stuck_operations,

        // --- RBAC ---
        handlers::rbac::list_permissions,
        handlers::rbac::list_users,
        handlers::rbac::get_user_permissions,
        handlers::rbac::update_user_permissions,

        // --- Logs ---
        handlers::logs::list_logs,
        handlers::logs::create_client_log,
        handlers::logs::cleanup_logs,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::MeResponse,
            models::auth::MessageResponse,

            // --- Registry ---
            models::registry::VehicleType,
            models::registry::Vehicle,
            models::registry::CreateVehiclePayload,
            models::registry::UpdateVehiclePayload,
            models::registry::Material,
            models::registry::CreateMaterialPayload,
            models::registry::UpdateMaterialPayload,

            // --- Operations ---
            models::operations::OperationStatus,
            models::operations::OperationType,
            models::operations::Operation,
            models::operations::OperationWithRelations,
            models::operations::CreateOperationPayload,
            models::operations::UpdateOperationPayload,
            models::operations::TransitionPayload,
            models::operations::ProgressPayload,

            // --- Dashboard ---
            models::dashboard::OperationStats,
            models::dashboard::ReportSummary,
            models::dashboard::CompletedOperationEntry,

            // --- RBAC ---
            models::rbac::Permission,
            models::rbac::PermissionInfo,
            models::rbac::UpdatePermissionsPayload,
            models::rbac::UserPermissionsResponse,

            // --- Logs ---
            models::logs::LogLevel,
            models::logs::LogSource,
            models::logs::LogEntry,
            models::logs::ClientLogPayload,
            models::logs::ClientLogResponse,
            models::logs::CleanupResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Login corporativo e sessão"),
        (name = "Registry", description = "Cadastro de Veículos e Materiais"),
        (name = "Operations", description = "Operações de carga e descarga"),
        (name = "Dashboard", description = "Painel de TV e Relatórios"),
        (name = "RBAC", description = "Usuários e Permissões"),
        (name = "Logs", description = "Log da aplicação")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
