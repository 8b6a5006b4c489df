// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Catálogo fechado de permissões usado pelas rotas e pelo cadastro de permissões.
///
/// O avaliador (`services::permissions`) trata permissões como strings opacas;
/// este enum existe para que as rotas e o payload de atualização não aceitem
/// erros de digitação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Permission {
    #[serde(rename = "dashboard:view")]
    DashboardView,
    #[serde(rename = "dashboard:edit")]
    DashboardEdit,
    #[serde(rename = "simplified:view")]
    SimplifiedView,
    #[serde(rename = "complete:view")]
    CompleteView,
    #[serde(rename = "complete:create")]
    CompleteCreate,
    #[serde(rename = "complete:edit")]
    CompleteEdit,
    #[serde(rename = "complete:delete")]
    CompleteDelete,
    #[serde(rename = "register:vehicles")]
    RegisterVehicles,
    #[serde(rename = "register:materials")]
    RegisterMaterials,
    #[serde(rename = "register:perms")]
    RegisterPerms,
    #[serde(rename = "report:view")]
    ReportView,
    #[serde(rename = "report:export")]
    ReportExport,
    #[serde(rename = "report:management")]
    ReportManagement,
    #[serde(rename = "logs:view")]
    LogsView,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::DashboardView,
        Permission::DashboardEdit,
        Permission::SimplifiedView,
        Permission::CompleteView,
        Permission::CompleteCreate,
        Permission::CompleteEdit,
        Permission::CompleteDelete,
        Permission::RegisterVehicles,
        Permission::RegisterMaterials,
        Permission::RegisterPerms,
        Permission::ReportView,
        Permission::ReportExport,
        Permission::ReportManagement,
        Permission::LogsView,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Permission::DashboardView => "dashboard:view",
            Permission::DashboardEdit => "dashboard:edit",
            Permission::SimplifiedView => "simplified:view",
            Permission::CompleteView => "complete:view",
            Permission::CompleteCreate => "complete:create",
            Permission::CompleteEdit => "complete:edit",
            Permission::CompleteDelete => "complete:delete",
            Permission::RegisterVehicles => "register:vehicles",
            Permission::RegisterMaterials => "register:materials",
            Permission::RegisterPerms => "register:perms",
            Permission::ReportView => "report:view",
            Permission::ReportExport => "report:export",
            Permission::ReportManagement => "report:management",
            Permission::LogsView => "logs:view",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Permission::DashboardView => "Visualizar Dashboard",
            Permission::DashboardEdit => "Editar Dashboard",
            Permission::SimplifiedView => "Visão Simplificada",
            Permission::CompleteView => "Visão Completa",
            Permission::CompleteCreate => "Criar na Visão Completa",
            Permission::CompleteEdit => "Editar Visão Completa",
            Permission::CompleteDelete => "Excluir na Visão Completa",
            Permission::RegisterVehicles => "Cadastro de Veículos",
            Permission::RegisterMaterials => "Cadastro de Materiais",
            Permission::RegisterPerms => "Cadastro de Permissões",
            Permission::ReportView => "Visualizar Relatório",
            Permission::ReportExport => "Exportar Relatório",
            Permission::ReportManagement => "Gerência de Relatórios",
            Permission::LogsView => "Visualizar Logs",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.slug()
    }
}

// Item do catálogo exposto em GET /api/permissions
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionInfo {
    #[schema(example = "report:view")]
    pub value: String,
    #[schema(example = "Visualizar Relatório")]
    pub label: String,
}

impl From<Permission> for PermissionInfo {
    fn from(p: Permission) -> Self {
        Self {
            value: p.slug().to_string(),
            label: p.label().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePermissionsPayload {
    #[schema(example = json!(["dashboard:view", "report:view"]))]
    pub permissions: Vec<Permission>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissionsResponse {
    pub user_id: Uuid,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_deserializes_back_to_the_same_permission() {
        for perm in Permission::ALL {
            let json = format!("\"{}\"", perm.slug());
            assert_eq!(serde_json::from_str::<Permission>(&json).unwrap(), perm);
        }
    }

    #[test]
    fn serde_uses_the_slug() {
        let json = serde_json::to_string(&Permission::RegisterPerms).unwrap();
        assert_eq!(json, "\"register:perms\"");

        let parsed: Vec<Permission> =
            serde_json::from_str(r#"["logs:view", "complete:edit"]"#).unwrap();
        assert_eq!(parsed, vec![Permission::LogsView, Permission::CompleteEdit]);
    }

    #[test]
    fn unknown_slug_is_rejected() {
        assert!(serde_json::from_str::<Permission>("\"reports:view\"").is_err());
        assert!(serde_json::from_str::<Permission>("\"admin\"").is_err());
    }
}
