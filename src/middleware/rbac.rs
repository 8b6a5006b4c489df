// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::rbac::Permission,
    services::permissions::has_any,
};

/// 1. O Trait que define o que é uma Permissão de rota.
/// Basta o usuário ter uma das permissões listadas.
pub trait PermissionDef: Send + Sync + 'static {
    fn permissions() -> &'static [Permission];
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::Unauthenticated)?;

        let required = T::permissions();
        if !has_any(Some(&user.0), required) {
            let names: Vec<&str> = required.iter().map(|p| p.slug()).collect();
            return Err(AppError::Forbidden(names.join("' ou '")));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermOperationsRead;
impl PermissionDef for PermOperationsRead {
    fn permissions() -> &'static [Permission] {
        &[
            Permission::DashboardView,
            Permission::SimplifiedView,
            Permission::CompleteView,
            Permission::ReportView,
        ]
    }
}

pub struct PermOperationsCreate;
impl PermissionDef for PermOperationsCreate {
    fn permissions() -> &'static [Permission] { &[Permission::CompleteCreate] }
}

pub struct PermOperationsEdit;
impl PermissionDef for PermOperationsEdit {
    fn permissions() -> &'static [Permission] { &[Permission::CompleteEdit] }
}

pub struct PermOperationsDelete;
impl PermissionDef for PermOperationsDelete {
    fn permissions() -> &'static [Permission] { &[Permission::CompleteDelete] }
}

pub struct PermStatsView;
impl PermissionDef for PermStatsView {
    fn permissions() -> &'static [Permission] {
        &[Permission::DashboardView, Permission::ReportView]
    }
}

pub struct PermReportView;
impl PermissionDef for PermReportView {
    fn permissions() -> &'static [Permission] { &[Permission::ReportView] }
}

pub struct PermVehiclesWrite;
impl PermissionDef for PermVehiclesWrite {
    fn permissions() -> &'static [Permission] { &[Permission::RegisterVehicles] }
}

pub struct PermMaterialsWrite;
impl PermissionDef for PermMaterialsWrite {
    fn permissions() -> &'static [Permission] { &[Permission::RegisterMaterials] }
}

pub struct PermManagePermissions;
impl PermissionDef for PermManagePermissions {
    fn permissions() -> &'static [Permission] { &[Permission::RegisterPerms] }
}

pub struct PermLogsView;
impl PermissionDef for PermLogsView {
    fn permissions() -> &'static [Permission] { &[Permission::LogsView] }
}
