// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::User,
        rbac::{Permission, UserPermissionsResponse},
    },
    services::permissions::has_permission,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn get_permissions(
        &self,
        requester: &User,
        user_id: Uuid,
    ) -> Result<UserPermissionsResponse, AppError> {
        if !can_read_permissions(requester, user_id) {
            return Err(AppError::Forbidden(Permission::RegisterPerms.slug().to_string()));
        }

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;

        Ok(UserPermissionsResponse {
            user_id: user.id,
            permissions: user.permissions,
        })
    }

    /// Substitui o conjunto de permissões. Vale a partir da próxima requisição do usuário.
    pub async fn update_permissions(
        &self,
        user_id: Uuid,
        permissions: &[Permission],
    ) -> Result<User, AppError> {
        let slugs = normalize(permissions);
        let user = self
            .user_repo
            .update_permissions(user_id, &slugs)
            .await?
            .ok_or(AppError::NotFound("Usuário"))?;

        tracing::info!(user_id = %user.id, permissions = ?user.permissions, "Permissões atualizadas");
        Ok(user)
    }
}

// Qualquer usuário lê as próprias permissões; as dos outros exigem `register:perms`
pub fn can_read_permissions(requester: &User, user_id: Uuid) -> bool {
    requester.id == user_id || has_permission(Some(requester), Permission::RegisterPerms)
}

// Conjunto: remove repetições mantendo a ordem de chegada
fn normalize(permissions: &[Permission]) -> Vec<String> {
    let mut slugs: Vec<String> = Vec::with_capacity(permissions.len());
    for p in permissions {
        if !slugs.iter().any(|s| s == p.slug()) {
            slugs.push(p.slug().to_string());
        }
    }
    slugs
}
