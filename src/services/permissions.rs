// src/services/permissions.rs
//
// Avaliador de permissões. Funções puras sobre o usuário da requisição:
// nada é cacheado, o guard de autenticação recarrega o usuário a cada chamada.

use crate::models::auth::{User, UserRole};

/// `true` se o usuário tem a permissão ou é admin. Sem sessão, sempre `false`.
pub fn has_permission(user: Option<&User>, permission: impl AsRef<str>) -> bool {
    let Some(user) = user else {
        return false;
    };
    if user.role == UserRole::Admin {
        return true;
    }
    let permission = permission.as_ref();
    user.permissions.iter().any(|p| p == permission)
}

/// Pelo menos uma das permissões. Lista vazia nunca é satisfeita.
pub fn has_any<P: AsRef<str>>(user: Option<&User>, permissions: &[P]) -> bool {
    permissions.iter().any(|p| has_permission(user, p))
}

/// Todas as permissões. Lista vazia é sempre satisfeita.
pub fn has_all<P: AsRef<str>>(user: Option<&User>, permissions: &[P]) -> bool {
    permissions.iter().all(|p| has_permission(user, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rbac::Permission;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole, permissions: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            email: "teste@empresa.com".into(),
            name: "Teste".into(),
            role,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn admin_passes_every_check_regardless_of_permissions() {
        let admin = user(UserRole::Admin, &[]);
        for perm in Permission::ALL {
            assert!(has_permission(Some(&admin), perm.slug()));
        }
        assert!(has_permission(Some(&admin), "qualquer:coisa"));
    }

    #[test]
    fn unauthenticated_fails_every_check() {
        for perm in Permission::ALL {
            assert!(!has_permission(None, perm.slug()));
        }
        assert!(!has_any(None, &["dashboard:view", "report:view"]));
        assert!(!has_all(None, &["dashboard:view"]));
    }

    #[test]
    fn membership_is_checked_for_regular_users() {
        let viewer = user(UserRole::Viewer, &["dashboard:view"]);
        assert!(has_permission(Some(&viewer), "dashboard:view"));
        assert!(!has_permission(Some(&viewer), "dashboard:edit"));

        // operador não tem privilégio implícito
        let operator = user(UserRole::Operator, &[]);
        assert!(!has_permission(Some(&operator), "complete:edit"));
    }

    #[test]
    fn strings_outside_the_catalog_are_opaque() {
        let u = user(UserRole::Viewer, &["custom:flag"]);
        assert!(has_permission(Some(&u), "custom:flag"));
    }

    #[test]
    fn duplicates_are_inert() {
        let once = user(UserRole::Viewer, &["report:view"]);
        let twice = user(UserRole::Viewer, &["report:view", "report:view"]);
        for perm in Permission::ALL {
            assert_eq!(
                has_permission(Some(&once), perm.slug()),
                has_permission(Some(&twice), perm.slug())
            );
        }
    }

    #[test]
    fn any_and_all() {
        let u = user(UserRole::Operator, &["complete:view", "complete:edit"]);
        assert!(has_any(Some(&u), &["report:view", "complete:view"]));
        assert!(!has_any(Some(&u), &["report:view", "logs:view"]));
        assert!(has_all(Some(&u), &["complete:view", "complete:edit"]));
        assert!(!has_all(Some(&u), &["complete:view", "complete:delete"]));

        let empty: [&str; 0] = [];
        assert!(!has_any(Some(&u), &empty));
        assert!(has_all(Some(&u), &empty));
    }

    #[test]
    fn works_with_the_permission_enum() {
        let u = user(UserRole::Viewer, &["logs:view"]);
        assert!(has_any(Some(&u), &[Permission::LogsView, Permission::ReportView]));
        assert!(!has_all(Some(&u), &[Permission::LogsView, Permission::ReportView]));
    }
}
