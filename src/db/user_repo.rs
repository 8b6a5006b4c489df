// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, permissions, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, permissions, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, name, role, permissions, created_at
            FROM users
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // Primeiro login: cria o usuário. Se dois logins simultâneos disputarem o
    // mesmo e-mail, o ON CONFLICT devolve a linha já existente.
    pub async fn create_user(
        &self,
        email: &str,
        name: &str,
        role: UserRole,
        permissions: &[String],
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role, permissions)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id, email, name, role, permissions, created_at
            "#,
        )
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(permissions)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn update_permissions(
        &self,
        id: Uuid,
        permissions: &[String],
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET permissions = $2
            WHERE id = $1
            RETURNING id, email, name, role, permissions, created_at
            "#,
        )
        .bind(id)
        .bind(permissions)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
