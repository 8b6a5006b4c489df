// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::operations::validate_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Operator,
    Viewer,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    #[schema(example = "joao.silva@empresa.com")]
    pub email: String,
    #[schema(example = "João Silva")]
    pub name: String,
    pub role: UserRole,
    #[schema(example = json!(["dashboard:view", "complete:view"]))]
    pub permissions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

// Dados para login (o domínio do e-mail é validado no serviço)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "joao.silva@empresa.com")]
    pub email: String,
    #[validate(custom(function = "validate_not_blank", message = "O nome é obrigatório."))]
    #[schema(example = "João Silva")]
    pub name: String,
}

// Resposta de autenticação: usuário + token de sessão
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user: User,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Logout realizado com sucesso")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_name_must_not_be_blank() {
        let blank = LoginUserPayload {
            email: "joao.silva@empresa.com".into(),
            name: "   ".into(),
        };
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let filled = LoginUserPayload {
            email: "joao.silva@empresa.com".into(),
            name: "João Silva".into(),
        };
        assert!(filled.validate().is_ok());
    }
}
