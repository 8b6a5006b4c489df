// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

use crate::models::operations::OperationStatus;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Erro de validação de um único campo, gerado pelas regras de negócio
    #[error("Campo inválido '{field}': {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Transição inválida de '{from}' para '{to}'")]
    InvalidTransition {
        from: OperationStatus,
        to: OperationStatus,
    },

    #[error("{0} não encontrado(a)")]
    NotFound(&'static str),

    #[error("Autenticação necessária")]
    Unauthenticated,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão necessária: {0}")]
    Forbidden(String),

    #[error("Domínio de e-mail não permitido")]
    EmailDomainNotAllowed,

    #[error("Conflito de revisão: esperada {expected}, atual {actual}")]
    Conflict { expected: i64, actual: i64 },

    #[error("{0}")]
    UniqueConstraintViolation(String),

    #[error("{0}")]
    ReferenceInUse(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidField {
            field,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthenticated | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::EmailDomainNotAllowed => StatusCode::FORBIDDEN,
            AppError::Conflict { .. }
            | AppError::UniqueConstraintViolation(_)
            | AppError::ReferenceInUse(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::JwtError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Violações de chave única/estrangeira viram erros de negócio; o resto segue como DatabaseError.
pub(crate) fn map_constraint_error(
    e: sqlx::Error,
    unique_message: &str,
    foreign_key_error: impl FnOnce() -> AppError,
) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(unique_message.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return foreign_key_error();
        }
    }
    AppError::DatabaseError(e)
}

/// Detalhe de um erro interno, anexado à resposta para o log de requisições.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut report = None;
        let body = match &self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InvalidField { field, message } => {
                let mut details = serde_json::Map::new();
                details.insert(field.to_string(), json!([message]));
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InvalidTransition { from, to } => json!({
                "error": format!("Não é possível mover a operação de '{}' para '{}'.", from, to),
                "details": { "from": from, "to": to },
            }),
            AppError::NotFound(resource) => json!({ "error": format!("{} não encontrado(a).", resource) }),
            AppError::Unauthenticated => json!({ "error": "Autenticação necessária." }),
            AppError::InvalidToken => json!({ "error": "Token de autenticação inválido ou ausente." }),
            AppError::Forbidden(permission) => json!({
                "error": format!("Você precisa da permissão '{}' para realizar esta ação.", permission),
            }),
            AppError::EmailDomainNotAllowed => json!({
                "error": "Acesso negado. Email deve pertencer ao domínio da empresa.",
            }),
            AppError::Conflict { expected, actual } => json!({
                "error": "A operação foi alterada por outro usuário. Recarregue e tente novamente.",
                "details": { "expectedRevision": expected, "currentRevision": actual },
            }),
            AppError::UniqueConstraintViolation(msg) | AppError::ReferenceInUse(msg) => {
                json!({ "error": msg })
            }

            // Erros internos: o detalhe vai para o log, o cliente recebe uma mensagem genérica
            e @ (AppError::DatabaseError(_) | AppError::JwtError(_) | AppError::InternalServerError(_)) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                report = Some(ErrorReport {
                    message: e.to_string(),
                    detail: format!("{:?}", e),
                });
                json!({ "error": "Ocorreu um erro inesperado." })
            }
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(report) = report {
            response.extensions_mut().insert(report);
        }
        response
    }
}
