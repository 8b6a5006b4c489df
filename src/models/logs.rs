// src/models/logs.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "log_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    /// Nível do log de uma requisição concluída, pelo status HTTP.
    pub fn for_status(status: u16) -> Self {
        if status >= 500 {
            LogLevel::Error
        } else if status >= 400 {
            LogLevel::Warn
        } else {
            LogLevel::Info
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "log_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
    Server,
    Client,
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogSource::Server => "SERVER",
            LogSource::Client => "CLIENT",
        })
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub level: LogLevel,
    pub source: LogSource,
    pub message: String,
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    pub user_id: Option<Uuid>,
    pub request_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub stack_trace: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Contexto opcional anexado a um registro de log.
#[derive(Debug, Clone, Default)]
pub struct LogContext {
    pub user_id: Option<Uuid>,
    pub request_id: Option<String>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
    pub details: Option<Value>,
    pub stack_trace: Option<String>,
}

impl LogContext {
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

// Registro pronto para inserção
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub level: LogLevel,
    pub source: LogSource,
    pub message: String,
    pub context: LogContext,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientLogPayload {
    pub level: LogLevel,
    #[validate(length(min = 1, message = "A mensagem é obrigatória."))]
    pub message: String,
    /// Objeto JSON ou string contendo JSON serializado
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    pub stack_trace: Option<String>,
}

impl ClientLogPayload {
    /// O front antigo envia `details` já serializado; aceita os dois formatos.
    pub fn parsed_details(&self) -> Option<Value> {
        match &self.details {
            Some(Value::String(raw)) => {
                Some(serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone())))
            }
            Some(Value::Null) | None => None,
            Some(other) => Some(other.clone()),
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogsQuery {
    /// Máximo de registros (padrão 100, máximo 1000)
    pub limit: Option<i64>,
    pub level: Option<LogLevel>,
    pub source: Option<LogSource>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CleanupQuery {
    /// Remove registros mais antigos que N dias
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResponse {
    pub message: String,
    pub deleted: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientLogResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_log_level_follows_status_code() {
        assert_eq!(LogLevel::for_status(200), LogLevel::Info);
        assert_eq!(LogLevel::for_status(304), LogLevel::Info);
        assert_eq!(LogLevel::for_status(404), LogLevel::Warn);
        assert_eq!(LogLevel::for_status(503), LogLevel::Error);
    }

    #[test]
    fn client_details_accepts_serialized_json() {
        let payload: ClientLogPayload = serde_json::from_value(json!({
            "level": "error",
            "message": "Falha ao carregar operações",
            "details": "{\"page\": \"dashboard\"}"
        }))
        .unwrap();
        assert_eq!(payload.parsed_details(), Some(json!({"page": "dashboard"})));
    }

    #[test]
    fn client_details_keeps_plain_text() {
        let payload: ClientLogPayload = serde_json::from_value(json!({
            "level": "warn",
            "message": "x",
            "details": "texto solto"
        }))
        .unwrap();
        assert_eq!(payload.parsed_details(), Some(json!("texto solto")));
    }
}
