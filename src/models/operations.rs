// src/models/operations.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::registry::{Material, Vehicle};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "operation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Scheduled,
    AtGate,
    Loading,
    Unloading,
    Completed,
}

impl OperationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationStatus::Scheduled => "scheduled",
            OperationStatus::AtGate => "at_gate",
            OperationStatus::Loading => "loading",
            OperationStatus::Unloading => "unloading",
            OperationStatus::Completed => "completed",
        }
    }

    /// Carregando ou descarregando: único momento em que `progress` é exibido.
    pub fn is_in_progress(self) -> bool {
        matches!(self, OperationStatus::Loading | OperationStatus::Unloading)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "operation_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Loading,
    Unloading,
}

impl OperationType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "loading" => Some(OperationType::Loading),
            "unloading" => Some(OperationType::Unloading),
            _ => None,
        }
    }

    /// Etapa intermediária do pipeline alcançável por este tipo.
    pub fn working_status(self) -> OperationStatus {
        match self {
            OperationType::Loading => OperationStatus::Loading,
            OperationType::Unloading => OperationStatus::Unloading,
        }
    }
}

// --- Structs de Operação ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub material_id: Uuid,
    pub status: OperationStatus,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub scheduled_date: Option<DateTime<Utc>>,
    #[schema(example = "14:30")]
    pub scheduled_time: Option<String>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub destination: Option<String>,
    pub origin: Option<String>,
    #[schema(example = "Doca 3")]
    pub dock_number: Option<String>,
    #[schema(example = 45)]
    pub progress: i32,
    pub driver: String,
    pub transport_company: String,
    pub notes: Option<String>,
    /// Incrementado a cada escrita; usado como controle otimista de concorrência.
    #[schema(example = 1)]
    pub revision: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Operação com veículo e material (é o formato que as telas consomem)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationWithRelations {
    #[serde(flatten)]
    pub operation: Operation,
    pub vehicle: Vehicle,
    pub material: Material,
}

/// Operação validada, pronta para ser inserida (sempre em `scheduled`, progresso 0).
#[derive(Debug, Clone, PartialEq)]
pub struct NewOperation {
    pub vehicle_id: Uuid,
    pub material_id: Uuid,
    pub status: OperationStatus,
    pub operation_type: OperationType,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub dock_number: Option<String>,
    pub progress: i32,
    pub driver: String,
    pub transport_company: String,
    pub notes: Option<String>,
}

// ---
// Validações customizadas
// ---
pub(crate) fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("O campo não pode ser vazio.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_operation_type(value: &str) -> Result<(), ValidationError> {
    if OperationType::parse(value).is_none() {
        let mut err = ValidationError::new("operation_type");
        err.message = Some("O tipo deve ser 'loading' ou 'unloading'.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperationPayload {
    #[validate(required(message = "O veículo é obrigatório."))]
    pub vehicle_id: Option<Uuid>,

    #[validate(required(message = "O material é obrigatório."))]
    pub material_id: Option<Uuid>,

    #[serde(rename = "type")]
    #[validate(
        required(message = "O tipo da operação é obrigatório."),
        custom(function = "validate_operation_type")
    )]
    #[schema(example = "loading")]
    pub operation_type: Option<String>,

    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub dock_number: Option<String>,

    #[validate(
        required(message = "O motorista é obrigatório."),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Carlos Pereira")]
    pub driver: Option<String>,

    #[validate(
        required(message = "A transportadora é obrigatória."),
        custom(function = "validate_not_blank")
    )]
    #[schema(example = "Transportes Rápido Sul")]
    pub transport_company: Option<String>,

    pub notes: Option<String>,
}

// PUT /api/operations/{id}: só os campos presentes são aplicados
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperationPayload {
    pub vehicle_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub status: Option<OperationStatus>,
    #[serde(rename = "type")]
    pub operation_type: Option<OperationType>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub scheduled_time: Option<String>,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    pub destination: Option<String>,
    pub origin: Option<String>,
    pub dock_number: Option<String>,
    pub progress: Option<i32>,
    #[validate(custom(function = "validate_not_blank"))]
    pub driver: Option<String>,
    #[validate(custom(function = "validate_not_blank"))]
    pub transport_company: Option<String>,
    pub notes: Option<String>,
    /// Revisão lida pelo cliente; se ausente, usa a revisão lida pelo servidor.
    pub revision: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    #[schema(example = "at_gate")]
    pub status: OperationStatus,
    pub revision: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPayload {
    #[schema(example = 50)]
    pub progress: i32,
    pub revision: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OperationsQuery {
    /// Filtra pela etapa do pipeline
    pub status: Option<OperationStatus>,
}
