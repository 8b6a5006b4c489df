// src/services/operation_lifecycle.rs
//
// Máquina de estados da operação:
//
//   scheduled -> at_gate -> loading | unloading -> completed
//
// A etapa intermediária depende do `type` definido na criação. Todas as funções
// aqui são puras: recebem a operação e o instante atual, devolvem a operação
// alterada. Persistir é responsabilidade do `OperationService`.

use chrono::{DateTime, Duration, Utc};
use std::str::FromStr;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::operations::{
        CreateOperationPayload, NewOperation, Operation, OperationStatus, OperationType,
        UpdateOperationPayload,
    },
};

/// Tempo em carga/descarga a partir do qual a operação aparece como "travada".
pub const STUCK_THRESHOLD: Duration = Duration::hours(4);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    /// Só avança pelo pipeline; progresso apenas durante carga/descarga.
    #[default]
    Strict,
    /// Aceita qualquer status e progresso em qualquer etapa (comportamento legado).
    Permissive,
}

impl FromStr for TransitionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(TransitionPolicy::Strict),
            "permissive" => Ok(TransitionPolicy::Permissive),
            other => Err(format!("TRANSITION_POLICY inválida: '{}'", other)),
        }
    }
}

impl OperationStatus {
    /// Próxima etapa válida a partir desta, para uma operação do tipo informado.
    pub fn can_transition_to(self, next: OperationStatus, op_type: OperationType) -> bool {
        use OperationStatus::*;

        if self == next {
            return true;
        }
        match (self, next) {
            (Scheduled, AtGate) => true,
            (AtGate, working) => working == op_type.working_status(),
            (Loading | Unloading, Completed) => self == op_type.working_status(),
            _ => false,
        }
    }
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::invalid_field(field, "Campo obrigatório."))
}

/// Valida os dados de criação. A operação nasce sempre em `scheduled`, com progresso 0.
pub fn create(payload: CreateOperationPayload) -> Result<NewOperation, AppError> {
    payload.validate()?;

    let type_raw = required(payload.operation_type, "type")?;
    let operation_type = OperationType::parse(&type_raw)
        .ok_or_else(|| AppError::invalid_field("type", "O tipo deve ser 'loading' ou 'unloading'."))?;

    Ok(NewOperation {
        vehicle_id: required(payload.vehicle_id, "vehicleId")?,
        material_id: required(payload.material_id, "materialId")?,
        status: OperationStatus::Scheduled,
        operation_type,
        scheduled_date: payload.scheduled_date,
        scheduled_time: payload.scheduled_time,
        destination: payload.destination,
        origin: payload.origin,
        dock_number: payload.dock_number,
        progress: 0,
        driver: required(payload.driver, "driver")?.trim().to_string(),
        transport_company: required(payload.transport_company, "transportCompany")?
            .trim()
            .to_string(),
        notes: payload.notes,
    })
}

pub fn transition(
    mut op: Operation,
    next: OperationStatus,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<Operation, AppError> {
    if policy == TransitionPolicy::Strict
        && !op.status.can_transition_to(next, op.operation_type)
    {
        return Err(AppError::InvalidTransition {
            from: op.status,
            to: next,
        });
    }
    op.status = next;
    op.updated_at = now;
    Ok(op)
}

pub fn set_progress(
    mut op: Operation,
    value: i32,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<Operation, AppError> {
    if !(0..=100).contains(&value) {
        return Err(AppError::invalid_field(
            "progress",
            "O progresso deve estar entre 0 e 100.",
        ));
    }
    if policy == TransitionPolicy::Strict && !op.status.is_in_progress() {
        return Err(AppError::invalid_field(
            "progress",
            format!(
                "O progresso só pode ser alterado durante carga ou descarga (status atual: '{}').",
                op.status
            ),
        ));
    }
    op.progress = value;
    op.updated_at = now;
    Ok(op)
}

pub fn record_actual_start(
    mut op: Operation,
    at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Operation, AppError> {
    if let Some(end) = op.actual_end_time {
        if end < at {
            return Err(end_before_start());
        }
    }
    op.actual_start_time = Some(at);
    op.updated_at = now;
    Ok(op)
}

pub fn record_actual_end(
    mut op: Operation,
    at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Operation, AppError> {
    if let Some(start) = op.actual_start_time {
        if at < start {
            return Err(end_before_start());
        }
    }
    op.actual_end_time = Some(at);
    op.updated_at = now;
    Ok(op)
}

fn end_before_start() -> AppError {
    AppError::invalid_field(
        "actualEndTime",
        "O término real não pode ser anterior ao início real.",
    )
}

/// Edição genérica (PUT). Aplica, nesta ordem: campos livres, troca de
/// veículo/material/tipo, status, progresso e horários reais.
pub fn apply_update(
    mut op: Operation,
    patch: UpdateOperationPayload,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<Operation, AppError> {
    patch.validate()?;

    // 1. Campos livres
    if let Some(v) = patch.scheduled_date {
        op.scheduled_date = Some(v);
    }
    if let Some(v) = patch.scheduled_time {
        op.scheduled_time = Some(v);
    }
    if let Some(v) = patch.destination {
        op.destination = Some(v);
    }
    if let Some(v) = patch.origin {
        op.origin = Some(v);
    }
    if let Some(v) = patch.dock_number {
        op.dock_number = Some(v);
    }
    if let Some(v) = patch.driver {
        op.driver = v.trim().to_string();
    }
    if let Some(v) = patch.transport_company {
        op.transport_company = v.trim().to_string();
    }
    if let Some(v) = patch.notes {
        op.notes = Some(v);
    }

    // 2. Veículo, material e tipo: só enquanto a operação está agendada
    let changes_identity = patch.vehicle_id.is_some_and(|v| v != op.vehicle_id)
        || patch.material_id.is_some_and(|m| m != op.material_id)
        || patch.operation_type.is_some_and(|t| t != op.operation_type);
    if changes_identity
        && policy == TransitionPolicy::Strict
        && op.status != OperationStatus::Scheduled
    {
        return Err(AppError::invalid_field(
            "type",
            "Veículo, material e tipo só podem ser alterados enquanto a operação está agendada.",
        ));
    }
    if let Some(v) = patch.vehicle_id {
        op.vehicle_id = v;
    }
    if let Some(m) = patch.material_id {
        op.material_id = m;
    }
    if let Some(t) = patch.operation_type {
        op.operation_type = t;
    }

    // 3. Status, 4. progresso, 5. horários
    if let Some(status) = patch.status {
        op = transition(op, status, policy, now)?;
    }
    if let Some(progress) = patch.progress {
        op = set_progress(op, progress, policy, now)?;
    }
    if let Some(start) = patch.actual_start_time {
        op = record_actual_start(op, start, now)?;
    }
    if let Some(end) = patch.actual_end_time {
        op = record_actual_end(op, end, now)?;
    }

    op.updated_at = now;
    Ok(op)
}

/// Heurística de relatório: em carga/descarga há mais de 4 horas.
pub fn is_stuck(op: &Operation, now: DateTime<Utc>) -> bool {
    op.status.is_in_progress()
        && op
            .actual_start_time
            .is_some_and(|start| now - start > STUCK_THRESHOLD)
}

/// Duração real em minutos, quando início e fim estão registrados.
pub fn duration_minutes(op: &Operation) -> Option<i64> {
    match (op.actual_start_time, op.actual_end_time) {
        (Some(start), Some(end)) => Some((end - start).num_minutes()),
        _ => None,
    }
}
