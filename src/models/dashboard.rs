// src/models/dashboard.rs

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::operations::{OperationStatus, OperationWithRelations};

// 1. Contadores do painel de TV (uma entrada por etapa ativa)
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperationStats {
    pub scheduled: i64,
    pub at_gate: i64,
    pub loading: i64,
    pub unloading: i64,
}

impl OperationStats {
    /// Soma `count` na etapa correspondente; `completed` não entra no painel.
    pub fn add(&mut self, status: OperationStatus, count: i64) {
        match status {
            OperationStatus::Scheduled => self.scheduled += count,
            OperationStatus::AtGate => self.at_gate += count,
            OperationStatus::Loading => self.loading += count,
            OperationStatus::Unloading => self.unloading += count,
            OperationStatus::Completed => {}
        }
    }
}

// 2. Resumo da tela de relatórios
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub stats: OperationStats,
    /// Operações encerradas hoje (pela data de término real)
    pub completed_today: i64,
    /// Operações "travadas": carregando/descarregando há mais de 4 horas
    pub active_issues: i64,
    /// Média em minutos das operações concluídas com início e fim registrados
    pub average_duration_minutes: Option<i64>,
    pub recent_completed: Vec<CompletedOperationEntry>,
}

// 3. Linha da tabela de operações concluídas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOperationEntry {
    #[serde(flatten)]
    pub operation: OperationWithRelations,
    pub duration_minutes: Option<i64>,
}
