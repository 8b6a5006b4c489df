// src/services/dashboard_service.rs

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::OperationStore,
    models::{
        dashboard::{CompletedOperationEntry, OperationStats, ReportSummary},
        operations::{Operation, OperationStatus, OperationWithRelations},
    },
    services::operation_lifecycle::{duration_minutes, is_stuck},
};

const RECENT_COMPLETED_LIMIT: usize = 10;

#[derive(Clone)]
pub struct DashboardService {
    store: Arc<dyn OperationStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn OperationStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self) -> Result<OperationStats, AppError> {
        self.store.count_by_status().await
    }

    /// Operações em carga/descarga há mais de 4 horas.
    pub async fn stuck(&self) -> Result<Vec<OperationWithRelations>, AppError> {
        let now = Utc::now();
        let ops: Vec<Operation> = self
            .store
            .list(None)
            .await?
            .into_iter()
            .filter(|op| is_stuck(op, now))
            .collect();
        self.store.with_relations(ops).await
    }

    pub async fn report(&self) -> Result<ReportSummary, AppError> {
        let stats = self.store.count_by_status().await?;
        let ops = self.store.list(None).await?;
        let mut summary = summarize(&ops, Utc::now());

        let recent = recent_completed(ops);
        let recent = self.store.with_relations(recent).await?;
        summary.stats = stats;
        summary.recent_completed = recent
            .into_iter()
            .map(|operation| CompletedOperationEntry {
                duration_minutes: duration_minutes(&operation.operation),
                operation,
            })
            .collect();
        Ok(summary)
    }
}

// Indicadores que não dependem das relações
fn summarize(ops: &[Operation], now: DateTime<Utc>) -> ReportSummary {
    let today = now.date_naive();

    let completed_today = ops
        .iter()
        .filter(|op| op.actual_end_time.is_some_and(|end| end.date_naive() == today))
        .count() as i64;

    let active_issues = ops.iter().filter(|op| is_stuck(op, now)).count() as i64;

    let durations: Vec<i64> = ops
        .iter()
        .filter(|op| op.status == OperationStatus::Completed)
        .filter_map(duration_minutes)
        .collect();
    let average_duration_minutes = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<i64>() / durations.len() as i64)
    };

    ReportSummary {
        stats: OperationStats::default(),
        completed_today,
        active_issues,
        average_duration_minutes,
        recent_completed: Vec::new(),
    }
}

fn recent_completed(ops: Vec<Operation>) -> Vec<Operation> {
    let mut completed: Vec<Operation> = ops
        .into_iter()
        .filter(|op| op.status == OperationStatus::Completed)
        .collect();
    completed.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    completed.truncate(RECENT_COMPLETED_LIMIT);
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::InMemoryOperationStore,
        models::operations::{OperationType, UpdateOperationPayload},
        services::{
            operation_lifecycle::{tests::scheduled_operation, TransitionPolicy},
            operation_service::OperationService,
        },
    };
    use chrono::Duration;

    #[test]
    fn summary_counts_today_stuck_and_average() {
        let now = Utc::now();

        let mut done_a = scheduled_operation(OperationType::Loading);
        done_a.status = OperationStatus::Completed;
        done_a.actual_start_time = Some(now - Duration::minutes(90));
        done_a.actual_end_time = Some(now);

        let mut done_b = scheduled_operation(OperationType::Unloading);
        done_b.status = OperationStatus::Completed;
        done_b.actual_start_time = Some(now - Duration::days(2) - Duration::minutes(30));
        done_b.actual_end_time = Some(now - Duration::days(2));

        let mut stuck = scheduled_operation(OperationType::Unloading);
        stuck.status = OperationStatus::Unloading;
        stuck.actual_start_time = Some(now - Duration::hours(5));

        let waiting = scheduled_operation(OperationType::Loading);

        let summary = summarize(&[done_a, done_b, stuck, waiting], now);
        assert_eq!(summary.completed_today, 1);
        assert_eq!(summary.active_issues, 1);
        assert_eq!(summary.average_duration_minutes, Some(60));
    }

    #[test]
    fn summary_without_completed_operations_has_no_average() {
        let summary = summarize(&[scheduled_operation(OperationType::Loading)], Utc::now());
        assert_eq!(summary.average_duration_minutes, None);
        assert_eq!(summary.completed_today, 0);
    }

    #[test]
    fn recent_completed_is_capped_and_sorted() {
        let now = Utc::now();
        let ops: Vec<Operation> = (0..12)
            .map(|i| {
                let mut op = scheduled_operation(OperationType::Loading);
                op.status = OperationStatus::Completed;
                op.updated_at = now - Duration::minutes(i);
                op
            })
            .collect();
        let newest = ops[0].id;

        let recent = recent_completed(ops);
        assert_eq!(recent.len(), RECENT_COMPLETED_LIMIT);
        assert_eq!(recent[0].id, newest);
    }

    #[tokio::test]
    async fn stuck_lists_long_running_operations() {
        let store = Arc::new(InMemoryOperationStore::default());
        let ops = OperationService::new(store.clone(), TransitionPolicy::Strict);
        let dashboard = DashboardService::new(store.clone());

        let (vehicle_id, material_id) = store.seed_registry();
        let created = ops
            .create(crate::models::operations::CreateOperationPayload {
                vehicle_id: Some(vehicle_id),
                material_id: Some(material_id),
                operation_type: Some("loading".into()),
                driver: Some("Ana".into()),
                transport_company: Some("TransLog".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let id = created.operation.id;

        let patch = UpdateOperationPayload {
            status: Some(OperationStatus::AtGate),
            ..Default::default()
        };
        ops.update(id, patch).await.unwrap();
        let patch = UpdateOperationPayload {
            status: Some(OperationStatus::Loading),
            actual_start_time: Some(Utc::now() - Duration::hours(6)),
            ..Default::default()
        };
        ops.update(id, patch).await.unwrap();

        let stuck = dashboard.stuck().await.unwrap();
        assert_eq!(stuck.len(), 1);
        assert_eq!(stuck[0].operation.id, id);

        let report = dashboard.report().await.unwrap();
        assert_eq!(report.active_issues, 1);
        assert_eq!(report.stats.loading, 1);
    }
}
