// src/services/operation_service.rs

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::OperationStore,
    models::operations::{
        CreateOperationPayload, Operation, OperationStatus, OperationWithRelations,
        ProgressPayload, TransitionPayload, UpdateOperationPayload,
    },
    services::operation_lifecycle::{self, TransitionPolicy},
};

/// Orquestra leitura -> regra de negócio -> escrita única (com revisão).
#[derive(Clone)]
pub struct OperationService {
    store: Arc<dyn OperationStore>,
    policy: TransitionPolicy,
}

impl OperationService {
    pub fn new(store: Arc<dyn OperationStore>, policy: TransitionPolicy) -> Self {
        Self { store, policy }
    }

    pub async fn list(
        &self,
        status: Option<OperationStatus>,
    ) -> Result<Vec<OperationWithRelations>, AppError> {
        let ops = self.store.list(status).await?;
        self.store.with_relations(ops).await
    }

    pub async fn get(&self, id: Uuid) -> Result<OperationWithRelations, AppError> {
        let op = self.load(id).await?;
        self.hydrate(op).await
    }

    pub async fn create(
        &self,
        payload: CreateOperationPayload,
    ) -> Result<OperationWithRelations, AppError> {
        let new_op = operation_lifecycle::create(payload)?;
        let op = self.store.insert(&new_op).await?;
        tracing::info!(operation_id = %op.id, "Operação criada");
        self.hydrate(op).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        patch: UpdateOperationPayload,
    ) -> Result<OperationWithRelations, AppError> {
        let current = self.load(id).await?;
        let expected = patch.revision.unwrap_or(current.revision);
        let next = operation_lifecycle::apply_update(current, patch, self.policy, Utc::now())?;
        self.persist(next, expected).await
    }

    pub async fn transition(
        &self,
        id: Uuid,
        payload: TransitionPayload,
    ) -> Result<OperationWithRelations, AppError> {
        let current = self.load(id).await?;
        let expected = payload.revision.unwrap_or(current.revision);
        let from = current.status;
        let next =
            operation_lifecycle::transition(current, payload.status, self.policy, Utc::now())?;
        tracing::info!(operation_id = %id, %from, to = %next.status, "Status da operação alterado");
        self.persist(next, expected).await
    }

    pub async fn set_progress(
        &self,
        id: Uuid,
        payload: ProgressPayload,
    ) -> Result<OperationWithRelations, AppError> {
        let current = self.load(id).await?;
        let expected = payload.revision.unwrap_or(current.revision);
        let next =
            operation_lifecycle::set_progress(current, payload.progress, self.policy, Utc::now())?;
        self.persist(next, expected).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound("Operação"));
        }
        tracing::info!(operation_id = %id, "Operação removida");
        Ok(())
    }

    // --- auxiliares ---

    async fn load(&self, id: Uuid) -> Result<Operation, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Operação"))
    }

    async fn persist(
        &self,
        op: Operation,
        expected_revision: i64,
    ) -> Result<OperationWithRelations, AppError> {
        let saved = self.store.update(&op, expected_revision).await?;
        self.hydrate(saved).await
    }

    async fn hydrate(&self, op: Operation) -> Result<OperationWithRelations, AppError> {
        self.store
            .with_relations(vec![op])
            .await?
            .pop()
            .ok_or(AppError::NotFound("Operação"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::InMemoryOperationStore, models::dashboard::OperationStats,
        services::DashboardService,
    };

    fn service(policy: TransitionPolicy) -> (OperationService, Arc<InMemoryOperationStore>) {
        let store = Arc::new(InMemoryOperationStore::default());
        (OperationService::new(store.clone(), policy), store)
    }

    fn payload(store: &InMemoryOperationStore, kind: &str) -> CreateOperationPayload {
        let (vehicle_id, material_id) = store.seed_registry();
        CreateOperationPayload {
            vehicle_id: Some(vehicle_id),
            material_id: Some(material_id),
            operation_type: Some(kind.into()),
            driver: Some("Carlos Pereira".into()),
            transport_company: Some("Rápido Sul".into()),
            dock_number: Some("Doca 1".into()),
            ..Default::default()
        }
    }

    fn to(status: OperationStatus) -> TransitionPayload {
        TransitionPayload {
            status,
            revision: None,
        }
    }

    #[tokio::test]
    async fn created_operation_round_trips_through_the_store() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let created = svc.create(payload(&store, "unloading")).await.unwrap();

        assert_eq!(created.operation.status, OperationStatus::Scheduled);
        assert_eq!(created.operation.progress, 0);
        assert_eq!(created.operation.revision, 1);
        assert_eq!(created.vehicle.id, created.operation.vehicle_id);

        let fetched = svc.get(created.operation.id).await.unwrap();
        assert_eq!(fetched.operation, created.operation);
    }

    #[tokio::test]
    async fn create_with_unknown_vehicle_is_not_found() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let mut p = payload(&store, "loading");
        p.vehicle_id = Some(Uuid::new_v4());
        assert!(matches!(svc.create(p).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn loading_operation_walks_the_pipeline() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let id = svc.create(payload(&store, "loading")).await.unwrap().operation.id;

        svc.transition(id, to(OperationStatus::AtGate)).await.unwrap();
        svc.transition(id, to(OperationStatus::Loading)).await.unwrap();
        let done = svc.transition(id, to(OperationStatus::Completed)).await.unwrap();

        assert_eq!(done.operation.status, OperationStatus::Completed);
        assert_eq!(done.operation.revision, 4);
    }

    #[tokio::test]
    async fn strict_rejects_skipping_and_leaves_the_row_untouched() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let created = svc.create(payload(&store, "loading")).await.unwrap().operation;

        let err = svc
            .transition(created.id, to(OperationStatus::Completed))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(svc.get(created.id).await.unwrap().operation, created);
    }

    #[tokio::test]
    async fn permissive_accepts_skipping() {
        let (svc, store) = service(TransitionPolicy::Permissive);
        let id = svc.create(payload(&store, "loading")).await.unwrap().operation.id;
        let done = svc.transition(id, to(OperationStatus::Completed)).await.unwrap();
        assert_eq!(done.operation.status, OperationStatus::Completed);
    }

    #[tokio::test]
    async fn concurrent_progress_writes_conflict_on_revision() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let id = svc.create(payload(&store, "loading")).await.unwrap().operation.id;
        svc.transition(id, to(OperationStatus::AtGate)).await.unwrap();
        let read = svc.transition(id, to(OperationStatus::Loading)).await.unwrap();
        let seen = read.operation.revision;

        // os dois clientes leram a mesma revisão
        let first = svc
            .set_progress(id, ProgressPayload { progress: 30, revision: Some(seen) })
            .await
            .unwrap();
        assert_eq!(first.operation.revision, seen + 1);

        let err = svc
            .set_progress(id, ProgressPayload { progress: 70, revision: Some(seen) })
            .await
            .unwrap_err();
        match err {
            AppError::Conflict { expected, actual } => {
                assert_eq!(expected, seen);
                assert_eq!(actual, seen + 1);
            }
            other => panic!("esperava conflito, veio {other:?}"),
        }
        assert_eq!(svc.get(id).await.unwrap().operation.progress, 30);
    }

    #[tokio::test]
    async fn stats_count_active_stages() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let mut ids = Vec::new();
        for _ in 0..4 {
            ids.push(svc.create(payload(&store, "loading")).await.unwrap().operation.id);
        }
        svc.transition(ids[2], to(OperationStatus::AtGate)).await.unwrap();
        svc.transition(ids[3], to(OperationStatus::AtGate)).await.unwrap();
        svc.transition(ids[3], to(OperationStatus::Loading)).await.unwrap();

        let stats = DashboardService::new(store.clone()).stats().await.unwrap();
        assert_eq!(
            stats,
            OperationStats {
                scheduled: 2,
                at_gate: 1,
                loading: 1,
                unloading: 0
            }
        );
    }

    #[tokio::test]
    async fn list_filters_by_status_newest_first() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let first = svc.create(payload(&store, "loading")).await.unwrap().operation.id;
        let second = svc.create(payload(&store, "unloading")).await.unwrap().operation.id;
        svc.transition(first, to(OperationStatus::AtGate)).await.unwrap();

        let all: Vec<Uuid> = svc.list(None).await.unwrap().iter().map(|o| o.operation.id).collect();
        assert_eq!(all, vec![second, first]);

        let at_gate = svc.list(Some(OperationStatus::AtGate)).await.unwrap();
        assert_eq!(at_gate.len(), 1);
        assert_eq!(at_gate[0].operation.id, first);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let (svc, store) = service(TransitionPolicy::Strict);
        let id = svc.create(payload(&store, "loading")).await.unwrap().operation.id;

        let patch = UpdateOperationPayload {
            destination: Some("Porto de Paranaguá".into()),
            status: Some(OperationStatus::AtGate),
            ..Default::default()
        };
        let updated = svc.update(id, patch).await.unwrap();
        assert_eq!(updated.operation.destination.as_deref(), Some("Porto de Paranaguá"));
        assert_eq!(updated.operation.status, OperationStatus::AtGate);

        svc.delete(id).await.unwrap();
        assert!(matches!(svc.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(svc.delete(id).await, Err(AppError::NotFound(_))));
    }
}
