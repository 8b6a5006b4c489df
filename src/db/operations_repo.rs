// src/db/operations_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    common::error::{map_constraint_error, AppError},
    models::{
        dashboard::OperationStats,
        operations::{NewOperation, Operation, OperationStatus, OperationWithRelations},
        registry::{Material, Vehicle},
    },
};

/// Persistência das operações.
///
/// `update` é um compare-and-swap pela coluna `revision`: só grava se a revisão
/// no banco ainda for `expected_revision`, e incrementa a revisão na mesma escrita.
#[async_trait]
pub trait OperationStore: Send + Sync {
    async fn insert(&self, new_op: &NewOperation) -> Result<Operation, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, AppError>;

    /// Mais recentes primeiro.
    async fn list(&self, status: Option<OperationStatus>) -> Result<Vec<Operation>, AppError>;

    async fn update(&self, op: &Operation, expected_revision: i64) -> Result<Operation, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    async fn count_by_status(&self) -> Result<OperationStats, AppError>;

    async fn with_relations(
        &self,
        ops: Vec<Operation>,
    ) -> Result<Vec<OperationWithRelations>, AppError>;
}

// Junta operações com veículo/material já carregados
pub(crate) fn join_relations(
    ops: Vec<Operation>,
    vehicles: &HashMap<Uuid, Vehicle>,
    materials: &HashMap<Uuid, Material>,
) -> Result<Vec<OperationWithRelations>, AppError> {
    ops.into_iter()
        .map(|operation| {
            let vehicle = vehicles
                .get(&operation.vehicle_id)
                .cloned()
                .ok_or(AppError::NotFound("Veículo"))?;
            let material = materials
                .get(&operation.material_id)
                .cloned()
                .ok_or(AppError::NotFound("Material"))?;
            Ok(OperationWithRelations {
                operation,
                vehicle,
                material,
            })
        })
        .collect()
}

fn missing_reference() -> AppError {
    AppError::NotFound("Veículo ou material")
}

#[derive(Clone)]
pub struct OperationsRepository {
    pool: PgPool,
}

impl OperationsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OperationStore for OperationsRepository {
    async fn insert(&self, new_op: &NewOperation) -> Result<Operation, AppError> {
        sqlx::query_as::<_, Operation>(
            r#"
            INSERT INTO operations (
                vehicle_id, material_id, status, type,
                scheduled_date, scheduled_time, destination, origin, dock_number,
                progress, driver, transport_company, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(new_op.vehicle_id)
        .bind(new_op.material_id)
        .bind(new_op.status)
        .bind(new_op.operation_type)
        .bind(new_op.scheduled_date)
        .bind(&new_op.scheduled_time)
        .bind(&new_op.destination)
        .bind(&new_op.origin)
        .bind(&new_op.dock_number)
        .bind(new_op.progress)
        .bind(&new_op.driver)
        .bind(&new_op.transport_company)
        .bind(&new_op.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "Operação duplicada.", missing_reference))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, AppError> {
        let op = sqlx::query_as::<_, Operation>("SELECT * FROM operations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(op)
    }

    async fn list(&self, status: Option<OperationStatus>) -> Result<Vec<Operation>, AppError> {
        let ops = sqlx::query_as::<_, Operation>(
            r#"
            SELECT * FROM operations
            WHERE ($1::operation_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(ops)
    }

    async fn update(&self, op: &Operation, expected_revision: i64) -> Result<Operation, AppError> {
        let updated = sqlx::query_as::<_, Operation>(
            r#"
            UPDATE operations SET
                vehicle_id = $3,
                material_id = $4,
                status = $5,
                type = $6,
                scheduled_date = $7,
                scheduled_time = $8,
                actual_start_time = $9,
                actual_end_time = $10,
                destination = $11,
                origin = $12,
                dock_number = $13,
                progress = $14,
                driver = $15,
                transport_company = $16,
                notes = $17,
                updated_at = $18,
                revision = revision + 1
            WHERE id = $1 AND revision = $2
            RETURNING *
            "#,
        )
        .bind(op.id)
        .bind(expected_revision)
        .bind(op.vehicle_id)
        .bind(op.material_id)
        .bind(op.status)
        .bind(op.operation_type)
        .bind(op.scheduled_date)
        .bind(&op.scheduled_time)
        .bind(op.actual_start_time)
        .bind(op.actual_end_time)
        .bind(&op.destination)
        .bind(&op.origin)
        .bind(&op.dock_number)
        .bind(op.progress)
        .bind(&op.driver)
        .bind(&op.transport_company)
        .bind(&op.notes)
        .bind(op.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, "Operação duplicada.", missing_reference))?;

        if let Some(updated) = updated {
            return Ok(updated);
        }

        // Nenhuma linha: a operação sumiu ou outra escrita chegou antes
        let actual: Option<i64> =
            sqlx::query_scalar("SELECT revision FROM operations WHERE id = $1")
                .bind(op.id)
                .fetch_optional(&self.pool)
                .await?;

        match actual {
            Some(actual) => Err(AppError::Conflict {
                expected: expected_revision,
                actual,
            }),
            None => Err(AppError::NotFound("Operação")),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM operations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self) -> Result<OperationStats, AppError> {
        let rows: Vec<(OperationStatus, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM operations GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let mut stats = OperationStats::default();
        for (status, count) in rows {
            stats.add(status, count);
        }
        Ok(stats)
    }

    async fn with_relations(
        &self,
        ops: Vec<Operation>,
    ) -> Result<Vec<OperationWithRelations>, AppError> {
        if ops.is_empty() {
            return Ok(Vec::new());
        }

        let vehicle_ids: Vec<Uuid> = ops.iter().map(|o| o.vehicle_id).collect();
        let material_ids: Vec<Uuid> = ops.iter().map(|o| o.material_id).collect();

        let vehicles: HashMap<Uuid, Vehicle> =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = ANY($1)")
                .bind(&vehicle_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|v| (v.id, v))
                .collect();

        let materials: HashMap<Uuid, Material> =
            sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = ANY($1)")
                .bind(&material_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect();

        join_relations(ops, &vehicles, &materials)
    }
}
