// src/db/memory.rs
// OperationStore em memória para os testes dos serviços

use async_trait::async_trait;
use chrono::Utc;
use std::{collections::HashMap, sync::Mutex};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::operations_repo::{join_relations, OperationStore},
    models::{
        dashboard::OperationStats,
        operations::{NewOperation, Operation, OperationStatus, OperationWithRelations},
        registry::{Material, Vehicle, VehicleType},
    },
};

#[derive(Default)]
struct Tables {
    // ordem de inserção; `list` devolve invertido
    operations: Vec<Operation>,
    vehicles: HashMap<Uuid, Vehicle>,
    materials: HashMap<Uuid, Material>,
}

#[derive(Default)]
pub struct InMemoryOperationStore {
    tables: Mutex<Tables>,
}

impl InMemoryOperationStore {
    /// Cadastra um veículo e um material e devolve seus ids.
    pub fn seed_registry(&self) -> (Uuid, Uuid) {
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            plate: format!("TST{}", &Uuid::new_v4().simple().to_string()[..4]),
            vehicle_type: VehicleType::Truck,
            trailer_plate: None,
            capacity: Some(30),
            transport_company: Some("TransLog".into()),
            primary_driver: None,
            notes: None,
            created_at: Utc::now(),
        };
        let material = Material {
            id: Uuid::new_v4(),
            name: format!("Material {}", Uuid::new_v4()),
            category: "Granel sólido".into(),
            unit: "toneladas".into(),
            specific_weight: None,
            risk_class: None,
            description: None,
            created_at: Utc::now(),
        };
        let ids = (vehicle.id, material.id);

        let mut tables = self.tables.lock().unwrap();
        tables.vehicles.insert(vehicle.id, vehicle);
        tables.materials.insert(material.id, material);
        ids
    }
}

#[async_trait]
impl OperationStore for InMemoryOperationStore {
    async fn insert(&self, new_op: &NewOperation) -> Result<Operation, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.vehicles.contains_key(&new_op.vehicle_id)
            || !tables.materials.contains_key(&new_op.material_id)
        {
            return Err(AppError::NotFound("Veículo ou material"));
        }

        let now = Utc::now();
        let op = Operation {
            id: Uuid::new_v4(),
            vehicle_id: new_op.vehicle_id,
            material_id: new_op.material_id,
            status: new_op.status,
            operation_type: new_op.operation_type,
            scheduled_date: new_op.scheduled_date,
            scheduled_time: new_op.scheduled_time.clone(),
            actual_start_time: None,
            actual_end_time: None,
            destination: new_op.destination.clone(),
            origin: new_op.origin.clone(),
            dock_number: new_op.dock_number.clone(),
            progress: new_op.progress,
            driver: new_op.driver.clone(),
            transport_company: new_op.transport_company.clone(),
            notes: new_op.notes.clone(),
            revision: 1,
            created_at: now,
            updated_at: now,
        };
        tables.operations.push(op.clone());
        Ok(op)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Operation>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.operations.iter().find(|o| o.id == id).cloned())
    }

    async fn list(&self, status: Option<OperationStatus>) -> Result<Vec<Operation>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .operations
            .iter()
            .rev()
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect())
    }

    async fn update(&self, op: &Operation, expected_revision: i64) -> Result<Operation, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.vehicles.contains_key(&op.vehicle_id)
            || !tables.materials.contains_key(&op.material_id)
        {
            return Err(AppError::NotFound("Veículo ou material"));
        }

        let stored = tables
            .operations
            .iter_mut()
            .find(|o| o.id == op.id)
            .ok_or(AppError::NotFound("Operação"))?;
        if stored.revision != expected_revision {
            return Err(AppError::Conflict {
                expected: expected_revision,
                actual: stored.revision,
            });
        }

        let mut next = op.clone();
        next.created_at = stored.created_at;
        next.revision = expected_revision + 1;
        *stored = next.clone();
        Ok(next)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.operations.len();
        tables.operations.retain(|o| o.id != id);
        Ok(tables.operations.len() < before)
    }

    async fn count_by_status(&self) -> Result<OperationStats, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut stats = OperationStats::default();
        for op in &tables.operations {
            stats.add(op.status, 1);
        }
        Ok(stats)
    }

    async fn with_relations(
        &self,
        ops: Vec<Operation>,
    ) -> Result<Vec<OperationWithRelations>, AppError> {
        let tables = self.tables.lock().unwrap();
        join_relations(ops, &tables.vehicles, &tables.materials)
    }
}
