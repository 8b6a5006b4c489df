// src/db/vehicle_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_constraint_error, AppError},
    models::registry::{CreateVehiclePayload, UpdateVehiclePayload, Vehicle},
};

const DUPLICATE_PLATE: &str = "Já existe um veículo com esta placa.";

fn vehicle_in_use() -> AppError {
    AppError::ReferenceInUse("O veículo possui operações vinculadas e não pode ser removido.".into())
}

#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(vehicles)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    pub async fn create(&self, payload: &CreateVehiclePayload) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                plate, type, trailer_plate, capacity, transport_company, primary_driver, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(payload.plate.trim())
        .bind(payload.vehicle_type)
        .bind(&payload.trailer_plate)
        .bind(payload.capacity)
        .bind(&payload.transport_company)
        .bind(&payload.primary_driver)
        .bind(&payload.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_PLATE, vehicle_in_use))
    }

    // Campos ausentes mantêm o valor atual (COALESCE)
    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateVehiclePayload,
    ) -> Result<Option<Vehicle>, AppError> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                plate = COALESCE($2, plate),
                type = COALESCE($3, type),
                trailer_plate = COALESCE($4, trailer_plate),
                capacity = COALESCE($5, capacity),
                transport_company = COALESCE($6, transport_company),
                primary_driver = COALESCE($7, primary_driver),
                notes = COALESCE($8, notes)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.plate.as_deref().map(str::trim))
        .bind(payload.vehicle_type)
        .bind(&payload.trailer_plate)
        .bind(payload.capacity)
        .bind(&payload.transport_company)
        .bind(&payload.primary_driver)
        .bind(&payload.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_PLATE, vehicle_in_use))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, DUPLICATE_PLATE, vehicle_in_use))?;
        Ok(result.rows_affected() > 0)
    }
}
