// src/db/material_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{map_constraint_error, AppError},
    models::registry::{CreateMaterialPayload, Material, UpdateMaterialPayload},
};

const DUPLICATE_NAME: &str = "Já existe um material com este nome.";

fn material_in_use() -> AppError {
    AppError::ReferenceInUse("O material possui operações vinculadas e não pode ser removido.".into())
}

#[derive(Clone)]
pub struct MaterialRepository {
    pool: PgPool,
}

impl MaterialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Material>, AppError> {
        let materials =
            sqlx::query_as::<_, Material>("SELECT * FROM materials ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(materials)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Material>, AppError> {
        let material = sqlx::query_as::<_, Material>("SELECT * FROM materials WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(material)
    }

    pub async fn create(&self, payload: &CreateMaterialPayload) -> Result<Material, AppError> {
        sqlx::query_as::<_, Material>(
            r#"
            INSERT INTO materials (name, category, unit, specific_weight, risk_class, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.name.trim())
        .bind(payload.category.trim())
        .bind(payload.unit.trim())
        .bind(payload.specific_weight)
        .bind(&payload.risk_class)
        .bind(&payload.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_NAME, material_in_use))
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: &UpdateMaterialPayload,
    ) -> Result<Option<Material>, AppError> {
        sqlx::query_as::<_, Material>(
            r#"
            UPDATE materials SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                unit = COALESCE($4, unit),
                specific_weight = COALESCE($5, specific_weight),
                risk_class = COALESCE($6, risk_class),
                description = COALESCE($7, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(payload.name.as_deref().map(str::trim))
        .bind(payload.category.as_deref().map(str::trim))
        .bind(payload.unit.as_deref().map(str::trim))
        .bind(payload.specific_weight)
        .bind(&payload.risk_class)
        .bind(&payload.description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_error(e, DUPLICATE_NAME, material_in_use))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_constraint_error(e, DUPLICATE_NAME, material_in_use))?;
        Ok(result.rows_affected() > 0)
    }
}
