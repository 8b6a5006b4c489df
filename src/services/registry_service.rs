// src/services/registry_service.rs
// Cadastros de veículos e materiais

use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{MaterialRepository, VehicleRepository},
    models::registry::{
        CreateMaterialPayload, CreateVehiclePayload, Material, UpdateMaterialPayload,
        UpdateVehiclePayload, Vehicle,
    },
};

#[derive(Clone)]
pub struct VehicleService {
    repo: VehicleRepository,
}

impl VehicleService {
    pub fn new(repo: VehicleRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Vehicle>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Vehicle, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Veículo"))
    }

    pub async fn create(&self, payload: CreateVehiclePayload) -> Result<Vehicle, AppError> {
        payload.validate()?;
        let vehicle = self.repo.create(&payload).await?;
        tracing::info!(vehicle_id = %vehicle.id, plate = %vehicle.plate, "Veículo cadastrado");
        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateVehiclePayload) -> Result<Vehicle, AppError> {
        payload.validate()?;
        self.repo
            .update(id, &payload)
            .await?
            .ok_or(AppError::NotFound("Veículo"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Veículo"));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct MaterialService {
    repo: MaterialRepository,
}

impl MaterialService {
    pub fn new(repo: MaterialRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Material>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Material, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::NotFound("Material"))
    }

    pub async fn create(&self, payload: CreateMaterialPayload) -> Result<Material, AppError> {
        payload.validate()?;
        let material = self.repo.create(&payload).await?;
        tracing::info!(material_id = %material.id, name = %material.name, "Material cadastrado");
        Ok(material)
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateMaterialPayload,
    ) -> Result<Material, AppError> {
        payload.validate()?;
        self.repo
            .update(id, &payload)
            .await?
            .ok_or(AppError::NotFound("Material"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Material"));
        }
        Ok(())
    }
}
