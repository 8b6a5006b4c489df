// src/models/registry.rs
// Cadastros: veículos e materiais

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "vehicle_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Truck,
    Carreta,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Uuid,
    #[schema(example = "ABC1D23")]
    pub plate: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub trailer_plate: Option<String>,
    #[schema(example = 30)]
    pub capacity: Option<i32>,
    pub transport_company: Option<String>,
    pub primary_driver: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehiclePayload {
    #[validate(length(min = 1, message = "A placa é obrigatória."))]
    #[schema(example = "ABC1D23")]
    pub plate: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub trailer_plate: Option<String>,
    #[validate(range(min = 0, message = "A capacidade não pode ser negativa."))]
    pub capacity: Option<i32>,
    pub transport_company: Option<String>,
    pub primary_driver: Option<String>,
    pub notes: Option<String>,
}

// PUT parcial: só os campos presentes são alterados
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehiclePayload {
    #[validate(length(min = 1, message = "A placa não pode ser vazia."))]
    pub plate: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<VehicleType>,
    pub trailer_plate: Option<String>,
    #[validate(range(min = 0, message = "A capacidade não pode ser negativa."))]
    pub capacity: Option<i32>,
    pub transport_company: Option<String>,
    pub primary_driver: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    #[schema(example = "Minério de ferro")]
    pub name: String,
    #[schema(example = "Granel sólido")]
    pub category: String,
    #[schema(example = "toneladas")]
    pub unit: String,
    pub specific_weight: Option<i32>,
    pub risk_class: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_unit() -> String {
    "toneladas".to_string()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,
    #[serde(default = "default_unit")]
    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: String,
    pub specific_weight: Option<i32>,
    pub risk_class: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "A categoria não pode ser vazia."))]
    pub category: Option<String>,
    #[validate(length(min = 1, message = "A unidade não pode ser vazia."))]
    pub unit: Option<String>,
    pub specific_weight: Option<i32>,
    pub risk_class: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_unit_defaults_to_tonnes() {
        let payload: CreateMaterialPayload =
            serde_json::from_str(r#"{"name": "Soja", "category": "Grãos"}"#).unwrap();
        assert_eq!(payload.unit, "toneladas");
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn vehicle_payload_reads_type_field() {
        let payload: CreateVehiclePayload =
            serde_json::from_str(r#"{"plate": "XYZ9A87", "type": "carreta", "capacity": 40}"#)
                .unwrap();
        assert_eq!(payload.vehicle_type, VehicleType::Carreta);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn blank_plate_fails_validation() {
        let payload: CreateVehiclePayload =
            serde_json::from_str(r#"{"plate": "", "type": "truck"}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("plate"));
    }
}
