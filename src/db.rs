// src/db.rs

pub mod user_repo;
pub use user_repo::UserRepository;
pub mod vehicle_repo;
pub use vehicle_repo::VehicleRepository;
pub mod material_repo;
pub use material_repo::MaterialRepository;
pub mod log_repo;
pub use log_repo::LogRepository;
pub mod operations_repo;
pub use operations_repo::{OperationStore, OperationsRepository};

#[cfg(test)]
pub mod memory;
