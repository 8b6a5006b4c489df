// src/services.rs

pub mod auth;
pub mod dashboard_service;
pub mod log_service;
pub mod operation_lifecycle;
pub mod operation_service;
pub mod permissions;
pub mod registry_service;
pub mod user_service;

pub use auth::AuthService;
pub use dashboard_service::DashboardService;
pub use log_service::LogService;
pub use operation_service::OperationService;
pub use registry_service::{MaterialService, VehicleService};
pub use user_service::UserService;
