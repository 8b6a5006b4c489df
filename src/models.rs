// src/models.rs

pub mod auth;
pub mod dashboard;
pub mod logs;
pub mod operations;
pub mod rbac;
pub mod registry;
