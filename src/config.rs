// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, str::FromStr, sync::Arc, time::Duration};

use crate::{
    db::{LogRepository, MaterialRepository, OperationsRepository, UserRepository, VehicleRepository},
    services::{
        operation_lifecycle::TransitionPolicy, AuthService, DashboardService, LogService,
        MaterialService, OperationService, UserService, VehicleService,
    },
};

// --- Configuração (variáveis de ambiente / .env) ---

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub company_domain: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub session_ttl_hours: i64,
    pub log_retention_days: i64,
    pub transition_policy: TransitionPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            company_domain: env::var("COMPANY_DOMAIN").unwrap_or_else(|_| "empresa.com".into()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", 24)?,
            log_retention_days: parse_var("LOG_RETENTION_DAYS", 30)?,
            transition_policy: parse_var("TRANSITION_POLICY", TransitionPolicy::Strict)?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| anyhow::anyhow!("Valor inválido para {}: {}", name, e)),
        Err(_) => Ok(default),
    }
}

// --- Estado compartilhado ---

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub vehicle_service: VehicleService,
    pub material_service: MaterialService,
    pub operation_service: OperationService,
    pub dashboard_service: DashboardService,
    pub log_service: LogService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, config))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let operation_store = Arc::new(OperationsRepository::new(db_pool.clone()));

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            config.company_domain.clone(),
            chrono::Duration::hours(config.session_ttl_hours),
        );

        Self {
            user_service: UserService::new(user_repo),
            vehicle_service: VehicleService::new(VehicleRepository::new(db_pool.clone())),
            material_service: MaterialService::new(MaterialRepository::new(db_pool.clone())),
            operation_service: OperationService::new(
                operation_store.clone(),
                config.transition_policy,
            ),
            dashboard_service: DashboardService::new(operation_store),
            log_service: LogService::new(
                LogRepository::new(db_pool.clone()),
                config.log_retention_days,
            ),
            auth_service,
            config: Arc::new(config),
            db_pool,
        }
    }
}
