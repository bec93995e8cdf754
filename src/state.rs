use campus_erp_config::{CorsConfig, JwtConfig};
use campus_erp_db::{PgPool, init_db_pool};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
}

pub async fn init_app_state() -> anyhow::Result<AppState> {
    Ok(AppState {
        db: init_db_pool().await?,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
    })
}
