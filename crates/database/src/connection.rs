use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

/// Translates the configured settings into driver connection options.
///
/// A configured `url` takes precedence over the discrete host/port/name fields.
pub fn connect_options(settings: &DatabaseSettings) -> Result<PgConnectOptions, DbError> {
    match &settings.url {
        Some(url) => PgConnectOptions::from_str(url)
            .map_err(|e| DbError::ConnectionConfigError(e.to_string())),
        None => Ok(PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.name)
            .username(&settings.user)
            .password(&settings.password)),
    }
}

/// Creates the shared connection pool without opening a connection yet.
///
/// Connections are established on first use, so the server can start while
/// the database is still unreachable. Must be called inside a tokio runtime.
pub fn connect_lazy(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let options = connect_options(settings)?;
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect_lazy_with(options);
    Ok(pool)
}

/// Acquires one connection and runs a trivial query on it.
pub async fn check_connection(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
