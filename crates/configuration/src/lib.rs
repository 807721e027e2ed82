use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    ClientSettings, Config, DatabaseSettings, LogLevel, LoggingSettings, ServerSettings,
};

/// Looked up in the working directory when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "billdesk.toml";

/// Variables the deployment has always set for the database connection.
const LEGACY_DB_VARS: [(&str, &str); 5] = [
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_NAME", "database.name"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
];

/// Loads the application configuration.
///
/// Sources, later ones winning: built-in defaults, the TOML file (`path`, or
/// an optional `billdesk.toml`), `BILLDESK__SECTION__KEY` variables, then the
/// `DB_*` variables and `DATABASE_URL`. A `.env` file is read first.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let file = match path {
        Some(path) => File::from(path).required(true),
        None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = defaults()?.add_source(file).add_source(
        Environment::with_prefix("BILLDESK")
            .separator("__")
            .try_parsing(true),
    );
    let builder = apply_deployment_env(builder, |key| std::env::var(key).ok())?;

    finish(builder)
}

/// A builder pre-seeded with every default value.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000_i64)?
        .set_default("database.host", "localhost")?
        .set_default("database.port", 5432_i64)?
        .set_default("database.name", "billing")?
        .set_default("database.user", "postgres")?
        .set_default("database.password", "")?
        .set_default("database.max_connections", 10_i64)?
        .set_default("database.acquire_timeout_secs", 5_i64)?
        .set_default("logging.level", "info")?
        .set_default("logging.file_prefix", "billdesk.log")?
        .set_default("client.api_url", "http://localhost:3000")?;
    Ok(builder)
}

/// Overlays `DB_*` and `DATABASE_URL`, read through `lookup`.
pub fn apply_deployment_env<F>(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: F,
) -> Result<ConfigBuilder<DefaultState>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    for (var, key) in LEGACY_DB_VARS {
        builder = builder.set_override_option(key, lookup(var))?;
    }
    builder = builder.set_override_option("database.url", lookup("DATABASE_URL"))?;
    Ok(builder)
}

/// Builds, deserializes and validates.
pub fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Config, ConfigError> {
    let config = builder.build()?.try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}
