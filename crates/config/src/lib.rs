//! Layered application settings: built-in defaults, an optional config
//! file, then `ACCIOFOCUS__*` environment overrides.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub identity: IdentitySettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub uri: String,
    pub name: String,
}

/// Verification material for the external identity provider's tokens.
///
/// Production uses `RS256` with the provider's PEM public key; `HS256`
/// with a shared secret is for local development and the test harness.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentitySettings {
    pub algorithm: String,
    pub public_key_pem: Option<String>,
    pub secret: Option<String>,
    pub issuer: Option<String>,
}

impl Settings {
    /// Loads settings. `ACCIOFOCUS_CONFIG` points at an alternate config
    /// file; nested keys are overridden as e.g. `ACCIOFOCUS__SERVER__PORT`.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("ACCIOFOCUS_CONFIG").unwrap_or_else(|_| "config/default".to_string());

        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.name", "acciofocus")?
            .set_default("identity.algorithm", "RS256")?
            .add_source(File::with_name(&config_path).required(false))
            .add_source(Environment::with_prefix("ACCIOFOCUS").separator("__"))
            .build()?
            .try_deserialize()
    }
}
