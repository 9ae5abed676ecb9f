use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub auth: AuthSettings,
}

/// Deployment-wide credential settings.
///
/// The signing key is shared by the token issuer and every verifier in
/// the deployment; rotating it invalidates all outstanding tokens.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub signing_key: String,
    pub issuer: String,
    pub token_ttl_hours: i64,
    #[serde(default)]
    pub hashing: HashingSettings,
}

/// Argon2 cost profile, fixed per deployment and never per call.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HashingSettings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashingSettings {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__SIGNING_KEY, AUTH__ISSUER, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// A missing or empty signing key fails the load: without it neither
    /// issuance nor verification is possible, so startup must not
    /// proceed.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: AUTH__SIGNING_KEY=... overrides auth.signing_key
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        if config.auth.signing_key.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.signing_key must be configured and non-empty".to_string(),
            ));
        }

        Ok(config)
    }
}
