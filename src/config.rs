//! Application configuration loaded from TOML
//!
//! Every field has a default, so an empty file (or none at all) yields a
//! runnable development setup.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [database]
//! url = "sqlite://./chargers.db?mode=rwc"
//!
//! [security]
//! jwt_secret = "replace me"
//!
//! [nearby]
//! default_radius_km = 10.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::DatabaseConfig;
use crate::shared::errors::ConfigError;

/// Environment variable holding an alternative config path
pub const CONFIG_ENV_VAR: &str = "CHARGER_REGISTRY_CONFIG";

/// Lowest bcrypt cost accepted in `security.bcrypt_cost`
pub const MIN_BCRYPT_COST: u32 = 4;
/// Highest bcrypt cost accepted in `security.bcrypt_cost`
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub nearby: NearbyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_hours: jwt.expiration_hours,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Account created at startup when the store has no users
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@localhost".to_string(),
            password: "admin123".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NearbyConfig {
    pub default_radius_km: f64,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self {
            default_radius_km: crate::domain::DEFAULT_RADIUS_KM,
        }
    }
}

impl AppConfig {
    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "security.jwt_secret must not be empty".into(),
            ));
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be positive".into(),
            ));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid(format!(
                "security.bcrypt_cost must be within {}..={}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }
        let radius = self.nearby.default_radius_km;
        if !radius.is_finite() || radius < 0.0 {
            return Err(ConfigError::Invalid(
                "nearby.default_radius_km must be a non-negative number".into(),
            ));
        }
        Ok(())
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            ..JwtConfig::default()
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `~/.config/charger-registry/config.toml`, or `./config.toml` when no
/// config directory can be determined.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("charger-registry").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.nearby.default_radius_km, 10.0);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.jwt_config().expiration_hours, 24);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [logging]
            format = "json"

            [nearby]
            default_radius_km = 25.5
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.nearby.default_radius_km, 25.5);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for raw in [
            "[server]\nport = 0",
            "[security]\njwt_secret = \"  \"",
            "[security]\nbcrypt_cost = 2",
            "[nearby]\ndefault_radius_km = -1.0",
        ] {
            assert!(
                matches!(AppConfig::from_toml(raw), Err(ConfigError::Invalid(_))),
                "{raw}"
            );
        }
    }

    #[test]
    fn bcrypt_cost_bounds_are_inclusive() {
        for cost in [MIN_BCRYPT_COST, bcrypt::DEFAULT_COST, MAX_BCRYPT_COST] {
            let raw = format!("[security]\nbcrypt_cost = {cost}");
            assert!(AppConfig::from_toml(&raw).is_ok(), "{cost}");
        }
        for cost in [MIN_BCRYPT_COST - 1, MAX_BCRYPT_COST + 1] {
            let raw = format!("[security]\nbcrypt_cost = {cost}");
            assert!(
                matches!(AppConfig::from_toml(&raw), Err(ConfigError::Invalid(_))),
                "{cost}"
            );
        }
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        assert!(matches!(
            AppConfig::from_toml("[server"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
