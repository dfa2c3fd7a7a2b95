//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: `FORUM_`, sections separated by `__`,
//!    e.g. `FORUM_SERVICE__PORT=9000`, `FORUM_JWT__SECRET=...`)
//! 2. Current working directory: ./config.toml
//! 3. XDG config directory: ~/.config/forum-service/{service_name}/config.toml
//! 4. System directory: /etc/forum-service/{service_name}/config.toml
//! 5. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

const CONFIG_PREFIX: &str = "forum-service";
const ENV_PREFIX: &str = "FORUM_";
const ENV_SEPARATOR: &str = "__";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub middleware: MiddlewareConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level or `EnvFilter` directive (e.g. `info,forum_service=debug`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (dev, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// JWT configuration
///
/// HMAC algorithms take the shared secret from `secret` or from the file at
/// `secret_path`; RSA and EC algorithms read a PEM public key from
/// `secret_path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default)]
    pub secret_path: Option<PathBuf>,

    /// JWT algorithm (HS256, HS384, HS512, RS256, RS384, RS512, ES256, ES384)
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,

    #[serde(default)]
    pub issuer: Option<String>,

    #[serde(default)]
    pub audience: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: None,
            secret_path: None,
            algorithm: default_jwt_algorithm(),
            issuer: None,
            audience: None,
        }
    }
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in MB
    #[serde(default = "default_body_limit_mb")]
    pub body_limit_mb: usize,

    /// Enable panic recovery middleware
    #[serde(default = "default_true")]
    pub catch_panic: bool,

    #[serde(default = "default_true")]
    pub compression: bool,

    /// `permissive`, `restrictive` or `disabled`
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,

    #[serde(default = "default_request_id_header")]
    pub request_id_header: String,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_mb: default_body_limit_mb(),
            catch_panic: true,
            compression: true,
            cors_mode: default_cors_mode(),
            request_id_header: default_request_id_header(),
        }
    }
}

/// First-run seeding
///
/// The in-memory store starts empty and every user endpoint needs an
/// identity, so a fresh process can create one admin account at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub admin_name: Option<String>,

    /// Log a token for the seeded admin (HMAC algorithms only)
    #[serde(default)]
    pub issue_admin_token: bool,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "dev".to_string()
}

fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

fn default_true() -> bool {
    true
}

fn default_body_limit_mb() -> usize {
    2
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_request_id_header() -> String {
    "x-request-id".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is inferred from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| CONFIG_PREFIX.to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut figment = Figment::new().merge(Serialized::defaults(Config::named(service_name)));

        // Lowest priority first so later files override earlier ones
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR));

        let config = figment.extract()?;
        Ok(config)
    }

    /// Load configuration from a specific file, skipping the search path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split(ENV_SEPARATOR))
            .extract()?;

        Ok(config)
    }

    /// Candidate config file paths, highest priority first
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix(CONFIG_PREFIX);
        if let Some(path) = xdg_dirs.find_config_file(Path::new(service_name).join("config.toml")) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc")
                .join(CONFIG_PREFIX)
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    /// Defaults with the given service name
    pub fn named(service_name: &str) -> Self {
        let mut config = Self::default();
        config.service.name = service_name.to_string();
        config
    }

    pub fn is_production(&self) -> bool {
        self.service.environment.eq_ignore_ascii_case("production")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: CONFIG_PREFIX.to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            jwt: JwtConfig::default(),
            middleware: MiddlewareConfig::default(),
            bootstrap: BootstrapConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service.port, 8080);
        assert_eq!(config.service.log_level, "info");
        assert_eq!(config.service.timeout(), Duration::from_secs(30));
        assert_eq!(config.jwt.algorithm, "HS256");
        assert_eq!(config.middleware.body_limit_mb, 2);
        assert!(!config.is_production());
    }

    #[test]
    fn test_named_config() {
        let config = Config::named("forum-api");
        assert_eq!(config.service.name, "forum-api");
        assert_eq!(config.service.port, 8080);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[service]
name = "forum-test"
port = 9100
environment = "production"

[jwt]
secret = "file-secret"
issuer = "forum"

[middleware]
cors_mode = "restrictive"

[bootstrap]
admin_name = "root"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.service.name, "forum-test");
        assert_eq!(config.service.port, 9100);
        assert_eq!(config.service.log_level, "info");
        assert!(config.is_production());
        assert_eq!(config.jwt.secret.as_deref(), Some("file-secret"));
        assert_eq!(config.jwt.issuer.as_deref(), Some("forum"));
        assert_eq!(config.jwt.algorithm, "HS256");
        assert_eq!(config.middleware.cors_mode, "restrictive");
        assert_eq!(config.middleware.body_limit_mb, 2);
        assert_eq!(config.bootstrap.admin_name.as_deref(), Some("root"));
        assert!(!config.bootstrap.issue_admin_token);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.service.name, "forum-service");
    }
}
