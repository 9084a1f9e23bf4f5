// Configuration module entry point
// Loads layered configuration, validates it and holds runtime state

mod state;
mod types;

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

// Re-export public types
pub use state::AppState;
pub use types::{
    AssetsConfig, Config, HttpConfig, LoggingConfig, PackageEntry, PerformanceConfig, RouteEntry,
    RoutesConfig, ServerConfig,
};

/// Semantic configuration errors found after deserialization
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("route key '{0}' must start with '/'")]
    UnrootedRouteKey(String),
    #[error("package route and user route share the key '{0}'")]
    SharedRouteKey(String),
    #[error("route '{0}' is defined more than once")]
    DuplicateRoute(String),
    #[error("package '{0}' is defined more than once")]
    DuplicatePackage(String),
}

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("PKGROUTE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.default_content_type", "text/html; charset=utf-8")?
            .set_default("http.server_name", "pkgroute/0.1")?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Check route keys and tables for conflicts
    pub fn validate(&self) -> Result<(), ValidationError> {
        let routes = &self.routes;

        for key in [&routes.package_route, &routes.user_route] {
            if !key.starts_with('/') {
                return Err(ValidationError::UnrootedRouteKey(key.clone()));
            }
        }
        if routes.package_route == routes.user_route {
            return Err(ValidationError::SharedRouteKey(routes.package_route.clone()));
        }

        let mut seen = HashSet::new();
        for entry in &routes.table {
            if !entry.path.starts_with('/') {
                return Err(ValidationError::UnrootedRouteKey(entry.path.clone()));
            }
            if !seen.insert(entry.path.as_str()) {
                return Err(ValidationError::DuplicateRoute(entry.path.clone()));
            }
        }

        let mut names = HashSet::new();
        for package in &self.packages {
            if !names.insert(package.name.as_str()) {
                return Err(ValidationError::DuplicatePackage(package.name.clone()));
            }
        }

        Ok(())
    }
}
