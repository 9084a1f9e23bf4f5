// Configuration types module
// Defines all configuration-related data structures

use crate::lookup::PackageId;
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    /// Package name table for the built-in lookup
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    /// Content type of handler and empty responses
    pub default_content_type: String,
    pub server_name: String,
    pub max_body_size: u64,
}

/// Route registry configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutesConfig {
    #[serde(default = "default_package_route")]
    pub package_route: String,
    #[serde(default = "default_user_route")]
    pub user_route: String,
    #[serde(default = "default_voters_module")]
    pub voters_module: String,
    #[serde(default = "default_delete_module")]
    pub delete_module: String,
    /// Exact path or route key -> handler module
    #[serde(default = "default_route_table")]
    pub table: Vec<RouteEntry>,
}

/// One row of the route table
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: String,
    pub module: String,
}

impl RouteEntry {
    pub fn new(path: &str, module: &str) -> Self {
        Self {
            path: path.to_string(),
            module: module.to_string(),
        }
    }
}

#[allow(clippy::missing_const_for_fn)]
fn default_package_route() -> String {
    "/packages".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_user_route() -> String {
    "/account".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_voters_module() -> String {
    "voters.php".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_delete_module() -> String {
    "pkgdel.php".to_string()
}

/// Legacy routing table
fn default_route_table() -> Vec<RouteEntry> {
    [
        ("/", "home.php"),
        ("/index.php", "home.php"),
        ("/packages", "packages.php"),
        ("/pkgbase", "pkgbase.php"),
        ("/requests", "pkgreq.php"),
        ("/register", "register.php"),
        ("/account", "account.php"),
        ("/accounts", "account.php"),
        ("/login", "login.php"),
        ("/logout", "logout.php"),
        ("/passreset", "passreset.php"),
        ("/rpc", "rpc.php"),
        ("/rss/modified", "modified-rss.php"),
        ("/rss", "rss.php"),
        ("/tos", "tos.php"),
        ("/tu", "tu.php"),
        ("/addvote", "addvote.php"),
    ]
    .into_iter()
    .map(|(path, module)| RouteEntry::new(path, module))
    .collect()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            package_route: default_package_route(),
            user_route: default_user_route(),
            voters_module: default_voters_module(),
            delete_module: default_delete_module(),
            table: default_route_table(),
        }
    }
}

/// Static asset configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Directory the allowlisted asset paths are resolved against
    #[serde(default = "default_asset_root")]
    pub root: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_asset_root() -> String {
    "web/html".to_string()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: default_asset_root(),
        }
    }
}

/// Package name -> identifier
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: String,
    pub id: PackageId,
}
