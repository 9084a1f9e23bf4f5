//! Route registry
//!
//! Maps route keys to handler module references. Built once from
//! configuration and read concurrently afterwards.

use crate::config::RoutesConfig;
use std::collections::HashMap;
use std::fmt;

/// Reference to an external handler module (e.g. `packages.php`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef(String);

impl ModuleRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup surface consumed by the dispatcher
pub trait RouteRegistry: Send + Sync {
    /// Resolve an exact path or route key to a handler module
    fn resolve(&self, path: &str) -> Option<&ModuleRef>;

    /// Route key of the package route (e.g. `/packages`)
    fn package_route_key(&self) -> &str;

    /// Route key of the user route (e.g. `/account`)
    fn user_route_key(&self) -> &str;

    /// Sub-handler for `<package route>/<name>/voters`
    fn voters_module(&self) -> &ModuleRef;

    /// Sub-handler for `<package route>/<name>/delete`
    fn delete_module(&self) -> &ModuleRef;
}

/// Immutable route table
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, ModuleRef>,
    package_route: String,
    user_route: String,
    voters: ModuleRef,
    delete: ModuleRef,
}

impl RouteTable {
    pub fn from_config(config: &RoutesConfig) -> Self {
        let routes = config
            .table
            .iter()
            .map(|entry| (entry.path.clone(), ModuleRef::new(entry.module.as_str())))
            .collect();

        Self {
            routes,
            package_route: config.package_route.clone(),
            user_route: config.user_route.clone(),
            voters: ModuleRef::new(config.voters_module.as_str()),
            delete: ModuleRef::new(config.delete_module.as_str()),
        }
    }
}

impl RouteRegistry for RouteTable {
    fn resolve(&self, path: &str) -> Option<&ModuleRef> {
        self.routes.get(path)
    }

    fn package_route_key(&self) -> &str {
        &self.package_route
    }

    fn user_route_key(&self) -> &str {
        &self.user_route
    }

    fn voters_module(&self) -> &ModuleRef {
        &self.voters
    }

    fn delete_module(&self) -> &ModuleRef {
        &self.delete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_resolves_legacy_routes() {
        let table = RouteTable::from_config(&RoutesConfig::default());
        assert_eq!(table.resolve("/packages").map(ModuleRef::as_str), Some("packages.php"));
        assert_eq!(table.resolve("/account").map(ModuleRef::as_str), Some("account.php"));
        assert_eq!(table.resolve("/").map(ModuleRef::as_str), Some("home.php"));
        assert_eq!(table.package_route_key(), "/packages");
        assert_eq!(table.user_route_key(), "/account");
        assert_eq!(table.voters_module().as_str(), "voters.php");
        assert_eq!(table.delete_module().as_str(), "pkgdel.php");
    }

    #[test]
    fn test_resolve_is_exact() {
        let table = RouteTable::from_config(&RoutesConfig::default());
        assert!(table.resolve("/packages/").is_none());
        assert!(table.resolve("/Packages").is_none());
        assert!(table.resolve("/nonexistent").is_none());
    }
}
