// Application state module
// Immutable per-process state shared by every connection

use std::path::PathBuf;
use std::sync::Arc;

use super::types::Config;
use crate::dispatch::Dispatcher;
use crate::handler::{EchoInvoker, ModuleInvoker};
use crate::lookup::MemoryLookup;
use crate::routing::RouteTable;

/// Application state
///
/// Built once at startup; read concurrently without locks.
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    pub invoker: Arc<dyn ModuleInvoker>,
    pub asset_root: PathBuf,
    pub access_log: bool,
}

impl AppState {
    /// Create state with the built-in lookup and the JSON echo invoker
    pub fn new(config: &Config) -> Self {
        Self::with_invoker(config, Arc::new(EchoInvoker))
    }

    pub fn with_invoker(config: &Config, invoker: Arc<dyn ModuleInvoker>) -> Self {
        let registry = Arc::new(RouteTable::from_config(&config.routes));
        let lookup: MemoryLookup = config
            .packages
            .iter()
            .map(|p| (p.name.as_str(), p.id))
            .collect();

        Self {
            config: config.clone(),
            dispatcher: Dispatcher::new(registry, Arc::new(lookup)),
            invoker,
            asset_root: PathBuf::from(&config.assets.root),
            access_log: config.logging.access_log,
        }
    }
}
