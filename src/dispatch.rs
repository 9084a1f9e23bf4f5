//! Request-path dispatcher
//!
//! Classifies a path and prepares the parameters the selected handler
//! expects. Stages run in a fixed order and the first match wins:
//!
//! 1. Package route (`/packages/...`)
//! 2. User route (`/account/...`)
//! 3. Exact route table lookup
//! 4. Static asset allowlist
//! 5. Nothing: an empty, successful response
//!
//! Dispatching is synchronous and performs no I/O. Reading an asset or
//! invoking a module is up to the caller.

use crate::assets::{self, AssetEntry};
use crate::logger;
use crate::lookup::PackageLookup;
use crate::params::RequestParams;
use crate::routing::{
    package, user, ModuleRef, PackageOutcome, RouteRegistry, SelectedPackage, SubHandler, Tokens,
};
use std::sync::Arc;

/// Inbound request as seen by the dispatcher
#[derive(Debug, Clone)]
pub struct DispatchRequest<'a> {
    /// Decoded path component
    pub path: &'a str,
    /// Value of the `AURSID` cookie
    pub session_id: Option<&'a str>,
    /// Transport-level parameters, augmented in place
    pub params: RequestParams,
}

impl<'a> DispatchRequest<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            session_id: None,
            params: RequestParams::new(),
        }
    }

    #[must_use]
    pub fn with_session(mut self, session_id: Option<&'a str>) -> Self {
        self.session_id = session_id;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }
}

/// Where control goes after dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A handler module from the route table
    Module(ModuleRef),
    /// A short-circuit package sub-handler
    SubHandler { kind: SubHandler, module: ModuleRef },
    /// An allowlisted static asset
    Asset(&'static AssetEntry),
    /// Nothing matched
    Empty,
}

impl Target {
    /// Short label for access logs
    pub fn describe(&self) -> String {
        match self {
            Self::Module(module) | Self::SubHandler { module, .. } => module.to_string(),
            Self::Asset(entry) => format!("asset:{}", entry.path),
            Self::Empty => "-".to_string(),
        }
    }
}

/// Result of one dispatch: the target plus everything it receives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub target: Target,
    pub params: RequestParams,
    /// Package named on the package route, if any
    pub package: Option<SelectedPackage>,
}

/// Sequences the routing stages
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<dyn RouteRegistry>,
    lookup: Arc<dyn PackageLookup>,
}

impl Dispatcher {
    pub fn new(registry: Arc<dyn RouteRegistry>, lookup: Arc<dyn PackageLookup>) -> Self {
        Self { registry, lookup }
    }

    pub fn dispatch(&self, request: DispatchRequest<'_>) -> Dispatch {
        let DispatchRequest {
            path,
            session_id,
            mut params,
        } = request;
        let tokens = Tokens::new(path);
        let registry = self.registry.as_ref();

        let package_key = registry.package_route_key();
        if tokens.selects(package_key) {
            let matched = package::apply(&tokens, self.lookup.as_ref(), session_id, &mut params);
            let target = match matched.outcome {
                PackageOutcome::SubHandler(kind) => Target::SubHandler {
                    kind,
                    module: self.sub_handler_module(kind).clone(),
                },
                PackageOutcome::Module => self.route_key_target(package_key),
            };
            return Dispatch {
                target,
                params,
                package: matched.selected,
            };
        }

        let user_key = registry.user_route_key();
        if tokens.selects(user_key) {
            user::apply(&tokens, &mut params);
            return Dispatch {
                target: self.route_key_target(user_key),
                params,
                package: None,
            };
        }

        let target = if let Some(module) = registry.resolve(path) {
            Target::Module(module.clone())
        } else if let Some(entry) = assets::find(path) {
            Target::Asset(entry)
        } else {
            Target::Empty
        };

        Dispatch {
            target,
            params,
            package: None,
        }
    }

    fn sub_handler_module(&self, kind: SubHandler) -> &ModuleRef {
        match kind {
            SubHandler::Voters => self.registry.voters_module(),
            SubHandler::Delete => self.registry.delete_module(),
        }
    }

    /// Module for a special route key; an unmapped key degrades to `Empty`
    fn route_key_target(&self, key: &str) -> Target {
        match self.registry.resolve(key) {
            Some(module) => Target::Module(module.clone()),
            None => {
                logger::log_warning(&format!("No handler module registered for route '{key}'"));
                Target::Empty
            }
        }
    }
}
