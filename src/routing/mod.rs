//! Routing module
//!
//! Path tokenizing, the route registry and the two special-route matchers:
//! - Package route (`/packages/...`) with legacy action emulation
//! - User route (`/account/...`) with account page selection

pub mod action;
pub mod package;
pub mod registry;
mod tokenizer;
pub mod user;

pub use action::{ActionEffect, LegacyAction, SubHandler};
pub use package::{PackageMatch, PackageOutcome, SelectedPackage};
pub use registry::{ModuleRef, RouteRegistry, RouteTable};
pub use tokenizer::{tokenize, Tokens};
