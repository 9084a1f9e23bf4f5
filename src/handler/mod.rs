//! Request handler module
//!
//! HTTP entry point, handler module invocation and static asset serving.

pub mod invoker;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use invoker::{EchoInvoker, ModuleCall, ModuleInvoker};
pub use router::handle_request;
