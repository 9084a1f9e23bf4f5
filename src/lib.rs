//! Legacy request-path dispatcher
//!
//! Maps an inbound path such as `/packages/foo/vote` onto a handler module,
//! synthesizing the request parameters the legacy modules expect, or onto
//! one of a fixed set of static assets.

pub mod assets;
pub mod config;
pub mod dispatch;
pub mod handler;
pub mod http;
pub mod logger;
pub mod lookup;
pub mod params;
pub mod routing;
pub mod server;
