//! HTTP protocol layer module
//!
//! Response builders and cache validation, independent of routing.

pub mod cache;
pub mod response;

// Re-export commonly used types
pub use response::{
    build_304_response, build_405_response, build_413_response, build_asset_response,
    build_empty_response, build_json_response, build_options_response,
};
