//! Static asset serving
//!
//! Streams an allowlisted asset with the table's content type. A missing
//! or unreadable file is logged and answered with the legacy empty response.

use crate::assets::AssetEntry;
use crate::handler::router::RequestContext;
use crate::http::{self, cache};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;

/// Serve one allowlisted asset from under `root`
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    root: &Path,
    entry: &AssetEntry,
) -> Response<Full<Bytes>> {
    match entry.load(root).await {
        Ok(data) => build_asset_response(data, entry.content_type, ctx),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read asset '{}': {e}",
                entry.file_path(root).display()
            ));
            http::build_empty_response(ctx.default_content_type)
        }
    }
}

fn build_asset_response(
    data: Vec<u8>,
    content_type: &str,
    ctx: &RequestContext<'_>,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    http::build_asset_response(Bytes::from(data), content_type, &etag, ctx.is_head)
}
