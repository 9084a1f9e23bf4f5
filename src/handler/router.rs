//! Request entry point
//!
//! Validates the HTTP request, extracts path, cookie and parameters, runs the
//! dispatcher and turns its decision into a response.

use crate::config::AppState;
use crate::dispatch::{Dispatch, DispatchRequest, Target};
use crate::handler::invoker::ModuleCall;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::params::{ParamBag, RequestParams};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE, COOKIE, SERVER};
use hyper::{Method, Request, Response};
use percent_encoding::percent_decode_str;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Name of the session cookie copied into the form `token` field
pub const SESSION_COOKIE: &str = "AURSID";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Per-request values the response builders need
pub struct RequestContext<'a> {
    pub is_head: bool,
    pub if_none_match: Option<String>,
    pub default_content_type: &'a str,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state.access_log.then(|| access_entry(&req, peer_addr));

    let (mut response, target) = process(req, &state).await;
    if let Ok(value) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, value);
    }

    if let Some(entry) = entry.as_mut() {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
            .unwrap_or(usize::MAX);
        entry.target = target;
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Run checks, dispatch and rendering; returns the response and log target
async fn process<B>(req: Request<B>, state: &AppState) -> (Response<Full<Bytes>>, String)
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method()) {
        return (resp, "-".to_string());
    }

    // 2. Check declared body size
    let max_body_size = state.config.http.max_body_size;
    if let Some(resp) = check_body_size(req.headers(), max_body_size) {
        return (resp, "-".to_string());
    }

    let (parts, body) = req.into_parts();
    let default_content_type = state.config.http.default_content_type.as_str();

    // The tokenizer must see the path exactly; undecodable bytes match nothing
    let Ok(path) = percent_decode_str(parts.uri.path()).decode_utf8() else {
        logger::log_warning(&format!(
            "Request path '{}' is not valid UTF-8 once decoded",
            parts.uri.path()
        ));
        return (
            http::build_empty_response(default_content_type),
            Target::Empty.describe(),
        );
    };
    let query = parse_urlencoded(parts.uri.query().unwrap_or("").as_bytes());
    let session_id = session_cookie(&parts.headers);

    // 3. Read form fields
    let form = if parts.method == Method::POST && is_form(&parts.headers) {
        match read_form(body, max_body_size, default_content_type).await {
            Ok(form) => form,
            Err(resp) => return (resp, "-".to_string()),
        }
    } else {
        ParamBag::new()
    };

    // 4. Dispatch
    let request = DispatchRequest::new(&path)
        .with_session(session_id.as_deref())
        .with_params(RequestParams::from_transport(query, form));
    let dispatch = state.dispatcher.dispatch(request);
    let target = dispatch.target.describe();

    // 5. Render
    let ctx = RequestContext {
        is_head: parts.method == Method::HEAD,
        if_none_match: parts
            .headers
            .get("if-none-match")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string),
        default_content_type,
    };
    (render(dispatch, &ctx, state).await, target)
}

/// Hand the dispatch decision to the invoker, the asset server or nobody
async fn render(
    dispatch: Dispatch,
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let Dispatch {
        target,
        params,
        package,
    } = dispatch;

    match target {
        Target::Module(module) => {
            state
                .invoker
                .invoke(ModuleCall {
                    module,
                    sub_handler: None,
                    package,
                    params,
                    is_head: ctx.is_head,
                })
                .await
        }
        Target::SubHandler { kind, module } => {
            state
                .invoker
                .invoke(ModuleCall {
                    module,
                    sub_handler: Some(kind),
                    package,
                    params,
                    is_head: ctx.is_head,
                })
                .await
        }
        Target::Asset(entry) => static_files::serve_asset(ctx, &state.asset_root, entry).await,
        Target::Empty => http::build_empty_response(ctx.default_content_type),
    }
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry
}

/// Check HTTP method and return appropriate response for unsupported methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD | &Method::POST => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE))
}

/// Collect and parse a url-encoded body, enforcing the size limit
///
/// A body that cannot be read in full is never dispatched.
async fn read_form<B>(
    body: B,
    max_body_size: u64,
    default_content_type: &str,
) -> Result<ParamBag, Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(parse_urlencoded(&collected.to_bytes())),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!("Request body exceeded {max_body_size} bytes"));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_empty_response(default_content_type))
        }
    }
}

/// Parse `a=1&b=2` pairs; later duplicates win
fn parse_urlencoded(input: &[u8]) -> ParamBag {
    url::form_urlencoded::parse(input).into_owned().collect()
}

/// Extract the session cookie value from all `Cookie` headers
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_string())
}
