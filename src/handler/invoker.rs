//! Handler module invocation
//!
//! The dispatcher only decides *which* module runs and with which
//! parameters. Running it is delegated through `ModuleInvoker`.

use crate::http;
use crate::params::RequestParams;
use crate::routing::{ModuleRef, SelectedPackage, SubHandler};
use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use serde_json::json;

/// Everything a handler module receives; owned by the call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCall {
    pub module: ModuleRef,
    /// Set when a package sub-handler short-circuited the route
    pub sub_handler: Option<SubHandler>,
    pub package: Option<SelectedPackage>,
    pub params: RequestParams,
    pub is_head: bool,
}

/// Transfers control to a handler module for the rest of the request
///
/// Runs on the connection's task; implementations that block must move
/// that work off the runtime themselves (`tokio::task::spawn_blocking`).
#[async_trait]
pub trait ModuleInvoker: Send + Sync {
    async fn invoke(&self, call: ModuleCall) -> Response<Full<Bytes>>;
}

/// Development invoker: answers with the call serialized as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoInvoker;

#[async_trait]
impl ModuleInvoker for EchoInvoker {
    async fn invoke(&self, call: ModuleCall) -> Response<Full<Bytes>> {
        let sub_handler = call.sub_handler.map(|kind| match kind {
            SubHandler::Voters => "voters",
            SubHandler::Delete => "delete",
        });
        let package = call
            .package
            .as_ref()
            .map(|p| json!({ "name": p.name, "id": p.id }));

        let body = json!({
            "module": call.module.as_str(),
            "sub_handler": sub_handler,
            "package": package,
            "params": call.params.to_json(),
        });
        http::build_json_response(&body, call.is_head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::LegacyAction;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_echo_invoker_serializes_call() {
        let mut params = RequestParams::new();
        params.press_button(LegacyAction::Vote);
        params.select_package(None);

        let call = ModuleCall {
            module: ModuleRef::new("packages.php"),
            sub_handler: None,
            package: Some(SelectedPackage {
                name: "foo".to_string(),
                id: None,
            }),
            params,
            is_head: false,
        };
        let response = EchoInvoker.invoke(call).await;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["module"], "packages.php");
        assert_eq!(value["sub_handler"], serde_json::Value::Null);
        assert_eq!(value["package"]["name"], "foo");
        assert_eq!(value["params"]["form"]["do_Vote"], "Vote");
        assert_eq!(value["params"]["form"]["IDs"][0]["id"], serde_json::Value::Null);
    }
}
