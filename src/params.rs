//! Per-request parameter bag
//!
//! Emulates the query / form / merged request parameter views that legacy
//! handler modules read. One `RequestParams` is created per request and moved
//! into the handler invocation.

use crate::lookup::PackageId;
use crate::routing::LegacyAction;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Form field carrying the session token copied from the cookie
pub const TOKEN_FIELD: &str = "token";
/// Form field holding the selected package identifiers
pub const IDS_FIELD: &str = "IDs";
/// Query parameter holding a single package identifier
pub const ID_PARAM: &str = "ID";
/// Merged parameter holding the requested username
pub const USER_PARAM: &str = "U";
/// Merged parameter selecting the account page
pub const ACTION_PARAM: &str = "Action";

/// Value stored under a parameter name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    /// Package identifier; `None` when the name did not resolve
    Id(Option<PackageId>),
    /// Multi-select emulation: selected identifier -> checkbox marker
    Ids(BTreeMap<Option<PackageId>, String>),
}

impl ParamValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Id(id) => json!(id),
            Self::Ids(ids) => Value::Array(
                ids.iter()
                    .map(|(id, marker)| json!({ "id": id, "value": marker }))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One logical sub-bag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamBag {
    values: BTreeMap<String, ParamValue>,
}

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParamValue::as_text)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParamBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (k, v) in iter {
            bag.set(k, ParamValue::Text(v.into()));
        }
        bag
    }
}

/// The three parameter views of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// Query-string parameters
    pub query: ParamBag,
    /// Form fields
    pub form: ParamBag,
    /// Merged view
    pub request: ParamBag,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from transport-level parameters
    ///
    /// The merged view starts as the query parameters overlaid by form fields.
    pub fn from_transport(query: ParamBag, form: ParamBag) -> Self {
        let mut request = query.clone();
        for (name, value) in form.iter() {
            request.set(name, value.clone());
        }
        Self {
            query,
            form,
            request,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "query": self.query.to_json(),
            "form": self.form.to_json(),
            "request": self.request.to_json(),
        })
    }
}

// Legacy parameter synthesis. Each operation writes exactly one key of one
// sub-bag and leaves every other transport key alone.
impl RequestParams {
    /// Emulate a pressed submit button: form `do_<Action>` = label
    ///
    /// Actions that are not buttons leave the form untouched.
    pub fn press_button(&mut self, action: LegacyAction) {
        if let (Some(field), Some(label)) = (action.form_field(), action.label()) {
            self.form.set(field, label);
        }
    }

    /// Copy the session cookie into the form `token` field, when present
    pub fn carry_session_token(&mut self, session_id: Option<&str>) {
        if let Some(sid) = session_id {
            self.form.set(TOKEN_FIELD, sid);
        }
    }

    /// Select exactly one package in the form `IDs` field
    pub fn select_package(&mut self, id: Option<PackageId>) {
        let ids = BTreeMap::from([(id, "1".to_string())]);
        self.form.set(IDS_FIELD, ParamValue::Ids(ids));
    }

    /// Query `ID` for the voters listing
    pub fn set_query_id(&mut self, id: Option<PackageId>) {
        self.query.set(ID_PARAM, ParamValue::Id(id));
    }

    pub fn set_account_user(&mut self, username: &str) {
        self.request.set(USER_PARAM, username);
    }

    pub fn set_account_action(&mut self, action: &str) {
        self.request.set(ACTION_PARAM, action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_merges_form_over_query() {
        let query: ParamBag = [("O", "50"), ("K", "q")].into_iter().collect();
        let form: ParamBag = [("K", "f")].into_iter().collect();
        let params = RequestParams::from_transport(query, form);

        assert_eq!(params.query.text("K"), Some("q"));
        assert_eq!(params.form.text("K"), Some("f"));
        assert_eq!(params.request.text("K"), Some("f"));
        assert_eq!(params.request.text("O"), Some("50"));
    }

    #[test]
    fn test_select_package_with_null_id() {
        let mut params = RequestParams::new();
        params.select_package(None);

        let Some(ParamValue::Ids(ids)) = params.form.get(IDS_FIELD) else {
            panic!("IDs should be a selection");
        };
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.get(&None).map(String::as_str), Some("1"));
    }

    #[test]
    fn test_synthesis_keeps_transport_keys() {
        let form: ParamBag = [("comment", "hi")].into_iter().collect();
        let mut params = RequestParams::from_transport(ParamBag::new(), form);
        params.press_button(LegacyAction::Vote);
        params.carry_session_token(Some("abc"));
        params.select_package(Some(3));

        assert_eq!(params.form.text("comment"), Some("hi"));
        assert_eq!(params.form.text("do_Vote"), Some("Vote"));
        assert_eq!(params.form.text(TOKEN_FIELD), Some("abc"));
        assert_eq!(params.form.len(), 4);
        // Form writes do not leak into the merged view
        assert!(!params.request.contains("do_Vote"));
    }

    #[test]
    fn test_non_button_actions_press_nothing() {
        let mut params = RequestParams::new();
        for action in [LegacyAction::Edit, LegacyAction::Update, LegacyAction::Voters, LegacyAction::Delete] {
            params.press_button(action);
        }
        assert!(params.form.is_empty());
    }

    #[test]
    fn test_carry_session_token_absent() {
        let mut params = RequestParams::new();
        params.carry_session_token(None);
        assert!(params.form.is_empty());
    }

    #[test]
    fn test_to_json_shapes() {
        let mut params = RequestParams::new();
        params.set_query_id(None);
        params.select_package(Some(42));
        let value = params.to_json();

        assert_eq!(value["query"]["ID"], Value::Null);
        assert_eq!(value["form"]["IDs"][0]["id"], json!(42));
        assert_eq!(value["form"]["IDs"][0]["value"], json!("1"));
    }
}
