//! User route matcher
//!
//! `/account/<name>[/<action>]` sets the merged `U` and `Action` parameters.
//! The username is passed through unresolved.

use super::action::{ActionEffect, LegacyAction};
use super::tokenizer::Tokens;
use crate::params::RequestParams;

/// Account page shown when no (or an unknown) sub-action is given
pub const DEFAULT_ACCOUNT_ACTION: &str = "AccountInfo";

/// Apply the user-route grammar to `params`
///
/// Assumes token 1 already selected the user route.
pub fn apply(tokens: &Tokens<'_>, params: &mut RequestParams) {
    let Some(username) = tokens.identifier() else {
        return;
    };

    params.set_account_user(username);
    params.set_account_action(account_action(tokens.sub_action()));
}

fn account_action(sub_action: Option<&str>) -> &'static str {
    match sub_action.and_then(LegacyAction::parse).map(LegacyAction::effect) {
        Some(ActionEffect::AccountAction(action)) => action,
        _ => DEFAULT_ACCOUNT_ACTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ACTION_PARAM, USER_PARAM};

    fn run(path: &str) -> RequestParams {
        let mut params = RequestParams::new();
        apply(&Tokens::new(path), &mut params);
        params
    }

    #[test]
    fn test_account_actions() {
        let cases = [
            ("/account/bob", "AccountInfo"),
            ("/account/bob/edit", "DisplayAccount"),
            ("/account/bob/update", "UpdateAccount"),
            ("/account/bob/vote", "AccountInfo"),
            ("/account/bob/whatever", "AccountInfo"),
            ("/account/bob/", "AccountInfo"),
        ];
        for (path, expected) in cases {
            let params = run(path);
            assert_eq!(params.request.text(USER_PARAM), Some("bob"), "{path}");
            assert_eq!(params.request.text(ACTION_PARAM), Some(expected), "{path}");
        }
    }

    #[test]
    fn test_bare_route_sets_nothing() {
        assert_eq!(run("/account"), RequestParams::new());
    }

    #[test]
    fn test_only_merged_view_is_written() {
        let params = run("/account/bob/edit");
        assert!(params.query.is_empty());
        assert!(params.form.is_empty());
        assert_eq!(params.request.len(), 2);
    }
}
