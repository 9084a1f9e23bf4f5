//! Package route matcher
//!
//! Grammar under the package route key:
//!
//! | Path                        | Effect                                        |
//! |-----------------------------|-----------------------------------------------|
//! | `/packages`                 | package module, no extra parameters           |
//! | `/packages/<name>`          | package module, package selected              |
//! | `/packages/<name>/voters`   | voters sub-handler with query `ID`            |
//! | `/packages/<name>/delete`   | deletion sub-handler                          |
//! | `/packages/<name>/<action>` | `do_<Action>`, `token`, `IDs` form fields     |

use super::action::{ActionEffect, LegacyAction, SubHandler};
use super::tokenizer::Tokens;
use crate::lookup::{PackageId, PackageLookup};
use crate::params::RequestParams;

/// Package named at token 2 together with its resolved identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPackage {
    pub name: String,
    pub id: Option<PackageId>,
}

/// Where the package route hands control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageOutcome {
    /// The package-route module
    Module,
    /// A dedicated sub-handler, bypassing generic resolution
    SubHandler(SubHandler),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMatch {
    pub outcome: PackageOutcome,
    pub selected: Option<SelectedPackage>,
}

/// Apply the package-route grammar to `params`
///
/// Assumes token 1 already selected the package route.
pub fn apply(
    tokens: &Tokens<'_>,
    lookup: &dyn PackageLookup,
    session_id: Option<&str>,
    params: &mut RequestParams,
) -> PackageMatch {
    let Some(name) = tokens.identifier() else {
        return PackageMatch {
            outcome: PackageOutcome::Module,
            selected: None,
        };
    };

    let id = lookup.id_from_name(name);
    let selected = Some(SelectedPackage {
        name: name.to_string(),
        id,
    });

    let Some(sub_action) = tokens.sub_action() else {
        return PackageMatch {
            outcome: PackageOutcome::Module,
            selected,
        };
    };

    // Unknown sub-actions carry no button but still get token and IDs
    if let Some(action) = LegacyAction::parse(sub_action) {
        match action.effect() {
            ActionEffect::ShortCircuit(SubHandler::Voters) => {
                params.set_query_id(id);
                return PackageMatch {
                    outcome: PackageOutcome::SubHandler(SubHandler::Voters),
                    selected,
                };
            }
            ActionEffect::ShortCircuit(SubHandler::Delete) => {
                return PackageMatch {
                    outcome: PackageOutcome::SubHandler(SubHandler::Delete),
                    selected,
                };
            }
            ActionEffect::SubmitButton { .. } => params.press_button(action),
            ActionEffect::AccountAction(_) => {}
        }
    }

    params.carry_session_token(session_id);
    params.select_package(id);

    PackageMatch {
        outcome: PackageOutcome::Module,
        selected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::MemoryLookup;
    use crate::params::{ParamValue, IDS_FIELD, ID_PARAM, TOKEN_FIELD};

    fn lookup() -> MemoryLookup {
        [("foo", 17)].into_iter().collect()
    }

    fn run(path: &str, sid: Option<&str>) -> (PackageMatch, RequestParams) {
        let mut params = RequestParams::new();
        let m = apply(&Tokens::new(path), &lookup(), sid, &mut params);
        (m, params)
    }

    #[test]
    fn test_bare_route() {
        let (m, params) = run("/packages", Some("sid"));
        assert_eq!(m.outcome, PackageOutcome::Module);
        assert_eq!(m.selected, None);
        assert_eq!(params, RequestParams::new());
    }

    #[test]
    fn test_name_only_selects_package_without_form_fields() {
        let (m, params) = run("/packages/foo", Some("sid"));
        assert_eq!(m.outcome, PackageOutcome::Module);
        assert_eq!(
            m.selected,
            Some(SelectedPackage {
                name: "foo".to_string(),
                id: Some(17)
            })
        );
        assert!(params.form.is_empty());
    }

    #[test]
    fn test_every_submit_action_sets_one_button() {
        for action in LegacyAction::ALL {
            let Some(field) = action.form_field() else {
                continue;
            };
            let (m, params) = run(&format!("/packages/foo/{action}"), None);
            assert_eq!(m.outcome, PackageOutcome::Module);

            let buttons: Vec<_> = params
                .form
                .iter()
                .filter(|(k, _)| k.starts_with("do_"))
                .collect();
            assert_eq!(buttons.len(), 1, "{action}");
            assert_eq!(buttons[0].0, field);
            assert_eq!(buttons[0].1.as_text(), action.label());
        }
    }

    #[test]
    fn test_session_token_copied_after_action() {
        let (_, params) = run("/packages/foo/flag", Some("abcdef"));
        assert_eq!(params.form.text(TOKEN_FIELD), Some("abcdef"));
        assert_eq!(params.form.text("do_Flag"), Some("Flag"));
    }

    #[test]
    fn test_unknown_sub_action_still_selects_ids() {
        let (m, params) = run("/packages/foo/comments", Some("sid"));
        assert_eq!(m.outcome, PackageOutcome::Module);
        assert!(params.form.iter().all(|(k, _)| !k.starts_with("do_")));
        assert_eq!(params.form.text(TOKEN_FIELD), Some("sid"));
        assert!(params.form.contains(IDS_FIELD));
    }

    #[test]
    fn test_voters_short_circuit() {
        let (m, params) = run("/packages/foo/voters", Some("sid"));
        assert_eq!(m.outcome, PackageOutcome::SubHandler(SubHandler::Voters));
        assert_eq!(params.query.get(ID_PARAM), Some(&ParamValue::Id(Some(17))));
        assert!(params.form.is_empty());
    }

    #[test]
    fn test_delete_short_circuit_before_synthesis() {
        let (m, params) = run("/packages/foo/delete", Some("sid"));
        assert_eq!(m.outcome, PackageOutcome::SubHandler(SubHandler::Delete));
        assert_eq!(params, RequestParams::new());
    }

    #[test]
    fn test_unresolved_name_yields_null_selection() {
        let (m, params) = run("/packages/missing/vote", None);
        assert_eq!(m.selected.and_then(|s| s.id), None);
        let Some(ParamValue::Ids(ids)) = params.form.get(IDS_FIELD) else {
            panic!("IDs should be set");
        };
        assert_eq!(ids.keys().collect::<Vec<_>>(), vec![&None]);
    }
}
