//! Legacy action keywords
//!
//! Sub-path keywords that older handler modules expect as "submit button"
//! form fields or as dedicated sub-handlers.

use std::fmt;

/// Closed set of legacy action keywords found at token 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyAction {
    Vote,
    UnVote,
    Notify,
    UnNotify,
    Flag,
    UnFlag,
    Edit,
    Update,
    Voters,
    Delete,
}

/// Dedicated package sub-handlers that bypass the package-route module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubHandler {
    Voters,
    Delete,
}

/// What a legacy action turns into once matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    /// Form field `field` set to the human-readable `label`
    SubmitButton {
        field: &'static str,
        label: &'static str,
    },
    /// Hand control to a dedicated sub-handler
    ShortCircuit(SubHandler),
    /// Value of the `Action` parameter on the user route
    AccountAction(&'static str),
}

/// `(keyword, action, effect)` for every legacy action
const ACTION_TABLE: [(&str, LegacyAction, ActionEffect); 10] = [
    ("vote", LegacyAction::Vote, submit("do_Vote", "Vote")),
    ("unvote", LegacyAction::UnVote, submit("do_UnVote", "UnVote")),
    ("notify", LegacyAction::Notify, submit("do_Notify", "Notify")),
    ("unnotify", LegacyAction::UnNotify, submit("do_UnNotify", "UnNotify")),
    ("flag", LegacyAction::Flag, submit("do_Flag", "Flag")),
    ("unflag", LegacyAction::UnFlag, submit("do_UnFlag", "UnFlag")),
    ("edit", LegacyAction::Edit, ActionEffect::AccountAction("DisplayAccount")),
    ("update", LegacyAction::Update, ActionEffect::AccountAction("UpdateAccount")),
    ("voters", LegacyAction::Voters, ActionEffect::ShortCircuit(SubHandler::Voters)),
    ("delete", LegacyAction::Delete, ActionEffect::ShortCircuit(SubHandler::Delete)),
];

const fn submit(field: &'static str, label: &'static str) -> ActionEffect {
    ActionEffect::SubmitButton { field, label }
}

impl LegacyAction {
    pub const ALL: [Self; 10] = [
        Self::Vote,
        Self::UnVote,
        Self::Notify,
        Self::UnNotify,
        Self::Flag,
        Self::UnFlag,
        Self::Edit,
        Self::Update,
        Self::Voters,
        Self::Delete,
    ];

    /// Parse a path keyword (case-sensitive, as the legacy URIs were)
    pub fn parse(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.keyword() == keyword)
    }

    pub const fn keyword(self) -> &'static str {
        ACTION_TABLE[self.index()].0
    }

    pub const fn effect(self) -> ActionEffect {
        ACTION_TABLE[self.index()].2
    }

    /// Value a pressed submit button posts; `None` for non-button actions
    pub const fn label(self) -> Option<&'static str> {
        match self.effect() {
            ActionEffect::SubmitButton { label, .. } => Some(label),
            _ => None,
        }
    }

    /// Name of the `do_<Action>` form field, for the submit-button actions
    pub const fn form_field(self) -> Option<&'static str> {
        match self.effect() {
            ActionEffect::SubmitButton { field, .. } => Some(field),
            _ => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Vote => 0,
            Self::UnVote => 1,
            Self::Notify => 2,
            Self::UnNotify => 3,
            Self::Flag => 4,
            Self::UnFlag => 5,
            Self::Edit => 6,
            Self::Update => 7,
            Self::Voters => 8,
            Self::Delete => 9,
        }
    }
}

impl fmt::Display for LegacyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
