use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Double,
    Hit,
    Stand,
    Split,
    Surrender,
}

/// Actions on offer at a decision point, kept in a stable order.
pub type ActionSet = BTreeSet<Action>;

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Double,
        Action::Hit,
        Action::Stand,
        Action::Split,
        Action::Surrender,
    ];

    /// Legal once the opening decision has passed
    pub const CONTINUING: [Action; 3] = [Action::Hit, Action::Stand, Action::Surrender];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Double => "double",
            Action::Hit => "hit",
            Action::Stand => "stand",
            Action::Split => "split",
            Action::Surrender => "surrender",
        }
    }

    /// Double and Split belong to the opening decision only
    pub fn requires_opening(&self) -> bool {
        matches!(self, Action::Double | Action::Split)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(word))
            .ok_or_else(|| UnknownAction(word.to_string()))
    }
}

/// Comma separated list for prompts, e.g. `hit, stand, surrender`
pub fn describe_actions(actions: &ActionSet) -> String {
    actions
        .iter()
        .map(Action::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
