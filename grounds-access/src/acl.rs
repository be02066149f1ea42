//! Access lists as stored on plugin entities.

use std::fmt;

/// Action an access list gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    See,
    Join,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::See => f.write_str("see"),
            Self::Join => f.write_str("join"),
        }
    }
}

/// Role and player restrictions for one action.
///
/// An empty list places no restriction. When both lists are non-empty the
/// actor must satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessList {
    pub roles: Vec<String>,
    pub players: Vec<String>,
}

impl AccessList {
    pub fn new(roles: Vec<String>, players: Vec<String>) -> Self {
        Self { roles, players }
    }

    /// Returns true if neither list restricts the action.
    pub fn is_open(&self) -> bool {
        self.roles.is_empty() && self.players.is_empty()
    }

    pub fn names_player(&self, actor: &str) -> bool {
        self.players.iter().any(|p| p == actor)
    }

    /// Returns true if any of `held` appears in the role list.
    pub fn admits_any_role<S: AsRef<str>>(&self, held: &[S]) -> bool {
        held.iter().any(|h| self.roles.iter().any(|r| r == h.as_ref()))
    }
}

/// Independent visibility and joinability lists for one entity.
///
/// Joinability never implies visibility or the reverse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControl {
    pub see: AccessList,
    pub join: AccessList,
}

impl AccessControl {
    pub fn new(see: AccessList, join: AccessList) -> Self {
        Self { see, join }
    }

    pub fn list(&self, action: Action) -> &AccessList {
        match action {
            Action::See => &self.see,
            Action::Join => &self.join,
        }
    }

    pub fn list_mut(&mut self, action: Action) -> &mut AccessList {
        match action {
            Action::See => &mut self.see,
            Action::Join => &mut self.join,
        }
    }
}
