//! Permission evaluation.

use crate::AccessError;
use crate::acl::{AccessControl, AccessList, Action};
use async_trait::async_trait;
use grounds_rpc::ApiClient;
use tracing::{debug, warn};

/// Default name of the actor that bypasses every access list.
pub const DEFAULT_SUPERUSER: &str = "GOD";

/// Answers which roles an actor holds.
#[async_trait]
pub trait RoleLookup: Send + Sync {
    async fn roles_of(&self, actor: &str) -> Result<Vec<String>, AccessError>;
}

/// Role lookup through the store, authorized as the extension.
#[async_trait]
impl RoleLookup for ApiClient {
    async fn roles_of(&self, actor: &str) -> Result<Vec<String>, AccessError> {
        self.get_roles(actor, true)
            .await
            .map_err(|source| AccessError::RoleLookup {
                actor: actor.to_string(),
                source,
            })
    }
}

/// Decides whether an actor bypasses access lists entirely.
pub trait PrivilegePolicy: Send + Sync {
    fn is_privileged(&self, actor: &str) -> bool;
}

/// Grants the bypass to exactly one actor name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSuperuser(pub String);

impl Default for NamedSuperuser {
    fn default() -> Self {
        Self(DEFAULT_SUPERUSER.to_string())
    }
}

impl PrivilegePolicy for NamedSuperuser {
    fn is_privileged(&self, actor: &str) -> bool {
        actor == self.0
    }
}

/// Grants the bypass to nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSuperuser;

impl PrivilegePolicy for NoSuperuser {
    fn is_privileged(&self, _actor: &str) -> bool {
        false
    }
}

/// Builds the policy for a configured superuser name. An empty name
/// disables the bypass.
pub fn superuser_policy(name: &str) -> Box<dyn PrivilegePolicy> {
    if name.is_empty() {
        Box::new(NoSuperuser)
    } else {
        Box::new(NamedSuperuser(name.to_string()))
    }
}

/// Evaluates access lists for actors.
///
/// Never fails: a role lookup error denies the action.
pub struct AccessEngine<'a> {
    roles: &'a dyn RoleLookup,
    privilege: &'a dyn PrivilegePolicy,
}

impl<'a> AccessEngine<'a> {
    pub fn new(roles: &'a dyn RoleLookup, privilege: &'a dyn PrivilegePolicy) -> Self {
        Self { roles, privilege }
    }

    /// Returns true if `actor` passes `list`.
    ///
    /// Roles are only looked up when the role list is non-empty.
    pub async fn permits(&self, list: &AccessList, actor: &str) -> bool {
        if self.privilege.is_privileged(actor) {
            return true;
        }

        if !list.roles.is_empty() {
            let held = match self.roles.roles_of(actor).await {
                Ok(held) => held,
                Err(e) => {
                    // Fail closed.
                    warn!(actor, error = %e, "Role lookup failed, denying access");
                    return false;
                }
            };
            if !list.admits_any_role(&held) {
                return false;
            }
        }

        if !list.players.is_empty() && !list.names_player(actor) {
            return false;
        }

        true
    }

    pub async fn may(&self, action: Action, acl: &AccessControl, actor: &str) -> bool {
        let allowed = self.permits(acl.list(action), actor).await;
        debug!(actor, %action, allowed, "Evaluated access");
        allowed
    }

    pub async fn may_see(&self, acl: &AccessControl, actor: &str) -> bool {
        self.may(Action::See, acl, actor).await
    }

    pub async fn may_join(&self, acl: &AccessControl, actor: &str) -> bool {
        self.may(Action::Join, acl, actor).await
    }
}
