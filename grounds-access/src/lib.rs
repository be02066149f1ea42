//! Visibility and joinability checks for plugin entities.
//!
//! An entity carries two independent [`AccessList`]s, one for seeing it and
//! one for joining it. Each list restricts by role, by player name, or both
//! (conjunctively). A configurable superuser passes every check, and a
//! failed role lookup denies rather than errors.

mod acl;
mod engine;

pub use acl::{AccessControl, AccessList, Action};
pub use engine::{
    AccessEngine, DEFAULT_SUPERUSER, NamedSuperuser, NoSuperuser, PrivilegePolicy, RoleLookup,
    superuser_policy,
};

/// Errors from access collaborators. The engine itself never returns these.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    #[error("failed to look up roles of {actor}: {source}")]
    RoleLookup {
        actor: String,
        #[source]
        source: grounds_rpc::RpcError,
    },
}
