//! Property-based tests for access evaluation.
//!
//! - The superuser passes any list.
//! - A player-only list admits exactly the named players.
//! - Adding a restriction never admits an actor who was denied before.

use async_trait::async_trait;
use grounds_access::{AccessEngine, AccessError, AccessList, NamedSuperuser, NoSuperuser, RoleLookup};
use proptest::prelude::*;

/// Every actor holds the roles named after the first letter of their name.
struct InitialRoles;

#[async_trait]
impl RoleLookup for InitialRoles {
    async fn roles_of(&self, actor: &str) -> Result<Vec<String>, AccessError> {
        Ok(actor.chars().take(1).map(|c| c.to_string()).collect())
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-E][a-z]{0,4}", 0..5)
}

fn roles() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-E]", 0..3)
}

proptest! {
    #[test]
    fn superuser_passes_any_list(roles in roles(), players in names()) {
        let policy = NamedSuperuser::default();
        let engine = AccessEngine::new(&InitialRoles, &policy);
        let list = AccessList::new(roles, players);
        prop_assert!(block_on(engine.permits(&list, "GOD")));
    }

    #[test]
    fn player_list_admits_exactly_named(players in names(), actor in "[A-E][a-z]{0,4}") {
        let engine = AccessEngine::new(&InitialRoles, &NoSuperuser);
        let list = AccessList::new(Vec::new(), players.clone());
        let expected = players.is_empty() || players.contains(&actor);
        prop_assert_eq!(block_on(engine.permits(&list, &actor)), expected);
    }

    #[test]
    fn adding_players_never_widens_role_list(
        roles in roles(),
        players in names(),
        actor in "[A-E][a-z]{0,4}",
    ) {
        let engine = AccessEngine::new(&InitialRoles, &NoSuperuser);
        let role_only = AccessList::new(roles.clone(), Vec::new());
        let both = AccessList::new(roles, players);
        let before = block_on(engine.permits(&role_only, &actor));
        let after = block_on(engine.permits(&both, &actor));
        prop_assert!(!after || before);
    }
}
