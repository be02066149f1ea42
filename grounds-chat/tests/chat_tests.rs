use grounds_attr::Attr;
use grounds_chat::{Channel, dispatcher};
use grounds_plugin::{Dispatcher, PluginConfig};
use grounds_rpc::message::Record;
use grounds_rpc::transport::mock::MockStore;
use grounds_rpc::{ApiTransport, Request, Response, codes};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

const EXT: &str = "ext-chat";

fn channel(name: &str, members: &[&str]) -> Channel {
    let mut channel = Channel::new(name);
    channel.members = members.iter().map(|m| m.to_string()).collect();
    channel
}

fn stored(channel: &Channel) -> Attr {
    channel.to_attr().unwrap()
}

fn chat(store: &Arc<MockStore>) -> Dispatcher {
    let transport: Arc<dyn ApiTransport> = store.clone();
    dispatcher(transport, PluginConfig::default())
}

fn request(method: &str, args: &[&str]) -> Request {
    serde_json::from_value(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method,
        "params": {
            "_plugin_call_id": "pc-1",
            "_extension_id": EXT,
            "_plugin_call_arguments": args,
        },
    }))
    .unwrap()
}

async fn call(store: &Arc<MockStore>, method: &str, args: &[&str]) -> Response {
    chat(store).handle(&request(method, args)).await
}

fn error_message(response: &Response) -> String {
    response.error.as_ref().map(|e| e.message.clone()).unwrap_or_default()
}

fn load(store: &MockStore, name: &str) -> Channel {
    Channel::from_attr(&store.attr(EXT, name).unwrap()).unwrap()
}

fn lounge_store(caller: &str) -> Arc<MockStore> {
    Arc::new(
        MockStore::new()
            .with_caller(caller)
            .with_attr(EXT, stored(&channel("#lounge", &["Alice", "Bob"])))
            .with_attr(EXT, stored(&channel("#other", &["Alice"]))),
    )
}

// ── Scenario ─────────────────────────────────────────────────────

#[tokio::test]
async fn open_channel_join_then_non_member_say_is_denied() {
    let store = lounge_store("Carol");

    let response = call(&store, "chat", &["join", "#lounge"]).await;
    assert!(response.is_success(), "{response:?}");
    assert_eq!(response.result, Some(json!("")));
    assert!(load(&store, "#lounge").is_member("Carol"));
    assert_eq!(load(&store, "#lounge").members, vec!["Alice", "Bob", "Carol"]);

    let response = call(&store, "chat", &["say", "#other", "hello"]).await;
    assert_eq!(error_message(&response), "You do not belong to #other");
    assert_eq!(response.error.unwrap().code, codes::INTERNAL_ERROR);
}

#[tokio::test]
async fn say_reaches_every_member() {
    let store = lounge_store("Bob");

    let response = call(&store, "chat", &["say", "#lounge", "hi all"]).await;
    assert!(response.is_success());
    assert_eq!(store.messages_to("Alice"), vec!["[#lounge] Bob: hi all"]);
    assert_eq!(store.messages_to("Bob"), vec!["[#lounge] Bob: hi all"]);
}

#[tokio::test]
async fn say_with_wrong_argument_count_is_rejected_before_io() {
    let store = lounge_store("Bob");

    let response = call(&store, "chat", &["say", "#lounge"]).await;
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
    assert!(store.requests().is_empty());
}

#[tokio::test]
async fn missing_channel_is_not_found() {
    let store = lounge_store("Carol");

    for args in [
        vec!["join", "#doesnotexist"],
        vec!["say", "#doesnotexist", "x"],
        vec!["members", "#doesnotexist"],
    ] {
        let response = call(&store, "chat", &args).await;
        assert_eq!(error_message(&response), "Channel #doesnotexist not found");
    }
}

#[tokio::test]
async fn invalid_channel_name_is_rejected() {
    let store = lounge_store("Carol");

    let response = call(&store, "chat", &["join", "lounge"]).await;
    assert_eq!(error_message(&response), "That is not a valid channel name");
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
}

// ── Visibility and joinability ───────────────────────────────────

#[tokio::test]
async fn invisible_channel_looks_missing() {
    let mut secret = channel("#secret", &["Alice"]);
    secret.acl.see.players = vec!["Alice".into()];
    let store = Arc::new(MockStore::new().with_caller("Carol").with_attr(EXT, stored(&secret)));

    let response = call(&store, "chat", &["join", "#secret"]).await;
    assert_eq!(error_message(&response), "Channel #secret not found");

    let response = call(&store, "chat", &["list"]).await;
    assert!(response.is_success());
    assert_eq!(store.messages_to("Carol"), vec!["No channels found"]);
}

#[tokio::test]
async fn visible_but_not_joinable() {
    let mut staff = channel("#staff", &[]);
    staff.acl.join.roles = vec!["STAFF".into()];
    let store = Arc::new(
        MockStore::new()
            .with_caller("Carol")
            .with_roles("Carol", &["BARD"])
            .with_attr(EXT, stored(&staff)),
    );

    let response = call(&store, "chat", &["join", "#staff"]).await;
    assert_eq!(error_message(&response), "You may not join #staff");
    assert!(store.requests_for("setAttr").is_empty());
}

#[tokio::test]
async fn role_lookup_failure_denies_join() {
    let mut staff = channel("#staff", &[]);
    staff.acl.join.roles = vec!["STAFF".into()];
    let store = Arc::new(MockStore::new().with_caller("Carol").with_attr(EXT, stored(&staff)));

    let response = call(&store, "chat", &["join", "#staff"]).await;
    assert_eq!(error_message(&response), "You may not join #staff");
}

#[tokio::test]
async fn superuser_joins_restricted_channel() {
    let mut vault = channel("#vault", &[]);
    vault.acl.see.players = vec!["Alice".into()];
    vault.acl.join.roles = vec!["KEYHOLDER".into()];
    let store = Arc::new(MockStore::new().with_caller("GOD").with_attr(EXT, stored(&vault)));

    let response = call(&store, "chat", &["join", "#vault"]).await;
    assert!(response.is_success());
    assert!(load(&store, "#vault").is_member("GOD"));
}

#[tokio::test]
async fn join_writes_with_extension_authority() {
    let store = lounge_store("Carol");

    call(&store, "chat", &["join", "#lounge"]).await;

    let writes = store.requests_for("setAttr");
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].params_object().unwrap()["_as_extension"], json!(true));
}

#[tokio::test]
async fn joining_twice_only_informs() {
    let store = lounge_store("Alice");

    let response = call(&store, "chat", &["join", "#lounge"]).await;
    assert!(response.is_success());
    assert_eq!(store.messages_to("Alice"), vec!["You are already a member of #lounge"]);
    assert!(store.requests_for("setAttr").is_empty());
}

// ── Leave, list, mine, members ───────────────────────────────────

#[tokio::test]
async fn leave_removes_member() {
    let store = lounge_store("Bob");

    let response = call(&store, "chat", &["leave", "#lounge"]).await;
    assert!(response.is_success());
    assert_eq!(load(&store, "#lounge").members, vec!["Alice"]);

    call(&store, "chat", &["leave", "#lounge"]).await;
    assert_eq!(store.messages_to("Bob"), vec!["You are not a member of #lounge"]);
}

#[tokio::test]
async fn list_and_mine_are_sorted() {
    let store = Arc::new(
        MockStore::new()
            .with_caller("Alice")
            .with_attr(EXT, stored(&channel("#zeta", &["Alice"])))
            .with_attr(EXT, stored(&channel("#alpha", &[])))
            .with_attr(EXT, stored(&channel("#mid", &["Alice"])))
            .with_attr(EXT, Attr::string("motd", "not a channel")),
    );

    call(&store, "chat", &["list"]).await;
    call(&store, "chat", &["mine"]).await;

    let sent = store.messages();
    assert_eq!(sent[0].message.as_deref(), Some("#alpha\n#mid\n#zeta"));
    assert_eq!(sent[0].header.as_deref(), Some("Channels:"));
    assert_eq!(sent[1].message.as_deref(), Some("#mid\n#zeta"));
    assert_eq!(sent[1].header.as_deref(), Some("Your channels:"));
}

#[tokio::test]
async fn members_lists_for_members_only() {
    let store = lounge_store("Alice");
    call(&store, "chat", &["members", "#lounge"]).await;
    let sent = store.messages();
    assert_eq!(sent[0].message.as_deref(), Some("Alice\nBob"));
    assert_eq!(sent[0].header.as_deref(), Some("Members of #lounge"));

    let store = lounge_store("Carol");
    call(&store, "chat", &["members", "#lounge"]).await;
    assert_eq!(store.messages_to("Carol"), vec!["You are not a member of #lounge"]);
}

// ── Admin ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_requires_absence_and_writes_as_caller() {
    let store = lounge_store("Wizard");

    let response = call(&store, "chatadmin", &["create", "#new"]).await;
    assert!(response.is_success());
    assert_eq!(load(&store, "#new"), Channel::new("#new"));
    assert_eq!(store.messages_to("Wizard"), vec!["Created channel #new"]);
    let write = &store.requests_for("setAttr")[0];
    assert_eq!(write.params_object().unwrap()["_as_extension"], json!(false));

    let response = call(&store, "chatadmin", &["create", "#lounge"]).await;
    assert_eq!(error_message(&response), "Channel #lounge already exists");
}

#[tokio::test]
async fn create_propagates_non_not_found_failures() {
    let store = Arc::new(
        MockStore::new()
            .with_thing(EXT)
            .with_failure("getAttr", codes::INTERNAL_ERROR, "store exploded"),
    );

    let response = call(&store, "chatadmin", &["create", "#new"]).await;
    assert_eq!(error_message(&response), "store exploded");
    assert!(store.requests_for("setAttr").is_empty());
}

#[tokio::test]
async fn delete_requires_presence() {
    let store = lounge_store("Wizard");

    let response = call(&store, "chatadmin", &["delete", "#lounge"]).await;
    assert!(response.is_success());
    assert_eq!(store.attr(EXT, "#lounge"), None);

    let response = call(&store, "chatadmin", &["delete", "#lounge"]).await;
    assert_eq!(error_message(&response), "Channel #lounge does not exist");
}

#[tokio::test]
async fn inspect_sends_record() {
    let mut lounge = channel("#lounge", &["Alice", "Bob"]);
    lounge.acl.see.roles = vec!["R1".into(), "R2".into()];
    lounge.acl.join.players = vec!["Alice".into()];
    let store = Arc::new(MockStore::new().with_caller("Wizard").with_attr(EXT, stored(&lounge)));

    call(&store, "chatadmin", &["inspect", "#lounge"]).await;

    let sent = store.messages();
    assert_eq!(sent[0].header.as_deref(), Some("Channel details:"));
    assert_eq!(
        sent[0].record,
        Some(
            Record::new()
                .field("Name", "#lounge")
                .field("Members", "Alice,Bob")
                .field("Visible to roles", "R1,R2")
                .field("Joinable by roles", "")
                .field("Visible to players", "")
                .field("Joinable by players", "Alice")
        )
    );
}

#[tokio::test]
async fn set_visibility_and_joinability_are_independent() {
    let store = lounge_store("Wizard");

    let response = call(&store, "chatadmin", &["set_visibility", "#lounge", "roles=R1,R2", "players=Alice"]).await;
    assert!(response.is_success());
    let response = call(&store, "chatadmin", &["set_joinability", "#lounge", "players=Bob"]).await;
    assert!(response.is_success());

    let lounge = load(&store, "#lounge");
    assert_eq!(lounge.acl.see.roles, vec!["R1", "R2"]);
    assert_eq!(lounge.acl.see.players, vec!["Alice"]);
    assert!(lounge.acl.join.roles.is_empty());
    assert_eq!(lounge.acl.join.players, vec!["Bob"]);
    assert_eq!(lounge.members, vec!["Alice", "Bob"]);
    assert_eq!(
        store.messages_to("Wizard"),
        vec!["Updated channel #lounge", "Updated channel #lounge"]
    );
}

#[tokio::test]
async fn empty_access_value_clears_list() {
    let mut lounge = channel("#lounge", &[]);
    lounge.acl.see.roles = vec!["R1".into()];
    let store = Arc::new(MockStore::new().with_caller("Wizard").with_attr(EXT, stored(&lounge)));

    call(&store, "chatadmin", &["set_visibility", "#lounge", "roles="]).await;

    assert!(load(&store, "#lounge").acl.see.roles.is_empty());
}

#[tokio::test]
async fn unsupported_access_argument_writes_nothing() {
    let store = lounge_store("Wizard");

    let response = call(&store, "chatadmin", &["set_visibility", "#lounge", "roles=R1", "colour=red"]).await;
    assert_eq!(error_message(&response), "Unsupported argument colour=red");
    assert!(store.requests_for("setAttr").is_empty());
}

#[tokio::test]
async fn admin_membership_changes_write_as_caller() {
    let store = lounge_store("Wizard");

    call(&store, "chatadmin", &["add_member", "Carol", "#lounge"]).await;
    call(&store, "chatadmin", &["remove_member", "Alice", "#lounge"]).await;
    call(&store, "chatadmin", &["add_member", "Bob", "#lounge"]).await;
    call(&store, "chatadmin", &["remove_member", "Zed", "#lounge"]).await;

    assert_eq!(load(&store, "#lounge").members, vec!["Bob", "Carol"]);
    assert_eq!(
        store.messages_to("Wizard"),
        vec!["Bob is already a member of #lounge", "Zed is not a member of #lounge"]
    );
    for write in store.requests_for("setAttr") {
        assert_eq!(write.params_object().unwrap()["_as_extension"], json!(false));
    }
}

#[tokio::test]
async fn unstorable_member_names_are_rejected_before_any_call() {
    let store = lounge_store("Wizard");

    let response = call(&store, "chatadmin", &["add_member", "Dave,Eve", "#lounge"]).await;
    assert_eq!(error_message(&response), "'Dave,Eve' is not a valid player name");
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);

    let response = call(&store, "chatadmin", &["add_member", "", "#lounge"]).await;
    assert_eq!(error_message(&response), "'' is not a valid player name");

    let response = call(&store, "chatadmin", &["remove_member", "Alice,Bob", "#lounge"]).await;
    assert_eq!(error_message(&response), "'Alice,Bob' is not a valid player name");

    assert!(store.requests().is_empty());
    assert_eq!(load(&store, "#lounge").members, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn empty_names_in_access_lists_are_rejected() {
    let store = lounge_store("Wizard");

    let response = call(&store, "chatadmin", &["set_visibility", "#lounge", "players=a,,b"]).await;
    assert_eq!(error_message(&response), "Empty name in argument players=a,,b");
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);

    let response = call(&store, "chatadmin", &["set_joinability", "#lounge", "roles=R1,"]).await;
    assert_eq!(error_message(&response), "Empty name in argument roles=R1,");

    assert!(store.requests_for("setAttr").is_empty());
    let lounge = load(&store, "#lounge");
    assert!(lounge.acl.see.players.is_empty());
    assert!(lounge.acl.join.roles.is_empty());
}

// ── Guest auto-join ──────────────────────────────────────────────

fn yoinked(name: &str, thing_type: &str) -> String {
    json!({"yoinkedThingName": name, "yoinkedThingType": thing_type}).to_string()
}

#[tokio::test]
async fn guest_player_joins_guest_channel_once() {
    let store = Arc::new(MockStore::new().with_attr(EXT, stored(&channel("#guest", &[]))));

    let payload = yoinked("guest42", "Player");
    call(&store, "chatguestautojoin", &[payload.as_str()]).await;
    let response = call(&store, "chatguestautojoin", &[payload.as_str()]).await;

    assert!(response.is_success());
    assert_eq!(load(&store, "#guest").members, vec!["guest42"]);
    assert_eq!(store.requests_for("setAttr").len(), 1);
}

#[tokio::test]
async fn non_guests_are_ignored() {
    let store = Arc::new(MockStore::new().with_attr(EXT, stored(&channel("#guest", &[]))));

    call(&store, "chatguestautojoin", &[yoinked("alice", "Player").as_str()]).await;
    call(&store, "chatguestautojoin", &[yoinked("guestbook", "Thing").as_str()]).await;

    assert!(load(&store, "#guest").members.is_empty());
    assert!(store.requests().is_empty());
}

#[tokio::test]
async fn bad_payload_is_invalid_params() {
    let store = Arc::new(MockStore::new());

    let response = call(&store, "chatguestautojoin", &["{}"]).await;
    assert_eq!(response.error.unwrap().code, codes::INVALID_PARAMS);
}
