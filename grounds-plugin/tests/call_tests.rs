use grounds_plugin::{CallDecodeError, PluginCall, PluginError};
use grounds_rpc::Request;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn request(params: Value) -> Request {
    serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "method": "chat", "params": params})).unwrap()
}

fn valid(args: Value) -> Request {
    request(json!({
        "_plugin_call_id": "pc-7",
        "_extension_id": "ext-3",
        "_plugin_call_arguments": args,
    }))
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn decodes_reserved_params() {
    let call = PluginCall::from_request(&valid(json!(["say", "#lounge", "hi there"]))).unwrap();
    assert_eq!(
        call,
        PluginCall {
            id: "pc-7".into(),
            method: "chat".into(),
            extension_id: "ext-3".into(),
            arguments: vec!["say".into(), "#lounge".into(), "hi there".into()],
        }
    );
    assert_eq!(call.subcommand(), Some("say"));
    assert_eq!(call.argument(2), Some("hi there"));
    assert_eq!(call.argument(3), None);
}

#[test]
fn empty_argument_list_decodes() {
    let call = PluginCall::from_request(&valid(json!([]))).unwrap();
    assert!(call.arguments.is_empty());
    assert_eq!(call.subcommand(), None);
}

#[test]
fn missing_or_mistyped_fields_are_rejected() {
    let no_id = request(json!({"_extension_id": "e", "_plugin_call_arguments": []}));
    assert_eq!(PluginCall::from_request(&no_id), Err(CallDecodeError::CallIdNotString));

    let bad_ext = request(json!({"_plugin_call_id": "p", "_extension_id": 3, "_plugin_call_arguments": []}));
    assert_eq!(PluginCall::from_request(&bad_ext), Err(CallDecodeError::ExtensionIdNotString));

    let no_args = request(json!({"_plugin_call_id": "p", "_extension_id": "e"}));
    assert_eq!(PluginCall::from_request(&no_args), Err(CallDecodeError::ArgumentsNotList));

    let args_string = request(json!({"_plugin_call_id": "p", "_extension_id": "e", "_plugin_call_arguments": "say"}));
    assert_eq!(PluginCall::from_request(&args_string), Err(CallDecodeError::ArgumentsNotList));
}

#[test]
fn non_string_argument_is_reported_by_index() {
    let err = PluginCall::from_request(&valid(json!(["say", 5]))).unwrap_err();
    assert_eq!(err, CallDecodeError::ArgumentNotString(1));
    assert_eq!(err.to_string(), "Element 1 in plugin call arguments is not a string");
}

#[test]
fn non_object_params_are_rejected() {
    let array: Request =
        serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "method": "chat", "params": ["x"]})).unwrap();
    assert_eq!(PluginCall::from_request(&array), Err(CallDecodeError::ParamsNotObject));
}

// ── Argument checks ──────────────────────────────────────────────

#[test]
fn exact_argument_count() {
    let call = PluginCall::from_request(&valid(json!(["join", "#lounge"]))).unwrap();
    assert!(call.check_argument_count(2).is_ok());

    let err = call.check_argument_count(3).unwrap_err();
    assert!(matches!(err, PluginError::InvalidArguments(_)));
    assert_eq!(err.to_string(), "Expected 3 plugin call arguments, got 2");
}

#[test]
fn minimum_argument_count() {
    let call = PluginCall::from_request(&valid(json!(["create", "a", "b"]))).unwrap();
    assert!(call.check_argument_count_at_least(2).is_ok());
    assert!(call.check_argument_count_at_least(3).is_ok());
    assert_eq!(
        call.check_argument_count_at_least(4).unwrap_err().to_string(),
        "Expected at least 4 plugin call arguments, got 3"
    );
}

#[test]
fn event_payload_decodes_first_argument() {
    let payload = r#"{"yoinkedThingName":"guest1","yoinkedThingType":"Player"}"#;
    let call = PluginCall::from_request(&valid(json!([payload]))).unwrap();

    let event = call.event_payload().unwrap();
    assert_eq!(event["yoinkedThingName"], json!("guest1"));
    assert_eq!(event["yoinkedThingType"], json!("Player"));
}

#[test]
fn event_payload_must_be_an_object() {
    let call = PluginCall::from_request(&valid(json!(["not json"]))).unwrap();
    assert!(matches!(call.event_payload(), Err(PluginError::InvalidArguments(_))));
}
