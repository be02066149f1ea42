//! In-memory attribute store for tests.

use super::ApiTransport;
use crate::error::RpcResult;
use crate::message::{Record, Table};
use crate::protocol::{ErrorObject, PLUGIN_CALL_ID, Params, Request, Response, codes};
use async_trait::async_trait;
use grounds_attr::{Attr, AttrType};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

/// A message delivered through `sendMessage` or `sendMessageToCaller`.
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub recipient: String,
    pub message: Option<String>,
    pub header: Option<String>,
    pub record: Option<Record>,
    pub table: Option<Table>,
}

#[derive(Debug, Default)]
struct State {
    things: HashMap<String, Vec<Attr>>,
    caller: String,
    timezone: String,
    roles: HashMap<String, Vec<String>>,
    failures: HashMap<String, ErrorObject>,
    sent: Vec<SentMessage>,
    requests: Vec<Request>,
}

/// Answers store methods from memory and records every request.
///
/// Attributes keep insertion order per thing. Unknown things, attributes
/// and players answer with the not-found code, like the real store.
#[derive(Debug)]
pub struct MockStore {
    state: Mutex<State>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                caller: "caller".to_string(),
                timezone: "UTC".to_string(),
                ..State::default()
            }),
        }
    }

    pub fn with_caller(self, name: impl Into<String>) -> Self {
        self.state.lock().unwrap().caller = name.into();
        self
    }

    pub fn with_timezone(self, timezone: impl Into<String>) -> Self {
        self.state.lock().unwrap().timezone = timezone.into();
        self
    }

    /// Registers a player and the roles it holds.
    pub fn with_roles(self, player: impl Into<String>, roles: &[&str]) -> Self {
        self.state
            .lock()
            .unwrap()
            .roles
            .insert(player.into(), roles.iter().map(|r| r.to_string()).collect());
        self
    }

    /// Creates a thing with no attributes.
    pub fn with_thing(self, thing_id: impl Into<String>) -> Self {
        self.state.lock().unwrap().things.entry(thing_id.into()).or_default();
        self
    }

    pub fn with_attr(self, thing_id: impl Into<String>, attr: Attr) -> Self {
        upsert(self.state.lock().unwrap().things.entry(thing_id.into()).or_default(), attr);
        self
    }

    /// Makes every call to `method` fail with the given error.
    pub fn with_failure(self, method: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(method.into(), ErrorObject::new(code, message));
        self
    }

    pub fn attr(&self, thing_id: &str, name: &str) -> Option<Attr> {
        let state = self.state.lock().unwrap();
        state.things.get(thing_id)?.iter().find(|a| a.name == name).cloned()
    }

    pub fn attr_names(&self, thing_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .things
            .get(thing_id)
            .map(|attrs| attrs.iter().map(|a| a.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<SentMessage> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Text messages delivered to `recipient`, in order.
    pub fn messages_to(&self, recipient: &str) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|m| m.recipient == recipient)
            .filter_map(|m| m.message)
            .collect()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Requests for `method`, in order.
    pub fn requests_for(&self, method: &str) -> Vec<Request> {
        self.requests().into_iter().filter(|r| r.method == method).collect()
    }

    fn dispatch(state: &mut State, method: &str, params: &Params) -> Result<Value, ErrorObject> {
        if let Some(failure) = state.failures.get(method) {
            return Err(failure.clone());
        }
        if !params.contains_key(PLUGIN_CALL_ID) {
            return Err(ErrorObject::new(codes::INVALID_PARAMS, "Plugin call ID missing"));
        }

        match method {
            "getAttr" => {
                let thing_id = string_param(params, "thingId")?;
                let name = string_param(params, "name")?;
                let attrs = thing(state, thing_id)?;
                attrs
                    .iter()
                    .find(|a| a.name == name)
                    .map(|a| json!(a))
                    .ok_or_else(|| not_found(format!("Attribute {name} not found")))
            }
            "getAttrNames" => {
                let thing_id = string_param(params, "thingId")?;
                let names: Vec<&str> = thing(state, thing_id)?.iter().map(|a| a.name.as_str()).collect();
                Ok(json!(names))
            }
            "setAttr" => {
                let thing_id = string_param(params, "thingId")?.to_string();
                let name = string_param(params, "name")?;
                let value = string_param(params, "value")?;
                let attr_type: AttrType = string_param(params, "type")?
                    .parse()
                    .map_err(|e: grounds_attr::AttrError| ErrorObject::new(codes::INVALID_PARAMS, e.to_string()))?;
                let attr = Attr::new(name, value, attr_type);
                upsert(state.things.entry(thing_id).or_default(), attr);
                Ok(Value::String(String::new()))
            }
            "removeAttr" => {
                let thing_id = string_param(params, "thingId")?.to_string();
                let name = string_param(params, "name")?.to_string();
                let attrs = state
                    .things
                    .get_mut(&thing_id)
                    .ok_or_else(|| not_found(format!("Thing {thing_id} not found")))?;
                attrs.retain(|a| a.name != name);
                Ok(Value::String(String::new()))
            }
            "getCallerName" => Ok(Value::String(state.caller.clone())),
            "getCallerTimezone" => Ok(Value::String(state.timezone.clone())),
            "getRoles" => {
                let player = string_param(params, "playerName")?;
                state
                    .roles
                    .get(player)
                    .map(|roles| json!(roles))
                    .ok_or_else(|| not_found(format!("Player {player} not found")))
            }
            "sendMessage" => {
                let recipient = string_param(params, "playerName")?.to_string();
                let message = string_param(params, "message")?.to_string();
                state.sent.push(SentMessage {
                    recipient,
                    message: Some(message),
                    header: None,
                    record: None,
                    table: None,
                });
                Ok(Value::String(String::new()))
            }
            "sendMessageToCaller" => {
                let sent = SentMessage {
                    recipient: state.caller.clone(),
                    message: optional_string(params, "message"),
                    header: optional_string(params, "header"),
                    record: optional_payload(params, "record")?,
                    table: optional_payload(params, "table")?,
                };
                state.sent.push(sent);
                Ok(Value::String(String::new()))
            }
            other => Err(ErrorObject::new(
                codes::METHOD_NOT_FOUND,
                format!("Unrecognized method {other}"),
            )),
        }
    }
}

#[async_trait]
impl ApiTransport for MockStore {
    async fn round_trip(&self, request: Request) -> RpcResult<Response> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        let params = request.params_object().cloned().unwrap_or_default();
        let response = match Self::dispatch(&mut state, &request.method, &params) {
            Ok(result) => Response::success(request.id, result),
            Err(error) => Response {
                error: Some(error),
                ..Response::error(request.id, 0, "")
            },
        };
        Ok(response)
    }
}

fn upsert(attrs: &mut Vec<Attr>, attr: Attr) {
    match attrs.iter_mut().find(|a| a.name == attr.name) {
        Some(slot) => *slot = attr,
        None => attrs.push(attr),
    }
}

fn thing<'a>(state: &'a State, thing_id: &str) -> Result<&'a Vec<Attr>, ErrorObject> {
    state
        .things
        .get(thing_id)
        .ok_or_else(|| not_found(format!("Thing {thing_id} not found")))
}

fn not_found(message: String) -> ErrorObject {
    ErrorObject::new(codes::NOT_FOUND, message)
}

fn string_param<'a>(params: &'a Params, name: &str) -> Result<&'a str, ErrorObject> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| ErrorObject::new(codes::INVALID_PARAMS, format!("Missing string parameter {name}")))
}

fn optional_string(params: &Params, name: &str) -> Option<String> {
    params.get(name).and_then(Value::as_str).map(str::to_string)
}

fn optional_payload<T: serde::de::DeserializeOwned>(params: &Params, name: &str) -> Result<Option<T>, ErrorObject> {
    params
        .get(name)
        .map(|v| serde_json::from_value(v.clone()))
        .transpose()
        .map_err(|e| ErrorObject::new(codes::INVALID_PARAMS, format!("Invalid {name}: {e}")))
}
