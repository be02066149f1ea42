//! Client for the attribute store's API methods.

use crate::error::{RpcError, RpcResult};
use crate::message::{Record, Table};
use crate::protocol::{AS_EXTENSION, PLUGIN_CALL_ID, Params, Request, RequestId};
use crate::transport::ApiTransport;
use grounds_attr::Attr;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::debug;

/// Issues store calls on behalf of one plugin call.
///
/// Every request carries the plugin call id so the engine can correlate it
/// with the invoking player. Attribute methods also take an `as_extension`
/// flag: `true` authorizes the request as the extension itself, `false` as
/// the invoking player.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn ApiTransport>,
    plugin_call_id: String,
    next_id: Arc<AtomicI64>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn ApiTransport>, plugin_call_id: impl Into<String>) -> Self {
        Self {
            transport,
            plugin_call_id: plugin_call_id.into(),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    pub fn plugin_call_id(&self) -> &str {
        &self.plugin_call_id
    }

    /// Calls `method` and decodes its result.
    ///
    /// Missing params are treated as an empty set before the correlation id
    /// is injected.
    pub async fn call<R: DeserializeOwned>(&self, method: &str, params: Option<Params>) -> RpcResult<R> {
        let mut params = params.unwrap_or_default();
        params.insert(PLUGIN_CALL_ID.to_string(), Value::String(self.plugin_call_id.clone()));

        let id = RequestId::Number(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(method, plugin_call_id = %self.plugin_call_id, request_id = %id, "Calling store");
        let response = self
            .transport
            .round_trip(Request::new(id.clone(), method, params))
            .await?;

        if let Some(error) = response.error {
            debug!(method, code = error.code, "Store returned error");
            return Err(error.into());
        }
        if response.id.as_ref() != Some(&id) {
            return Err(RpcError::MalformedResponse(format!(
                "response id {:?} does not match request id {id}",
                response.id
            )));
        }
        serde_json::from_value(response.result.unwrap_or(Value::Null)).map_err(|e| {
            RpcError::MalformedResponse(format!("unexpected result for {method}: {e}"))
        })
    }

    /// Calls a method whose result carries no information.
    async fn call_unit(&self, method: &str, params: Option<Params>) -> RpcResult<()> {
        self.call::<Value>(method, params).await.map(|_| ())
    }

    // ── Attributes ───────────────────────────────────────────────

    /// Returns whether `name` exists on `thing_id`. Not-found is `Ok(false)`;
    /// every other failure propagates.
    pub async fn has_attr(&self, thing_id: &str, name: &str, as_extension: bool) -> RpcResult<bool> {
        match self.get_attr(thing_id, name, as_extension).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub async fn get_attr(&self, thing_id: &str, name: &str, as_extension: bool) -> RpcResult<Attr> {
        require("thingId", thing_id)?;
        require("name", name)?;
        let params = params(json!({
            "thingId": thing_id,
            "name": name,
            AS_EXTENSION: as_extension,
        }));
        self.call("getAttr", Some(params)).await
    }

    pub async fn get_attr_names(&self, thing_id: &str, as_extension: bool) -> RpcResult<Vec<String>> {
        require("thingId", thing_id)?;
        let params = params(json!({
            "thingId": thing_id,
            AS_EXTENSION: as_extension,
        }));
        self.call("getAttrNames", Some(params)).await
    }

    /// Writes `attr`, replacing any attribute of the same name entirely.
    pub async fn set_attr(&self, thing_id: &str, attr: &Attr, as_extension: bool) -> RpcResult<()> {
        require("thingId", thing_id)?;
        require("name", &attr.name)?;
        let params = params(json!({
            "thingId": thing_id,
            "name": attr.name,
            "value": attr.value,
            "type": attr.attr_type,
            AS_EXTENSION: as_extension,
        }));
        self.call_unit("setAttr", Some(params)).await
    }

    pub async fn remove_attr(&self, thing_id: &str, name: &str, as_extension: bool) -> RpcResult<()> {
        require("thingId", thing_id)?;
        require("name", name)?;
        let params = params(json!({
            "thingId": thing_id,
            "name": name,
            AS_EXTENSION: as_extension,
        }));
        self.call_unit("removeAttr", Some(params)).await
    }

    /// Upserts `sub_attr` inside the list attribute `list_name`.
    ///
    /// Reads the list, replaces the field by name and writes the whole list
    /// back, all under the same `as_extension` authority. This is not
    /// atomic: a concurrent writer running the same sequence on the same
    /// list can interleave and one update is lost. There is no version
    /// check and no retry.
    pub async fn set_attr_in_attr_list_value(
        &self,
        thing_id: &str,
        list_name: &str,
        sub_attr: Attr,
        as_extension: bool,
    ) -> RpcResult<()> {
        let current = self.get_attr(thing_id, list_name, as_extension).await?;
        let updated = current.with_field(sub_attr)?;
        self.set_attr(thing_id, &updated, as_extension).await
    }

    // ── Caller ───────────────────────────────────────────────────

    pub async fn get_caller_name(&self) -> RpcResult<String> {
        self.call("getCallerName", None).await
    }

    /// Returns the caller's IANA time zone name.
    pub async fn get_caller_timezone(&self) -> RpcResult<String> {
        self.call("getCallerTimezone", None).await
    }

    pub async fn get_roles(&self, player_name: &str, as_extension: bool) -> RpcResult<Vec<String>> {
        require("playerName", player_name)?;
        let params = params(json!({
            "playerName": player_name,
            AS_EXTENSION: as_extension,
        }));
        self.call("getRoles", Some(params)).await
    }

    // ── Messages ─────────────────────────────────────────────────

    pub async fn send_message(&self, player_name: &str, message: &str) -> RpcResult<()> {
        let params = params(json!({
            "playerName": player_name,
            "message": message,
        }));
        self.call_unit("sendMessage", Some(params)).await
    }

    pub async fn send_message_to_caller(&self, message: &str) -> RpcResult<()> {
        let params = params(json!({ "message": message }));
        self.call_unit("sendMessageToCaller", Some(params)).await
    }

    pub async fn send_message_with_header_to_caller(&self, message: &str, header: &str) -> RpcResult<()> {
        let params = params(json!({
            "message": message,
            "header": header,
        }));
        self.call_unit("sendMessageToCaller", Some(params)).await
    }

    pub async fn send_record_to_caller(&self, record: &Record, header: &str) -> RpcResult<()> {
        let params = params(json!({
            "record": record,
            "header": header,
        }));
        self.call_unit("sendMessageToCaller", Some(params)).await
    }

    pub async fn send_table_to_caller(&self, table: &Table, header: &str) -> RpcResult<()> {
        let params = params(json!({
            "table": table,
            "header": header,
        }));
        self.call_unit("sendMessageToCaller", Some(params)).await
    }
}

fn params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

fn require(param: &str, value: &str) -> RpcResult<()> {
    if value.is_empty() {
        return Err(RpcError::InvalidParams(format!("Parameter {param} must not be empty")));
    }
    Ok(())
}
