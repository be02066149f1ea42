//! Decoding of inbound plugin calls.

use crate::error::PluginError;
use grounds_rpc::Request;
use grounds_rpc::protocol::{EXTENSION_ID, PLUGIN_CALL_ARGUMENTS, PLUGIN_CALL_ID};
use serde_json::{Map, Value};
use thiserror::Error;

/// Why an inbound request is not a valid plugin call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallDecodeError {
    #[error("Parameters are not an object")]
    ParamsNotObject,

    #[error("Plugin call ID not a string")]
    CallIdNotString,

    #[error("Extension ID not a string")]
    ExtensionIdNotString,

    #[error("Plugin call arguments not a string list")]
    ArgumentsNotList,

    #[error("Element {0} in plugin call arguments is not a string")]
    ArgumentNotString(usize),
}

/// One decoded plugin call: who is calling, on behalf of which extension,
/// with which arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginCall {
    pub id: String,
    pub method: String,
    pub extension_id: String,
    pub arguments: Vec<String>,
}

impl PluginCall {
    /// Extracts the reserved call parameters from `request`.
    pub fn from_request(request: &Request) -> Result<Self, CallDecodeError> {
        let params = request.params_object().ok_or(CallDecodeError::ParamsNotObject)?;

        let id = params
            .get(PLUGIN_CALL_ID)
            .and_then(Value::as_str)
            .ok_or(CallDecodeError::CallIdNotString)?;
        let extension_id = params
            .get(EXTENSION_ID)
            .and_then(Value::as_str)
            .ok_or(CallDecodeError::ExtensionIdNotString)?;
        let raw = params
            .get(PLUGIN_CALL_ARGUMENTS)
            .and_then(Value::as_array)
            .ok_or(CallDecodeError::ArgumentsNotList)?;

        let arguments = raw
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or(CallDecodeError::ArgumentNotString(i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: id.to_string(),
            method: request.method.clone(),
            extension_id: extension_id.to_string(),
            arguments,
        })
    }

    /// Argument 0, which selects the handler within a method.
    pub fn subcommand(&self) -> Option<&str> {
        self.argument(0)
    }

    pub fn argument(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// Fails unless there are exactly `expected` arguments, subcommand
    /// included.
    pub fn check_argument_count(&self, expected: usize) -> Result<(), PluginError> {
        if self.arguments.len() != expected {
            return Err(PluginError::InvalidArguments(format!(
                "Expected {expected} plugin call arguments, got {}",
                self.arguments.len()
            )));
        }
        Ok(())
    }

    pub fn check_argument_count_at_least(&self, expected: usize) -> Result<(), PluginError> {
        if self.arguments.len() < expected {
            return Err(PluginError::InvalidArguments(format!(
                "Expected at least {expected} plugin call arguments, got {}",
                self.arguments.len()
            )));
        }
        Ok(())
    }

    /// Decodes argument 0 as a JSON object. Event-triggered calls carry
    /// their event this way.
    pub fn event_payload(&self) -> Result<Map<String, Value>, PluginError> {
        let raw = self
            .subcommand()
            .ok_or_else(|| PluginError::InvalidArguments("Missing event payload".to_string()))?;
        serde_json::from_str(raw)
            .map_err(|e| PluginError::InvalidArguments(format!("Invalid event payload: {e}")))
    }
}
