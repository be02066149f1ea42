//! Routing of plugin calls to subcommand handlers.
//!
//! A call is routed in two steps. The JSON-RPC method picks a family
//! registered with [`Dispatcher::register`]; the family's [`Subcommand`]
//! type then picks a handler from the call arguments. Every inbound request
//! produces exactly one response, whatever the handler does.

use crate::call::PluginCall;
use crate::config::PluginConfig;
use crate::error::HandlerResult;
use async_trait::async_trait;
use grounds_access::{AccessEngine, PrivilegePolicy};
use grounds_rpc::{ApiClient, ApiTransport, Request, RequestId, Response, codes};
use serde_json::Value;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a handler needs for one call.
pub struct PluginContext {
    pub call: PluginCall,
    pub api: ApiClient,
    config: Arc<PluginConfig>,
    privilege: Arc<dyn PrivilegePolicy>,
}

impl PluginContext {
    pub fn new(
        call: PluginCall,
        api: ApiClient,
        config: Arc<PluginConfig>,
        privilege: Arc<dyn PrivilegePolicy>,
    ) -> Self {
        Self {
            call,
            api,
            config,
            privilege,
        }
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Id of the extension whose attributes this plugin manages.
    pub fn extension_id(&self) -> &str {
        &self.call.extension_id
    }

    /// Access engine resolving roles through the store.
    pub fn access(&self) -> AccessEngine<'_> {
        AccessEngine::new(&self.api, self.privilege.as_ref())
    }
}

/// A set of handlers sharing one JSON-RPC method.
#[async_trait]
pub trait Subcommand: Sized + Send {
    /// Picks the handler for `call`, or `None` if no handler matches.
    fn select(call: &PluginCall) -> Option<Self>;

    async fn run(self, ctx: &PluginContext) -> HandlerResult;
}

#[async_trait]
trait MethodFamily: Send + Sync {
    async fn handle(&self, ctx: &PluginContext) -> Option<HandlerResult>;
}

struct Family<C>(PhantomData<fn() -> C>);

#[async_trait]
impl<C: Subcommand + 'static> MethodFamily for Family<C> {
    async fn handle(&self, ctx: &PluginContext) -> Option<HandlerResult> {
        let command = C::select(&ctx.call)?;
        Some(command.run(ctx).await)
    }
}

/// Turns one request into one response.
pub struct Dispatcher {
    methods: HashMap<String, Box<dyn MethodFamily>>,
    transport: Arc<dyn ApiTransport>,
    config: Arc<PluginConfig>,
    privilege: Arc<dyn PrivilegePolicy>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn ApiTransport>, config: PluginConfig) -> Self {
        let privilege: Arc<dyn PrivilegePolicy> = Arc::from(config.privilege_policy());
        Self {
            methods: HashMap::new(),
            transport,
            config: Arc::new(config),
            privilege,
        }
    }

    /// Routes `method` to the handlers of `C`.
    pub fn register<C: Subcommand + 'static>(mut self, method: impl Into<String>) -> Self {
        self.methods
            .insert(method.into(), Box::new(Family::<C>(PhantomData)));
        self
    }

    /// Handles a decoded request.
    ///
    /// An unknown method is reported before the call parameters are looked
    /// at. Handler failures keep only their message.
    pub async fn handle(&self, request: &Request) -> Response {
        let id = request.id.clone();

        let Some(family) = self.methods.get(&request.method) else {
            debug!(method = %request.method, "Unrecognized method");
            return Response::error(
                id,
                codes::METHOD_NOT_FOUND,
                format!("Unrecognized method {}", request.method),
            );
        };

        let call = match PluginCall::from_request(request) {
            Ok(call) => call,
            Err(e) => {
                return Response::error(id, codes::INVALID_PARAMS, format!("Invalid plugin call: {e}"));
            }
        };
        if call.arguments.is_empty() {
            return Response::error(
                id,
                codes::INVALID_PARAMS,
                "At least one plugin call argument is required",
            );
        }

        debug!(
            method = %call.method,
            plugin_call_id = %call.id,
            subcommand = call.subcommand().unwrap_or_default(),
            "Dispatching plugin call"
        );
        let api = ApiClient::new(self.transport.clone(), call.id.clone());
        let ctx = PluginContext::new(call, api, self.config.clone(), self.privilege.clone());

        match family.handle(&ctx).await {
            None => Response::error(
                id,
                codes::INVALID_PARAMS,
                format!("Unrecognized subcommand {}", ctx.call.subcommand().unwrap_or_default()),
            ),
            Some(Ok(result)) => Response::success(id, result),
            Some(Err(e)) => {
                warn!(method = %ctx.call.method, plugin_call_id = %ctx.call.id, error = %e, "Plugin call failed");
                Response::error(id, e.response_code(), e.to_string())
            }
        }
    }

    /// Handles raw request bytes.
    ///
    /// Input that is not JSON answers with a parse error, and JSON that is
    /// not a request answers with an invalid-request error. Both carry the
    /// request id when one can be recovered, null otherwise.
    pub async fn handle_bytes(&self, input: &[u8]) -> Response {
        let value: Value = match serde_json::from_slice(input) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to parse request");
                return Response::error(None, codes::PARSE_ERROR, format!("Parse error: {e}"));
            }
        };

        let id = value
            .get("id")
            .and_then(|v| serde_json::from_value::<RequestId>(v.clone()).ok());
        match serde_json::from_value::<Request>(value) {
            Ok(request) => self.handle(&request).await,
            Err(e) => {
                warn!(error = %e, "Malformed request");
                Response::error(id, codes::INVALID_REQUEST, format!("Invalid request: {e}"))
            }
        }
    }
}
