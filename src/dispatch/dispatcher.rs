//! The dispatch state machine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::activator::ServiceActivator;
use crate::codec::{JsonSerializer, Serializer};
use crate::context::{ActionContext, ExceptionContext, RequestContext};
use crate::fault::DispatchFault;
use crate::filter::{Access, Filter, FilterSet};
use crate::frame::{ConnectionHandle, Frame};
use crate::registry::{Action, ActionRegistry, ActionReturn, ServiceInstance};

use super::remote;

/// Where an invocation stands in the dispatch state machine.
///
/// `Faulted` is reachable from every state after `Idle`; the other states
/// advance strictly left to right. The dispatcher threads this through its
/// tracing events so fault logs name the phase that raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Routed,
    Authorizing,
    Activating,
    Executing,
    Completing,
    Responded,
    Faulted,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DispatchState::Idle => "idle",
            DispatchState::Routed => "routed",
            DispatchState::Authorizing => "authorizing",
            DispatchState::Activating => "activating",
            DispatchState::Executing => "executing",
            DispatchState::Completing => "completing",
            DispatchState::Responded => "responded",
            DispatchState::Faulted => "faulted",
        };
        f.write_str(name)
    }
}

/// Orchestrates one invocation per inbound frame: route, authorize,
/// activate, execute, respond.
///
/// The dispatcher owns the registry and filter set, resolves each action's
/// filter chain once at construction, and is shared read-only across all
/// connections — `handle` takes `&self` and many invocations run
/// concurrently.
pub struct Dispatcher {
    registry: ActionRegistry,
    activator: Box<dyn ServiceActivator>,
    serializer: Box<dyn Serializer>,
    /// Per-command filter chains, resolved once before traffic starts.
    chains: HashMap<u32, Vec<Arc<Filter>>>,
    /// Global-only chain for faults raised before routing resolved an
    /// action (command-not-found, inbound remote faults).
    global_chain: Vec<Arc<Filter>>,
}

impl Dispatcher {
    /// Create a dispatcher with the default JSON serializer.
    pub fn new(
        registry: ActionRegistry,
        filters: FilterSet,
        activator: impl ServiceActivator + 'static,
    ) -> Self {
        let chains = registry
            .actions()
            .map(|action| (action.command_code(), filters.resolve(action)))
            .collect();
        let global_chain = filters.resolve_globals();
        Self {
            registry,
            activator: Box::new(activator),
            serializer: Box::new(JsonSerializer::new()),
            chains,
            global_chain,
        }
    }

    /// Swap the argument/result codec. Builder pattern — returns `self`.
    pub fn with_serializer(mut self, serializer: impl Serializer + 'static) -> Self {
        self.serializer = Box::new(serializer);
        self
    }

    /// The registry this dispatcher routes against.
    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Process one decoded frame.
    ///
    /// Returns the outbound response frame if the action produced a value,
    /// `Ok(None)` when there is nothing to send (no return value, a
    /// short-circuited invocation, or a fault absorbed by an exception
    /// filter), and `Err` when a fault crossed the exception chain
    /// unhandled — the transport layer decides what to do with it.
    ///
    /// Exception-flagged frames are not routed at all; their fault payload
    /// is decoded and offered to the global exception filters.
    pub async fn handle(
        &self,
        frame: Frame,
        connection: ConnectionHandle,
    ) -> Result<Option<Frame>, DispatchFault> {
        if frame.is_exception {
            return self.observe_remote_fault(frame, connection);
        }

        let request = RequestContext::new(connection, frame);
        let code = request.command_code();

        // Idle -> Routed
        let Some(action) = self.registry.lookup(code) else {
            return self.absorb(
                &self.global_chain,
                &request,
                DispatchFault::CommandNotFound(code),
                DispatchState::Routed,
            );
        };
        let action = Arc::clone(action);
        let chain = self.chains.get(&code).map(Vec::as_slice).unwrap_or(&[]);
        tracing::trace!(command_code = code, service = action.service(), "routed");

        // Routed -> Authorizing
        for filter in chain {
            if let Some(Access::Denied(reason)) = filter.run_authorize(&request) {
                let fault = DispatchFault::Unauthorized(format!(
                    "{} denied command {}: {}",
                    filter.identity(),
                    code,
                    reason
                ));
                return self.absorb(chain, &request, fault, DispatchState::Authorizing);
            }
        }

        // Authorizing -> Activating
        let Some(mut instance) = self.activator.acquire(action.service()) else {
            let fault = DispatchFault::ServiceUnavailable(action.service().to_string());
            return self.absorb(chain, &request, fault, DispatchState::Activating);
        };

        // Activating -> Executing -> Completing. The instance is released
        // on every exit path, exactly once, before faults reach the
        // exception chain.
        let outcome = self.execute(&action, chain, &request, &mut instance).await;
        self.activator.release(action.service(), instance);

        // Completing -> Responded
        match outcome {
            Ok(Some(value)) => match self.serializer.serialize(&value) {
                Ok(body) => {
                    tracing::trace!(command_code = code, state = %DispatchState::Responded, "response built");
                    Ok(Some(Frame::response(code, body)))
                }
                Err(fault) => self.absorb(chain, &request, fault, DispatchState::Completing),
            },
            Ok(None) => Ok(None),
            Err(fault) => self.absorb(chain, &request, fault, DispatchState::Executing),
        }
    }

    /// The action phase: bind arguments, run before-filters, invoke the
    /// body (awaiting a pending return without blocking the worker), run
    /// after-filters.
    async fn execute(
        &self,
        action: &Action,
        chain: &[Arc<Filter>],
        request: &RequestContext,
        instance: &mut ServiceInstance,
    ) -> Result<Option<Value>, DispatchFault> {
        let args = self.serializer.bind(&request.frame().body, action.params())?;
        let mut ctx = ActionContext::new(request, args);

        for filter in chain {
            filter.run_before(&mut ctx);
            if ctx.is_short_circuited() {
                // Skips the body, remaining before-filters, and the whole
                // after phase; release and response-building still run.
                return Ok(None);
            }
        }

        let value = match action.invoke(instance, &ctx)? {
            ActionReturn::None => None,
            ActionReturn::Value(value) => Some(value),
            ActionReturn::Pending(pending) => pending.await?,
        };

        ctx.set_result(value);
        for filter in chain {
            filter.run_after(&mut ctx);
        }
        Ok(ctx.take_result())
    }

    /// OnException-only pass for an inbound exception-flagged frame.
    fn observe_remote_fault(
        &self,
        frame: Frame,
        connection: ConnectionHandle,
    ) -> Result<Option<Frame>, DispatchFault> {
        let request = RequestContext::new(connection, frame);
        let fault = DispatchFault::Remote(remote::decode_fault(&request.frame().body));
        self.absorb(&self.global_chain, &request, fault, DispatchState::Routed)
    }

    /// Offer a fault to the exception chain. Every filter in the resolved
    /// order runs, even after one marks the fault handled — the flag only
    /// decides fatality.
    fn absorb(
        &self,
        chain: &[Arc<Filter>],
        request: &RequestContext,
        fault: DispatchFault,
        state: DispatchState,
    ) -> Result<Option<Frame>, DispatchFault> {
        let mut exc = ExceptionContext::new(request, fault);
        for filter in chain {
            filter.run_exception(&mut exc);
        }
        if exc.is_handled() {
            tracing::debug!(
                command_code = request.command_code(),
                kind = exc.fault().kind(),
                %state,
                "fault absorbed by exception filter"
            );
            Ok(None)
        } else {
            tracing::warn!(
                command_code = request.command_code(),
                kind = exc.fault().kind(),
                %state,
                "unhandled fault crossed the dispatcher boundary"
            );
            Err(exc.into_fault())
        }
    }
}
