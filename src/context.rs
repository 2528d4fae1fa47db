//! Per-invocation contexts handed to filters and action bodies.
//!
//! A `RequestContext` exists for every inbound frame. Once an action is
//! resolved and its arguments bound, the invocation runs against an
//! `ActionContext`; a captured fault runs against an `ExceptionContext`.
//! Each context is owned by exactly one invocation and never shared across
//! threads.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::fault::{ActionFault, DispatchFault};
use crate::frame::{ConnectionHandle, Frame};

/// Per-frame context: the originating connection and the decoded frame.
#[derive(Debug)]
pub struct RequestContext {
    connection: ConnectionHandle,
    frame: Frame,
}

impl RequestContext {
    /// Create a request context for one inbound frame.
    pub fn new(connection: ConnectionHandle, frame: Frame) -> Self {
        Self { connection, frame }
    }

    /// The connection the frame arrived on.
    pub fn connection(&self) -> ConnectionHandle {
        self.connection
    }

    /// The decoded frame being processed.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Shorthand for the frame's command code.
    pub fn command_code(&self) -> u32 {
        self.frame.command_code
    }
}

/// Context for the action phase: bound arguments, the result slot, and the
/// short-circuit flag.
///
/// Before-filters may call [`short_circuit`](Self::short_circuit) to skip
/// the action body, the remaining before-filters, and the whole after
/// phase. After-filters observe (and may replace) the result.
pub struct ActionContext<'a> {
    request: &'a RequestContext,
    args: Vec<Value>,
    result: Option<Value>,
    short_circuited: bool,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(request: &'a RequestContext, args: Vec<Value>) -> Self {
        Self {
            request,
            args,
            result: None,
            short_circuited: false,
        }
    }

    /// The request context this invocation was created from.
    pub fn request(&self) -> &RequestContext {
        self.request
    }

    /// All bound arguments in declaration order.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// One bound argument by position.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Decode one bound argument into a typed value.
    pub fn arg_as<T: DeserializeOwned>(&self, index: usize) -> Result<T, ActionFault> {
        let value = self
            .arg(index)
            .ok_or_else(|| ActionFault::new(format!("missing argument {}", index)))?;
        Ok(serde_json::from_value(value.clone())?)
    }

    /// The action's result, once produced.
    pub fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Replace the result (after-filters may rewrite what gets encoded).
    pub fn set_result(&mut self, result: Option<Value>) {
        self.result = result;
    }

    /// Skip the action body and all remaining filters in this phase.
    pub fn short_circuit(&mut self) {
        self.short_circuited = true;
    }

    /// Whether a filter short-circuited this invocation.
    pub fn is_short_circuited(&self) -> bool {
        self.short_circuited
    }

    pub(crate) fn take_result(&mut self) -> Option<Value> {
        self.result.take()
    }
}

/// Context for the exception phase: the captured fault and the handled flag.
///
/// Every resolved exception filter runs, in order, even after one marks the
/// context handled — the flag only decides whether the fault is ultimately
/// fatal, not whether later filters observe it.
pub struct ExceptionContext<'a> {
    request: &'a RequestContext,
    fault: DispatchFault,
    handled: bool,
}

impl<'a> ExceptionContext<'a> {
    pub(crate) fn new(request: &'a RequestContext, fault: DispatchFault) -> Self {
        Self {
            request,
            fault,
            handled: false,
        }
    }

    /// The request context the fault was raised under.
    pub fn request(&self) -> &RequestContext {
        self.request
    }

    /// The captured fault.
    pub fn fault(&self) -> &DispatchFault {
        &self.fault
    }

    /// Absorb the fault: the invocation ends silently instead of fatally.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    /// Whether some filter absorbed the fault.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    pub(crate) fn into_fault(self) -> DispatchFault {
        self.fault
    }
}
