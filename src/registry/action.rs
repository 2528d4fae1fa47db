//! Immutable action descriptors and the shapes they declare.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::context::ActionContext;
use crate::fault::ActionFault;
use crate::filter::Filter;

/// A service instance materialized by the activator for one invocation.
///
/// Bodies downcast to their concrete service type; the dispatcher never
/// looks inside.
pub type ServiceInstance = Box<dyn Any + Send>;

/// A still-running asynchronous action result.
///
/// The future must be `'static` — the synchronous part of the body runs
/// against the service instance, the pending part carries owned data. It
/// resolves to the (optional) return value or an action fault.
pub type PendingValue = Pin<Box<dyn Future<Output = Result<Option<Value>, ActionFault>> + Send>>;

/// What an action body produced.
pub enum ActionReturn {
    /// The action returns nothing; no outbound frame is built.
    None,
    /// A direct value, encoded into the response frame.
    Value(Value),
    /// A pending computation; the dispatcher suspends (without blocking the
    /// worker) and resumes the remaining phases once it resolves.
    Pending(PendingValue),
}

impl ActionReturn {
    /// Wrap a future as a pending return value.
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Result<Option<Value>, ActionFault>> + Send + 'static,
    {
        ActionReturn::Pending(Box::pin(future))
    }
}

impl fmt::Debug for ActionReturn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionReturn::None => write!(f, "ActionReturn::None"),
            ActionReturn::Value(v) => write!(f, "ActionReturn::Value({})", v),
            ActionReturn::Pending(_) => write!(f, "ActionReturn::Pending(..)"),
        }
    }
}

/// The declared return kind of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnKind {
    /// Produces no value.
    None,
    /// Produces a direct value.
    Value,
    /// Produces a value asynchronously.
    AsyncValue,
}

impl ReturnKind {
    /// Parse a descriptor's declared shape tag. Unknown tags fail registry
    /// construction with `InvalidReturnShape`.
    pub(crate) fn parse(shape: &str) -> Option<Self> {
        match shape {
            "none" => Some(ReturnKind::None),
            "value" => Some(ReturnKind::Value),
            "async" => Some(ReturnKind::AsyncValue),
            _ => None,
        }
    }
}

/// Semantic type of one declared action parameter, checked during argument
/// binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamShape {
    Bool,
    Integer,
    Float,
    Text,
    Object,
    /// Accept any decoded value unchecked.
    Any,
}

impl ParamShape {
    /// Whether a decoded value satisfies this shape.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamShape::Bool => value.is_boolean(),
            ParamShape::Integer => value.is_i64() || value.is_u64(),
            ParamShape::Float => value.is_number(),
            ParamShape::Text => value.is_string(),
            ParamShape::Object => value.is_object() || value.is_array(),
            ParamShape::Any => true,
        }
    }

    /// Shape name used in binding fault messages.
    pub fn name(&self) -> &'static str {
        match self {
            ParamShape::Bool => "bool",
            ParamShape::Integer => "integer",
            ParamShape::Float => "float",
            ParamShape::Text => "text",
            ParamShape::Object => "object",
            ParamShape::Any => "any",
        }
    }
}

pub(crate) type ActionBody = Box<
    dyn for<'a> Fn(&mut ServiceInstance, &ActionContext<'a>) -> Result<ActionReturn, ActionFault>
        + Send
        + Sync,
>;

/// One registered, invocable action bound to exactly one command code.
///
/// Created during registry construction, never mutated, owned by the
/// registry for the server's lifetime.
pub struct Action {
    command_code: u32,
    service: String,
    params: Vec<ParamShape>,
    return_kind: ReturnKind,
    service_filters: Vec<Arc<Filter>>,
    attribute_filters: Vec<Arc<Filter>>,
    body: ActionBody,
}

impl Action {
    pub(crate) fn new(
        command_code: u32,
        service: String,
        params: Vec<ParamShape>,
        return_kind: ReturnKind,
        service_filters: Vec<Arc<Filter>>,
        attribute_filters: Vec<Arc<Filter>>,
        body: ActionBody,
    ) -> Self {
        Self {
            command_code,
            service,
            params,
            return_kind,
            service_filters,
            attribute_filters,
            body,
        }
    }

    /// The unique command code this action answers to.
    pub fn command_code(&self) -> u32 {
        self.command_code
    }

    /// The declaring service's identifier, passed to the activator.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Declared parameter shapes, in order.
    pub fn params(&self) -> &[ParamShape] {
        &self.params
    }

    /// The declared return kind.
    pub fn return_kind(&self) -> ReturnKind {
        self.return_kind
    }

    /// Filters declared on the owning service.
    pub fn service_filters(&self) -> &[Arc<Filter>] {
        &self.service_filters
    }

    /// Filters declared on this action.
    pub fn attribute_filters(&self) -> &[Arc<Filter>] {
        &self.attribute_filters
    }

    pub(crate) fn invoke(
        &self,
        instance: &mut ServiceInstance,
        ctx: &ActionContext<'_>,
    ) -> Result<ActionReturn, ActionFault> {
        (self.body)(instance, ctx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("command_code", &self.command_code)
            .field("service", &self.service)
            .field("params", &self.params)
            .field("return_kind", &self.return_kind)
            .finish()
    }
}
