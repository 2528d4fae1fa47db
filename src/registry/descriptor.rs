//! Service descriptors: the startup-time declaration of a service's
//! actions and attribute filters.

use std::sync::Arc;

use crate::context::ActionContext;
use crate::fault::ActionFault;
use crate::filter::Filter;

use super::action::{ActionBody, ActionReturn, ParamShape, ServiceInstance};

pub(crate) struct ActionDraft {
    pub(crate) command_code: u32,
    pub(crate) return_shape: String,
    pub(crate) params: Vec<ParamShape>,
    pub(crate) filters: Vec<Arc<Filter>>,
    pub(crate) body: ActionBody,
}

/// Declares one service: its identifier (handed to the activator), its
/// service-level attribute filters, and its actions.
///
/// Uses the builder pattern — each method returns `self` for chaining.
///
/// ## Example
///
/// ```ignore
/// let descriptor = ServiceDescriptor::new("orders")
///     .filter(Filter::new("auth.role").on_authorize(require_role("clerk")))
///     .action(10, "value", &[ParamShape::Text], |svc, ctx| { .. })
///     .action(11, "none", &[], |svc, ctx| { .. });
/// ```
pub struct ServiceDescriptor {
    service: String,
    filters: Vec<Arc<Filter>>,
    actions: Vec<ActionDraft>,
}

impl ServiceDescriptor {
    /// Create a descriptor for the named service.
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            filters: Vec::new(),
            actions: Vec::new(),
        }
    }

    /// Attach a service-level attribute filter (applies to every action of
    /// this service).
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Declare an action: command code, return shape tag (`"none"`,
    /// `"value"`, or `"async"`), parameter shapes, and the body.
    pub fn action<F>(self, command_code: u32, returns: &str, params: &[ParamShape], body: F) -> Self
    where
        F: for<'a> Fn(&mut ServiceInstance, &ActionContext<'a>) -> Result<ActionReturn, ActionFault>
            + Send
            + Sync
            + 'static,
    {
        self.action_filtered(command_code, returns, params, Vec::new(), body)
    }

    /// Declare an action with action-level attribute filters.
    pub fn action_filtered<F>(
        mut self,
        command_code: u32,
        returns: &str,
        params: &[ParamShape],
        filters: Vec<Filter>,
        body: F,
    ) -> Self
    where
        F: for<'a> Fn(&mut ServiceInstance, &ActionContext<'a>) -> Result<ActionReturn, ActionFault>
            + Send
            + Sync
            + 'static,
    {
        self.actions.push(ActionDraft {
            command_code,
            return_shape: returns.to_string(),
            params: params.to_vec(),
            filters: filters.into_iter().map(Arc::new).collect(),
            body: Box::new(body),
        });
        self
    }

    /// The service identifier.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Arc<Filter>>, Vec<ActionDraft>) {
        (self.service, self.filters, self.actions)
    }
}
