//! The filter type: identity, ordering, and optional phase handlers.

use std::fmt;

use crate::context::{ActionContext, ExceptionContext, RequestContext};

/// Outcome of an authorize handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Let the invocation proceed.
    Granted,
    /// Deny with a reason; halts the authorize phase and faults the
    /// invocation as unauthorized.
    Denied(String),
}

type AuthorizeHandler = Box<dyn Fn(&RequestContext) -> Access + Send + Sync>;
type ActionHandler = Box<dyn for<'a> Fn(&mut ActionContext<'a>) + Send + Sync>;
type ExceptionHandler = Box<dyn for<'a> Fn(&mut ExceptionContext<'a>) + Send + Sync>;

/// A cross-cutting interceptor participating in one or more dispatch phases.
///
/// A filter declares its capabilities by installing handlers; phases with
/// no handler are skipped for this filter. Handlers are shared read-only
/// across all concurrent invocations and must not hold per-call state.
///
/// `identity` deduplicates filters across scopes: when `allow_multiple` is
/// false (the default), only the most specific instance of an identity
/// survives resolution — action-level over service-level over global.
pub struct Filter {
    identity: String,
    order: i32,
    allow_multiple: bool,
    authorize: Option<AuthorizeHandler>,
    before: Option<ActionHandler>,
    after: Option<ActionHandler>,
    exception: Option<ExceptionHandler>,
}

impl Filter {
    /// Create a filter with the given identity. Order defaults to 0 and
    /// `allow_multiple` to false.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            order: 0,
            allow_multiple: false,
            authorize: None,
            before: None,
            after: None,
            exception: None,
        }
    }

    /// Set the sort order (ascending; ties break by discovery order).
    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Allow several instances of this identity in one resolved chain.
    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    /// Install the authorize handler.
    pub fn on_authorize<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RequestContext) -> Access + Send + Sync + 'static,
    {
        self.authorize = Some(Box::new(handler));
        self
    }

    /// Install the before-action handler.
    pub fn on_before<F>(mut self, handler: F) -> Self
    where
        F: for<'a> Fn(&mut ActionContext<'a>) + Send + Sync + 'static,
    {
        self.before = Some(Box::new(handler));
        self
    }

    /// Install the after-action handler.
    pub fn on_after<F>(mut self, handler: F) -> Self
    where
        F: for<'a> Fn(&mut ActionContext<'a>) + Send + Sync + 'static,
    {
        self.after = Some(Box::new(handler));
        self
    }

    /// Install the exception handler.
    pub fn on_exception<F>(mut self, handler: F) -> Self
    where
        F: for<'a> Fn(&mut ExceptionContext<'a>) + Send + Sync + 'static,
    {
        self.exception = Some(Box::new(handler));
        self
    }

    /// The filter's identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The filter's sort order.
    pub fn sort_order(&self) -> i32 {
        self.order
    }

    /// Whether several instances of this identity may coexist in a chain.
    pub fn allows_multiple(&self) -> bool {
        self.allow_multiple
    }

    pub(crate) fn run_authorize(&self, request: &RequestContext) -> Option<Access> {
        self.authorize.as_ref().map(|h| h(request))
    }

    pub(crate) fn run_before(&self, ctx: &mut ActionContext<'_>) {
        if let Some(h) = &self.before {
            h(ctx);
        }
    }

    pub(crate) fn run_after(&self, ctx: &mut ActionContext<'_>) {
        if let Some(h) = &self.after {
            h(ctx);
        }
    }

    pub(crate) fn run_exception(&self, ctx: &mut ExceptionContext<'_>) {
        if let Some(h) = &self.exception {
            h(ctx);
        }
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("identity", &self.identity)
            .field("order", &self.order)
            .field("allow_multiple", &self.allow_multiple)
            .field("authorize", &self.authorize.is_some())
            .field("before", &self.before.is_some())
            .field("after", &self.after.is_some())
            .field("exception", &self.exception.is_some())
            .finish()
    }
}
