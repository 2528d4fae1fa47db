//! Fault taxonomy for dispatch and registry construction.
//!
//! Runtime faults (`DispatchFault`) are offered to the exception filter
//! chain before they become fatal; build-time errors (`RegistryError`)
//! always abort startup and are never filtered.

use std::error::Error;
use std::fmt;

use crate::dispatch::RemoteFault;

/// A fault raised by an action body or its asynchronous continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFault {
    message: String,
}

impl ActionFault {
    /// Create an action fault with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The fault message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ActionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action fault: {}", self.message)
    }
}

impl Error for ActionFault {}

impl From<serde_json::Error> for ActionFault {
    fn from(err: serde_json::Error) -> Self {
        ActionFault::new(err.to_string())
    }
}

/// Runtime fault raised while dispatching one inbound frame.
///
/// Every variant is first offered to the resolved exception filter chain;
/// if no filter marks it handled, it propagates out of the dispatcher to
/// the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchFault {
    /// No action is registered for the frame's command code.
    CommandNotFound(u32),
    /// An authorize filter denied the invocation.
    Unauthorized(String),
    /// The activator could not produce a service instance.
    ServiceUnavailable(String),
    /// Argument binding failed (arity or type mismatch, undecodable body).
    Binding(String),
    /// The action body (or its pending continuation) faulted.
    Action(ActionFault),
    /// A fault reported by a remote peer via an exception-flagged frame.
    Remote(RemoteFault),
}

impl DispatchFault {
    /// Stable kind tag, used for fault-frame encoding and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchFault::CommandNotFound(_) => "command_not_found",
            DispatchFault::Unauthorized(_) => "unauthorized",
            DispatchFault::ServiceUnavailable(_) => "service_unavailable",
            DispatchFault::Binding(_) => "binding",
            DispatchFault::Action(_) => "action",
            DispatchFault::Remote(_) => "remote",
        }
    }
}

impl fmt::Display for DispatchFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchFault::CommandNotFound(code) => {
                write!(f, "no action registered for command code {}", code)
            }
            DispatchFault::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            DispatchFault::ServiceUnavailable(service) => {
                write!(f, "service unavailable: {}", service)
            }
            DispatchFault::Binding(msg) => write!(f, "binding failed: {}", msg),
            DispatchFault::Action(e) => write!(f, "{}", e),
            DispatchFault::Remote(e) => write!(f, "{}", e),
        }
    }
}

impl Error for DispatchFault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DispatchFault::Action(e) => Some(e),
            DispatchFault::Remote(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ActionFault> for DispatchFault {
    fn from(err: ActionFault) -> Self {
        DispatchFault::Action(err)
    }
}

impl From<RemoteFault> for DispatchFault {
    fn from(err: RemoteFault) -> Self {
        DispatchFault::Remote(err)
    }
}

/// Error raised while building an [`ActionRegistry`](crate::ActionRegistry).
///
/// These are startup-time failures and prevent the server from starting;
/// they never reach exception filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Registration was called with no service descriptors.
    NoServices,
    /// Two actions declared the same command code.
    DuplicateCommand {
        command_code: u32,
        service: String,
        previous: String,
    },
    /// An action declared a return shape that is not none/value/async.
    InvalidReturnShape { command_code: u32, shape: String },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NoServices => {
                write!(f, "registry built from an empty descriptor collection")
            }
            RegistryError::DuplicateCommand {
                command_code,
                service,
                previous,
            } => write!(
                f,
                "duplicate command code {} (service {} collides with {})",
                command_code, service, previous
            ),
            RegistryError::InvalidReturnShape {
                command_code,
                shape,
            } => write!(
                f,
                "invalid return shape {:?} for command code {} (expected none, value, or async)",
                shape, command_code
            ),
        }
    }
}

impl Error for RegistryError {}
