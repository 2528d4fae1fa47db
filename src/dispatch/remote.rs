//! Carrying faults across the protocol as data.
//!
//! A server-side fault that must reach the remote peer travels as an
//! exception-flagged frame whose body is a small JSON record: a kind tag
//! and a human-readable message. Rehydrating a richer fault on the far
//! side is best-effort — unknown kinds (and undecodable payloads) fall
//! back to the generic `Unknown` representation.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::fault::DispatchFault;
use crate::frame::Frame;

/// The rehydrated kind of a remotely reported fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum RemoteFaultKind {
    CommandNotFound,
    Unauthorized,
    ServiceUnavailable,
    Binding,
    Action,
    /// The peer reported a kind this side does not know.
    Unknown,
}

impl From<String> for RemoteFaultKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "command_not_found" => RemoteFaultKind::CommandNotFound,
            "unauthorized" => RemoteFaultKind::Unauthorized,
            "service_unavailable" => RemoteFaultKind::ServiceUnavailable,
            "binding" => RemoteFaultKind::Binding,
            "action" => RemoteFaultKind::Action,
            _ => RemoteFaultKind::Unknown,
        }
    }
}

impl RemoteFaultKind {
    /// Kind tag as it appears on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            RemoteFaultKind::CommandNotFound => "command_not_found",
            RemoteFaultKind::Unauthorized => "unauthorized",
            RemoteFaultKind::ServiceUnavailable => "service_unavailable",
            RemoteFaultKind::Binding => "binding",
            RemoteFaultKind::Action => "action",
            RemoteFaultKind::Unknown => "unknown",
        }
    }
}

/// A fault reported by a remote peer, decoded from an exception-flagged
/// frame body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFault {
    /// Best-effort fault kind.
    pub kind: RemoteFaultKind,
    /// Human-readable description from the reporting side.
    pub message: String,
}

impl RemoteFault {
    /// Create a remote fault with a known kind.
    pub fn new(kind: RemoteFaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The generic fallback representation.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(RemoteFaultKind::Unknown, message)
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote fault ({}): {}", self.kind.name(), self.message)
    }
}

impl Error for RemoteFault {}

impl From<&DispatchFault> for RemoteFault {
    fn from(fault: &DispatchFault) -> Self {
        match fault {
            DispatchFault::CommandNotFound(_) => {
                RemoteFault::new(RemoteFaultKind::CommandNotFound, fault.to_string())
            }
            DispatchFault::Unauthorized(_) => {
                RemoteFault::new(RemoteFaultKind::Unauthorized, fault.to_string())
            }
            DispatchFault::ServiceUnavailable(_) => {
                RemoteFault::new(RemoteFaultKind::ServiceUnavailable, fault.to_string())
            }
            DispatchFault::Binding(_) => {
                RemoteFault::new(RemoteFaultKind::Binding, fault.to_string())
            }
            DispatchFault::Action(e) => RemoteFault::new(RemoteFaultKind::Action, e.message()),
            // Re-forwarding a fault that was itself remote keeps its kind.
            DispatchFault::Remote(remote) => remote.clone(),
        }
    }
}

/// Decode an exception-flagged frame body into a fault description.
///
/// Never fails: payloads that are not valid fault records become the
/// generic `Unknown` representation carrying the lossy payload text.
pub fn decode_fault(body: &[u8]) -> RemoteFault {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| RemoteFault::unknown(String::from_utf8_lossy(body).into_owned()))
}

/// Encode a runtime fault as an outbound exception-flagged frame.
///
/// This is the default conversion a conforming transport adapter applies
/// to faults that crossed the dispatcher unhandled.
pub fn fault_frame(command_code: u32, fault: &DispatchFault) -> Frame {
    let report = RemoteFault::from(fault);
    let body = serde_json::to_vec(&report).unwrap_or_default();
    Frame::exception(command_code, body)
}
