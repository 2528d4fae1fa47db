//! The dispatcher and the remote exception transport.
//!
//! [`Dispatcher::handle`] takes one decoded frame and drives it through
//! routing, authorization, activation, the action phase, and response
//! building; any fault along the way is offered to the resolved exception
//! filter chain before it is allowed to cross the dispatcher boundary.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wirecall::{ConnectionHandle, Dispatcher, FilterSet, Frame};
//!
//! let dispatcher = Arc::new(Dispatcher::new(registry, filters, activator));
//!
//! let outbound = dispatcher
//!     .handle(Frame::request(42, b"[3, 4]".to_vec()), ConnectionHandle::new(1))
//!     .await?;
//! ```

mod dispatcher;
mod remote;

pub use dispatcher::{DispatchState, Dispatcher};
pub use remote::{decode_fault, fault_frame, RemoteFault, RemoteFaultKind};
