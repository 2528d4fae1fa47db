//! The static routing arena: service descriptors, actions, and the
//! registry.
//!
//! Routing is reflection-free. Services describe their actions explicitly
//! at startup — command code, parameter shapes, return shape, attribute
//! filters, and the body closure — and [`ActionRegistry::register`] freezes
//! them into an immutable lookup table shared by every connection.
//!
//! ## Example
//!
//! ```ignore
//! use wirecall::{ActionRegistry, ActionReturn, ParamShape, ServiceDescriptor};
//! use serde_json::json;
//!
//! let registry = ActionRegistry::register(vec![
//!     ServiceDescriptor::new("calculator")
//!         .action(42, "value", &[ParamShape::Integer, ParamShape::Integer], |svc, ctx| {
//!             let calc = svc.downcast_mut::<Calculator>().unwrap();
//!             let sum = calc.add(ctx.arg_as::<i64>(0)?, ctx.arg_as::<i64>(1)?);
//!             Ok(ActionReturn::Value(json!(sum)))
//!         }),
//! ])?;
//! ```

mod action;
mod descriptor;
mod registry;

pub use action::{Action, ActionReturn, ParamShape, PendingValue, ReturnKind, ServiceInstance};
pub use descriptor::ServiceDescriptor;
pub use registry::ActionRegistry;
