//! Cross-cutting filters and their resolution.
//!
//! A [`Filter`] participates in one or more dispatch phases by exposing
//! optional handlers — there is no base class to override, a filter simply
//! declares the capabilities it has. Filters are contributed globally (via
//! [`FilterSet`]) or as attributes on a service or action (via
//! [`ServiceDescriptor`](crate::ServiceDescriptor)); resolution merges the
//! scopes, deduplicates non-multiple identities, and orders the chain.
//!
//! ## Example
//!
//! ```ignore
//! use wirecall::{Access, Filter, FilterSet};
//!
//! let filters = FilterSet::new()
//!     .with(
//!         Filter::new("auth.token")
//!             .order(0)
//!             .on_authorize(|req| {
//!                 if req.frame().body.is_empty() {
//!                     Access::Denied("missing token".into())
//!                 } else {
//!                     Access::Granted
//!                 }
//!             }),
//!     )
//!     .with(Filter::new("log.faults").order(100).on_exception(|exc| {
//!         eprintln!("fault: {}", exc.fault());
//!     }));
//! ```

mod filter;
mod set;

pub use filter::{Access, Filter};
pub use set::{FilterScope, FilterSet};
