//! Service instance lifecycle: the activator contract and a factory-based
//! default.
//!
//! The activator is the dependency-resolution boundary. Each invocation
//! acquires its own instance for the action's declaring service and
//! releases it when the action phase ends, on every exit path. Whether
//! instances are pooled or freshly constructed is activator policy — the
//! dispatcher cannot tell.

use std::collections::HashMap;

use crate::registry::ServiceInstance;

/// Resolves and releases service instances for action invocations.
///
/// Implementations must be safe under concurrent `acquire`/`release`
/// calls — this is the only synchronization point for per-call state.
pub trait ServiceActivator: Send + Sync {
    /// Produce an instance of the named service, or `None` if the service
    /// cannot be materialized (the invocation faults as unavailable).
    fn acquire(&self, service: &str) -> Option<ServiceInstance>;

    /// Return an instance after the action phase. Called exactly once per
    /// successful acquire, including when the action body faulted.
    fn release(&self, service: &str, instance: ServiceInstance);
}

// Shared activators can be handed to the dispatcher as Arc clones.
impl<T: ServiceActivator + ?Sized> ServiceActivator for std::sync::Arc<T> {
    fn acquire(&self, service: &str) -> Option<ServiceInstance> {
        (**self).acquire(service)
    }

    fn release(&self, service: &str, instance: ServiceInstance) {
        (**self).release(service, instance)
    }
}

type Factory = Box<dyn Fn() -> ServiceInstance + Send + Sync>;

/// Activator that constructs a fresh instance per invocation from
/// registered factory closures and drops instances on release.
///
/// ## Example
///
/// ```ignore
/// let activator = FactoryActivator::new()
///     .service("calculator", || Box::new(Calculator::default()));
/// ```
#[derive(Default)]
pub struct FactoryActivator {
    factories: HashMap<String, Factory>,
}

impl FactoryActivator {
    /// Create an activator with no registered services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory for a service. Builder pattern — returns `self`.
    pub fn service<F>(mut self, service: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> ServiceInstance + Send + Sync + 'static,
    {
        self.factories.insert(service.into(), Box::new(factory));
        self
    }
}

impl ServiceActivator for FactoryActivator {
    fn acquire(&self, service: &str) -> Option<ServiceInstance> {
        self.factories.get(service).map(|factory| factory())
    }

    fn release(&self, _service: &str, instance: ServiceInstance) {
        drop(instance);
    }
}
