//! Test fixtures: a calculator service, a counting activator, and a shared
//! recording log for observing filter side effects.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use wirecall::{
    ActionFault, ActionReturn, FactoryActivator, Frame, ParamShape, ServiceActivator,
    ServiceDescriptor, ServiceInstance,
};

/// A small stateful service; each invocation gets its own instance.
#[derive(Default)]
pub struct Calculator {
    pub memory: i64,
}

impl Calculator {
    pub fn add(&mut self, a: i64, b: i64) -> i64 {
        self.memory = a + b;
        self.memory
    }
}

/// Descriptor for the calculator: command 42 adds two integers.
pub fn calculator_service() -> ServiceDescriptor {
    ServiceDescriptor::new("calculator").action(
        42,
        "value",
        &[ParamShape::Integer, ParamShape::Integer],
        |svc, ctx| {
            let calc = svc
                .downcast_mut::<Calculator>()
                .ok_or_else(|| ActionFault::new("wrong service instance"))?;
            let sum = calc.add(ctx.arg_as(0)?, ctx.arg_as(1)?);
            Ok(ActionReturn::Value(json!(sum)))
        },
    )
}

/// Activator that materializes fresh calculators.
pub fn calculator_activator() -> FactoryActivator {
    FactoryActivator::new().service("calculator", || Box::new(Calculator::default()))
}

/// Activator fixture counting acquire/release parity. Refuses to produce
/// instances for the service named `"unavailable"`.
#[derive(Default)]
pub struct CountingActivator {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
}

impl CountingActivator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl ServiceActivator for CountingActivator {
    fn acquire(&self, service: &str) -> Option<ServiceInstance> {
        if service == "unavailable" {
            return None;
        }
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Some(Box::new(()))
    }

    fn release(&self, _service: &str, instance: ServiceInstance) {
        self.released.fetch_add(1, Ordering::SeqCst);
        drop(instance);
    }
}

/// Shared ordered log for asserting which filters ran, and in what order.
pub type Log = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn record(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

pub fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// A request frame whose body is a JSON argument array.
pub fn request(command_code: u32, args: serde_json::Value) -> Frame {
    Frame::request(command_code, serde_json::to_vec(&args).unwrap())
}
