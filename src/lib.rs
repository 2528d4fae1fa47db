mod activator;
mod codec;
mod context;
mod dispatch;
mod fault;
mod filter;
mod frame;
mod registry;

pub use activator::{FactoryActivator, ServiceActivator};
pub use codec::{JsonSerializer, Serializer};
pub use context::{ActionContext, ExceptionContext, RequestContext};
pub use dispatch::{decode_fault, fault_frame, DispatchState, Dispatcher, RemoteFault, RemoteFaultKind};
pub use fault::{ActionFault, DispatchFault, RegistryError};
pub use filter::{Access, Filter, FilterScope, FilterSet};
pub use frame::{ConnectionHandle, Frame};
pub use registry::{
    Action, ActionRegistry, ActionReturn, ParamShape, PendingValue, ReturnKind, ServiceDescriptor,
    ServiceInstance,
};

// Channel-based connection workers (requires "transport" feature)
#[cfg(feature = "transport")]
mod transport;
#[cfg(feature = "transport")]
pub use transport::{spawn_connection, ConnectionWorker, WorkerStats};
