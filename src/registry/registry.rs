//! The frozen command-code lookup table.

use std::collections::HashMap;
use std::sync::Arc;

use crate::fault::RegistryError;

use super::action::{Action, ReturnKind};
use super::descriptor::ServiceDescriptor;

/// The set of invocable actions, keyed by unique command code.
///
/// Built once at startup; lookups afterwards are pure, lock-free reads, so
/// the registry is shared across all concurrent invocations without
/// synchronization. Registration itself runs before traffic and is not
/// thread-safe.
#[derive(Debug)]
pub struct ActionRegistry {
    actions: HashMap<u32, Arc<Action>>,
}

impl ActionRegistry {
    /// Build a registry from service descriptors.
    ///
    /// Fails with [`RegistryError::NoServices`] for an empty collection,
    /// [`RegistryError::DuplicateCommand`] when two actions share a command
    /// code, and [`RegistryError::InvalidReturnShape`] for an unknown
    /// return shape tag. All three abort startup; they never reach
    /// exception filters.
    pub fn register(descriptors: Vec<ServiceDescriptor>) -> Result<Self, RegistryError> {
        if descriptors.is_empty() {
            return Err(RegistryError::NoServices);
        }

        let mut actions: HashMap<u32, Arc<Action>> = HashMap::new();
        for descriptor in descriptors {
            let (service, service_filters, drafts) = descriptor.into_parts();
            for draft in drafts {
                let return_kind = ReturnKind::parse(&draft.return_shape).ok_or_else(|| {
                    RegistryError::InvalidReturnShape {
                        command_code: draft.command_code,
                        shape: draft.return_shape.clone(),
                    }
                })?;
                if let Some(existing) = actions.get(&draft.command_code) {
                    return Err(RegistryError::DuplicateCommand {
                        command_code: draft.command_code,
                        service: service.clone(),
                        previous: existing.service().to_string(),
                    });
                }
                actions.insert(
                    draft.command_code,
                    Arc::new(Action::new(
                        draft.command_code,
                        service.clone(),
                        draft.params,
                        return_kind,
                        service_filters.clone(),
                        draft.filters,
                        draft.body,
                    )),
                );
            }
        }

        Ok(Self { actions })
    }

    /// Look up the action registered for a command code.
    pub fn lookup(&self, command_code: u32) -> Option<&Arc<Action>> {
        self.actions.get(&command_code)
    }

    /// Iterate over every registered action.
    pub fn actions(&self) -> impl Iterator<Item = &Arc<Action>> {
        self.actions.values()
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the registry holds no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
