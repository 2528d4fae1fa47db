//! The filter set: global contributions and per-action resolution.

use std::sync::Arc;

use super::Filter;
use crate::registry::Action;

/// Where a filter was contributed. Higher scopes are more specific and win
/// deduplication of non-multiple identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FilterScope {
    /// Contributed to the [`FilterSet`], applies to every action.
    Global,
    /// Declared on a service descriptor, applies to its actions.
    Service,
    /// Declared on a single action.
    Action,
}

/// The ordered collection of globally contributed filters, plus the
/// resolution rules that merge them with a given action's attribute
/// filters.
///
/// The set is registered once at startup and shared read-only across all
/// concurrent invocations. Resolution is pure; the dispatcher caches the
/// resolved chain per command code.
#[derive(Default)]
pub struct FilterSet {
    globals: Vec<Arc<Filter>>,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contribute a global filter. Builder pattern — returns `self`.
    pub fn with(mut self, filter: Filter) -> Self {
        self.globals.push(Arc::new(filter));
        self
    }

    /// The globally contributed filters, in declaration order.
    pub fn globals(&self) -> &[Arc<Filter>] {
        &self.globals
    }

    /// Resolve the filter chain for one action.
    ///
    /// Merges global, service-attribute, and action-attribute filters in
    /// discovery order (global first), drops less specific duplicates of
    /// identities that do not allow multiples, then sorts by order
    /// ascending with a stable tie-break on discovery order.
    pub fn resolve(&self, action: &Action) -> Vec<Arc<Filter>> {
        let discovered: Vec<(FilterScope, &Arc<Filter>)> = self
            .globals
            .iter()
            .map(|f| (FilterScope::Global, f))
            .chain(
                action
                    .service_filters()
                    .iter()
                    .map(|f| (FilterScope::Service, f)),
            )
            .chain(
                action
                    .attribute_filters()
                    .iter()
                    .map(|f| (FilterScope::Action, f)),
            )
            .collect();

        let mut keep = vec![true; discovered.len()];
        for (index, (_, filter)) in discovered.iter().enumerate() {
            if filter.allows_multiple() {
                continue;
            }
            // The first instance at the most specific scope survives.
            let winner = discovered
                .iter()
                .enumerate()
                .filter(|(_, (_, other))| other.identity() == filter.identity())
                .max_by(|(i, (a, _)), (j, (b, _))| a.cmp(b).then(j.cmp(i)))
                .map(|(i, _)| i);
            if winner != Some(index) {
                keep[index] = false;
            }
        }

        let mut resolved: Vec<(usize, Arc<Filter>)> = discovered
            .into_iter()
            .enumerate()
            .filter(|(i, _)| keep[*i])
            .map(|(i, (_, f))| (i, Arc::clone(f)))
            .collect();
        resolved.sort_by_key(|(discovery, filter)| (filter.sort_order(), *discovery));
        resolved.into_iter().map(|(_, f)| f).collect()
    }

    /// Resolve the global-only chain used when routing itself failed (no
    /// action exists, so only globally contributed filters can run).
    pub fn resolve_globals(&self) -> Vec<Arc<Filter>> {
        let mut resolved: Vec<(usize, Arc<Filter>)> = self
            .globals
            .iter()
            .enumerate()
            .map(|(i, f)| (i, Arc::clone(f)))
            .collect();
        resolved.sort_by_key(|(discovery, filter)| (filter.sort_order(), *discovery));
        resolved.into_iter().map(|(_, f)| f).collect()
    }
}
