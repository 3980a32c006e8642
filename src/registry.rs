//! The immutable service registry and its load-order computation.

use std::cmp::Reverse;
use std::fmt;

use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use crate::descriptor::{AnyArc, ServiceDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::CacheMap;
use crate::key::Key;
use crate::provider::ResolverContext;

/// Passes the leveling loop makes before giving up on convergence.
///
/// A dependency cycle never reaches a fixed point; the cap bounds such
/// configurations instead of detecting them.
const MAX_ORDER_PASSES: usize = 500;

#[derive(Debug)]
struct Unassignable;

impl fmt::Display for Unassignable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "produced value is not of the registered service type")
    }
}

impl std::error::Error for Unassignable {}

/// Immutable mapping from service key to [`ServiceDescriptor`].
///
/// Built once from the collected registrations, owns no instances, and is
/// shared read-only between the root provider and every scope. Lookup
/// misses are reported as `None`, never as errors — "not registered" is a
/// valid outcome the providers pass through to the caller.
pub struct ServiceRegistry {
    services: CacheMap<Key, ServiceDescriptor>,
    load_order: OnceCell<Vec<Key>>,
}

impl ServiceRegistry {
    pub(crate) fn new(services: CacheMap<Key, ServiceDescriptor>) -> Self {
        debug!(services = services.len(), "service registry built");
        Self { services, load_order: OnceCell::new() }
    }

    /// Pure lookup of a registration; no side effects.
    pub fn lookup(&self, key: &Key) -> Option<&ServiceDescriptor> {
        self.services.get(key)
    }

    /// Iterates all registered descriptors in unspecified order.
    pub fn descriptors(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.values()
    }

    /// Number of registered services.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Produces one instance of `key` through its descriptor.
    ///
    /// Returns `Ok(None)` for unregistered keys. For registered keys the
    /// descriptor's strategy runs with `ctx` as the resolving provider, and
    /// the produced value is verified to be of the registered service type.
    pub(crate) fn resolve(
        &self,
        key: &Key,
        ctx: &ResolverContext<'_>,
        consumer: Option<&Key>,
    ) -> DiResult<Option<AnyArc>> {
        let Some(descriptor) = self.lookup(key) else {
            return Ok(None);
        };
        let value = descriptor.instantiate(ctx, consumer)?;
        if !descriptor.produces(&value) {
            return Err(DiError::InstantiationFailed {
                service: key.display_name(),
                source: Some(std::sync::Arc::new(Unassignable)),
            });
        }
        Ok(Some(value))
    }

    /// Computes the order in which constructor-based services should be
    /// initialized: dependencies first, most-dependent services last.
    ///
    /// Only constructor-based descriptors participate; factory and
    /// instance registrations have opaque dependencies and are skipped.
    /// Services at the same dependency depth are unordered relative to
    /// each other. Computed once and cached.
    pub fn load_order(&self) -> Vec<&ServiceDescriptor> {
        self.load_order
            .get_or_init(|| self.compute_order())
            .iter()
            .filter_map(|key| self.services.get(key))
            .collect()
    }

    fn compute_order(&self) -> Vec<Key> {
        // Every eligible service starts at level 0; each pass forces a
        // dependent strictly below its dependencies. Leaves keep the
        // highest level, so a descending sort puts them first.
        let mut levels: CacheMap<Key, i64> = self
            .services
            .values()
            .filter(|d| d.param_keys().is_some())
            .map(|d| (d.key().clone(), 0i64))
            .collect();
        let keys: Vec<Key> = levels.keys().cloned().collect();

        for pass in 0..MAX_ORDER_PASSES {
            let mut changed = false;
            for key in &keys {
                let Some(params) = self.services.get(key).and_then(|d| d.param_keys()) else {
                    continue;
                };
                let Some(&current) = levels.get(key) else { continue };
                let mut level = current;
                for param in params {
                    if let Some(&dep_level) = levels.get(param) {
                        level = level.min(dep_level - 1);
                    }
                }
                if level != current {
                    levels.insert(key.clone(), level);
                    changed = true;
                }
            }
            if !changed {
                trace!(passes = pass + 1, "load order converged");
                break;
            }
        }

        let mut ordered = keys;
        ordered.sort_by_key(|key| Reverse(levels.get(key).copied().unwrap_or(0)));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Strategy;
    use crate::key::key_of_type;
    use crate::lifetime::Lifetime;
    use crate::provider::ServiceProvider;
    use crate::Resolver;
    use std::any::TypeId;
    use std::sync::Arc;

    // A factory whose erased output does not match the declared service
    // type; only reachable through hand-built descriptors, so the check
    // lives here rather than in the public-API tests.
    #[test]
    fn mismatched_factory_output_fails_instantiation() {
        let descriptor = ServiceDescriptor {
            key: key_of_type::<u32>(),
            lifetime: Lifetime::Transient,
            produced: TypeId::of::<u32>(),
            strategy: Strategy::Factory(Arc::new(|_: &ResolverContext| {
                Ok(Arc::new("wrong".to_string()) as AnyArc)
            })),
        };
        let mut services = CacheMap::default();
        services.insert(descriptor.key.clone(), descriptor);
        let provider = ServiceProvider::new(ServiceRegistry::new(services));

        match provider.get::<u32>() {
            Err(DiError::InstantiationFailed { service, source }) => {
                assert_eq!(service, "u32");
                assert!(source.is_some());
            }
            other => panic!("expected InstantiationFailed, got {:?}", other.map(|_| ())),
        }
    }
}
