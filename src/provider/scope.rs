//! Scoped service resolution.

use tracing::trace;

use crate::descriptor::AnyArc;
use crate::error::DiResult;
use crate::internal::{CacheMap, Mutex};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::traits::ResolverCore;

use super::{ResolverContext, ServiceProvider};

/// Scoped service container for request-scoped dependency resolution.
///
/// A scope caches its own instances of `Scoped` services for as long as it
/// lives and forwards everything else: singletons go to the root provider
/// (which owns that cache), transient and injection-only services are
/// built fresh through the registry with *this scope* as the resolving
/// provider, so their nested dependencies still see scope-local caching.
///
/// Scopes are not nestable — asking a scope for a new scope yields a fresh
/// sibling bound directly to the root. Dropping a scope drops its cached
/// instances; there is no explicit teardown.
///
/// # Examples
///
/// ```rust
/// use servitor::{ServiceCollection, Resolver};
/// use std::sync::{Arc, Mutex};
///
/// struct RequestId(String);
///
/// let mut services = ServiceCollection::new();
/// let counter = Arc::new(Mutex::new(0));
/// let counter_clone = counter.clone();
/// services.add_scoped_factory::<RequestId, _>(move |_| {
///     let mut c = counter_clone.lock().unwrap();
///     *c += 1;
///     RequestId(format!("req-{}", *c))
/// });
///
/// let provider = services.build().unwrap();
/// let scope1 = provider.create_scope();
/// let scope2 = provider.create_scope();
///
/// let a = scope1.get_required::<RequestId>().unwrap();
/// let b = scope1.get_required::<RequestId>().unwrap();
/// let c = scope2.get_required::<RequestId>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));  // same scope, same instance
/// assert!(!Arc::ptr_eq(&a, &c)); // different scopes, different instances
/// ```
pub struct Scope {
    root: ServiceProvider,
    scoped: Mutex<CacheMap<Key, AnyArc>>,
}

impl Scope {
    pub(crate) fn new(root: ServiceProvider) -> Self {
        Self { root, scoped: Mutex::new(CacheMap::default()) }
    }

    fn resolve_any_impl(&self, key: &Key, consumer: Option<&Key>) -> DiResult<Option<AnyArc>> {
        let name = key.display_name();

        {
            let cache = self.scoped.lock();
            if let Some(hit) = cache.get(key) {
                trace!(service = name, "scoped cache hit");
                return Ok(Some(hit.clone()));
            }
        }

        let Some(descriptor) = self.root.registry().lookup(key) else {
            return Ok(None);
        };

        match descriptor.lifetime() {
            // The root owns the singleton cache and the construction.
            Lifetime::Singleton => self.root.resolve_any(key, consumer),
            Lifetime::Transient | Lifetime::InjectionOnly => {
                let ctx = ResolverContext::new(self);
                self.root.registry().resolve(key, &ctx, consumer)
            }
            Lifetime::Scoped => {
                // Construct outside the lock: nested resolution re-enters
                // this cache. First writer wins on a racing first access.
                let ctx = ResolverContext::new(self);
                let Some(value) = self.root.registry().resolve(key, &ctx, consumer)? else {
                    return Ok(None);
                };
                let mut cache = self.scoped.lock();
                let stored = cache.entry(key.clone()).or_insert(value).clone();
                Ok(Some(stored))
            }
        }
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key, consumer: Option<&Key>) -> DiResult<Option<AnyArc>> {
        self.resolve_any_impl(key, consumer)
    }

    fn create_scope(&self) -> Scope {
        self.root.create_scope()
    }

    fn root(&self) -> ServiceProvider {
        self.root.clone()
    }
}
