//! Service provider module: the root provider and its scopes.
//!
//! The root provider owns singleton instances; scopes own scoped
//! instances. Both resolve transient and injection-only services through
//! the registry without caching.

use std::sync::Arc;

use tracing::trace;

use crate::descriptor::AnyArc;
use crate::error::{DiError, DiResult};
use crate::internal::{CacheMap, Mutex};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registry::ServiceRegistry;
use crate::traits::ResolverCore;

pub mod context;
pub mod scope;

pub use context::ResolverContext;
pub use scope::Scope;

/// The root service provider.
///
/// Resolves services according to their registered lifetimes and owns the
/// singleton cache: singletons are constructed lazily on first request and
/// never evicted. Scoped services are categorically unavailable here —
/// requesting one is an error, never a silent fallback.
///
/// The provider is a cheap handle (`Arc` inside) and can be cloned and
/// shared across threads; clones share the registry and the singleton
/// cache.
///
/// # Examples
///
/// ```rust
/// use servitor::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Config { port: 8080 });
///
/// let provider = services.build().unwrap();
/// let a = provider.get_required::<Config>().unwrap();
/// let b = provider.get_required::<Config>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct ServiceProvider {
    inner: Arc<ProviderInner>,
}

pub(crate) struct ProviderInner {
    pub(crate) registry: ServiceRegistry,
    pub(crate) singletons: Mutex<CacheMap<Key, AnyArc>>,
}

impl ServiceProvider {
    pub(crate) fn new(registry: ServiceRegistry) -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                registry,
                singletons: Mutex::new(CacheMap::default()),
            }),
        }
    }

    /// The registry this provider resolves from.
    pub fn registry(&self) -> &ServiceRegistry {
        &self.inner.registry
    }

    /// Creates a new scope for resolving scoped services.
    ///
    /// Every scope is a direct child of this root; any number may exist
    /// concurrently, each with its own scoped-instance cache.
    pub fn create_scope(&self) -> Scope {
        trace!("scope created");
        Scope::new(self.clone())
    }

    fn resolve_any_impl(&self, key: &Key, consumer: Option<&Key>) -> DiResult<Option<AnyArc>> {
        let name = key.display_name();

        {
            let cache = self.inner.singletons.lock();
            if let Some(hit) = cache.get(key) {
                trace!(service = name, "singleton cache hit");
                return Ok(Some(hit.clone()));
            }
        }

        let Some(descriptor) = self.inner.registry.lookup(key) else {
            return Ok(None);
        };

        match descriptor.lifetime() {
            Lifetime::Scoped => Err(DiError::ScopedInRoot(name)),
            Lifetime::Transient | Lifetime::InjectionOnly => {
                let ctx = ResolverContext::new(self);
                self.inner.registry.resolve(key, &ctx, consumer)
            }
            Lifetime::Singleton => {
                // Construct outside the lock: nested resolution re-enters
                // this cache. First writer wins on a racing first access.
                let ctx = ResolverContext::new(self);
                let Some(value) = self.inner.registry.resolve(key, &ctx, consumer)? else {
                    return Ok(None);
                };
                let mut cache = self.inner.singletons.lock();
                let stored = cache.entry(key.clone()).or_insert(value).clone();
                Ok(Some(stored))
            }
        }
    }

    /// Renders the registry and singleton cache for debugging.
    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Service Provider Debug ===\n");
        s.push_str("Registrations:\n");
        for descriptor in self.inner.registry.descriptors() {
            s.push_str(&format!(
                "  {}: {:?}\n",
                descriptor.key().display_name(),
                descriptor.lifetime()
            ));
        }
        s.push_str(&format!(
            "Cached singletons: {}\n",
            self.inner.singletons.lock().len()
        ));
        s
    }
}

impl Clone for ServiceProvider {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl ResolverCore for ServiceProvider {
    fn resolve_any(&self, key: &Key, consumer: Option<&Key>) -> DiResult<Option<AnyArc>> {
        self.resolve_any_impl(key, consumer)
    }

    fn create_scope(&self) -> Scope {
        ServiceProvider::create_scope(self)
    }

    fn root(&self) -> ServiceProvider {
        self.clone()
    }
}
