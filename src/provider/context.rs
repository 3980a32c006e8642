//! Resolver context passed to factory functions.

use crate::descriptor::AnyArc;
use crate::error::DiResult;
use crate::key::Key;
use crate::provider::{Scope, ServiceProvider};
use crate::traits::ResolverCore;

/// Context handed to factory functions for resolving dependencies.
///
/// Wraps whichever provider the original request came in on (root or
/// scope), so a factory resolving its own dependencies sees the same
/// caching context as the request that invoked it.
///
/// # Examples
///
/// ```rust
/// use servitor::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(Database { url: "postgres://localhost".to_string() });
/// services.add_transient_factory::<UserService, _>(|resolver| UserService {
///     db: resolver.get_required::<Database>().unwrap(),
/// });
/// ```
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl ResolverCore for ResolverContext<'_> {
    fn resolve_any(&self, key: &Key, consumer: Option<&Key>) -> DiResult<Option<AnyArc>> {
        self.resolver.resolve_any(key, consumer)
    }

    fn create_scope(&self) -> Scope {
        self.resolver.create_scope()
    }

    fn root(&self) -> ServiceProvider {
        self.resolver.root()
    }
}
