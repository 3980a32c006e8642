//! Service lifetime definitions.

/// Service lifetimes controlling instance caching behavior
///
/// Defines how service instances are created, cached, and shared within
/// the container. Each lifetime has different caching semantics:
///
/// - **Singleton**: one instance per root provider, shared everywhere
/// - **Scoped**: one instance per scope, shared within that scope
/// - **Transient**: a fresh instance on every resolution
/// - **InjectionOnly**: a fresh instance on every resolution, and the
///   factory additionally receives the type it is being injected into
///
/// # Examples
///
/// ```rust
/// use servitor::{ServiceCollection, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct Repository { db: Arc<Database> }
///
/// let mut services = ServiceCollection::new();
///
/// // Singleton: one instance for the entire application
/// services.add_singleton(Database {
///     url: "postgres://localhost".to_string(),
/// });
///
/// // Scoped: one instance per request/scope
/// services.add_scoped_factory::<Repository, _>(|r| Repository {
///     db: r.get_required::<Database>().unwrap(),
/// });
///
/// let provider = services.build().unwrap();
/// let scope = provider.create_scope();
///
/// let repo_a = scope.get_required::<Repository>().unwrap();
/// let repo_b = scope.get_required::<Repository>().unwrap();
/// assert!(Arc::ptr_eq(&repo_a, &repo_b)); // Same within a scope
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per root provider, cached forever
    ///
    /// Created once on first request, then cached in the root provider and
    /// shared across all scopes and threads.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime
    ///
    /// Created once per scope on first request within that scope. Different
    /// scopes get different instances. Requesting a scoped service directly
    /// from the root provider is an error.
    Scoped,
    /// New instance per resolution, never cached
    Transient,
    /// New instance per resolution, never cached, built by an injection
    /// factory that receives the consuming type
    ///
    /// Injection-only services can only be produced while something is
    /// being injected into a known target; resolving one without a
    /// consuming type is an error. The canonical use is a logger factory
    /// that names each logger after the component receiving it.
    InjectionOnly,
}
