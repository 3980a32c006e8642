//! Service collection: the fluent registration surface.
//!
//! Registrations are collected declaratively and turned into an immutable
//! [`ServiceRegistry`] by [`ServiceCollection::build`], which also selects
//! constructors, validates every registration, and injects the built-in
//! provider services.

use std::sync::Arc;

use tracing::debug;

use crate::descriptor::{select_constructor, Constructor, ServiceDescriptor};
use crate::error::DiResult;
use crate::internal::CacheMap;
use crate::key::{key_of_type, Key};
use crate::lifetime::Lifetime;
use crate::provider::{ResolverContext, Scope, ServiceProvider};
use crate::registry::ServiceRegistry;
use crate::traits::ResolverCore;
use crate::DiError;

enum Pending {
    Ready(ServiceDescriptor),
    Constructors {
        lifetime: Lifetime,
        service: &'static str,
        candidates: Vec<Constructor>,
    },
}

/// Mutable collection of service registrations.
///
/// Registering the same service type twice replaces the earlier
/// registration. Nothing is validated until [`build`](Self::build); nothing
/// can be registered afterwards — the built registry is immutable.
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
/// services.add_transient_factory::<UserService, _>(|r| UserService {
///     db: r.get_required::<Database>().unwrap(),
/// });
///
/// let provider = services.build().unwrap();
/// let user_service = provider.get_required::<UserService>().unwrap();
/// assert_eq!(user_service.db.url, "postgres://localhost");
/// ```
pub struct ServiceCollection {
    pending: CacheMap<Key, Pending>,
}

impl Default for ServiceCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceCollection {
    /// Creates a new empty service collection.
    pub fn new() -> Self {
        Self { pending: CacheMap::default() }
    }

    fn insert(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        debug!(
            service = descriptor.key().display_name(),
            lifetime = ?descriptor.lifetime(),
            "service registered"
        );
        self.pending
            .insert(descriptor.key().clone(), Pending::Ready(descriptor));
        self
    }

    // ----- Concrete type registrations -----

    /// Registers an already-built instance as a singleton.
    ///
    /// The exact instance is returned on every resolution; no construction
    /// ever runs for it.
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.insert(ServiceDescriptor::instance(value))
    }

    /// Registers a singleton factory, invoked once on first resolution.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(Lifetime::Singleton, factory))
    }

    /// Registers a scoped factory, invoked once per scope.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(Lifetime::Scoped, factory))
    }

    /// Registers a transient factory, invoked on every resolution.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::factory(Lifetime::Transient, factory))
    }

    /// Registers an injection-only factory.
    ///
    /// The factory runs on every resolution and additionally receives the
    /// key of the type the instance is being injected into. The service can
    /// only be resolved as a dependency of something else; resolving it
    /// directly fails with
    /// [`DiError::InjectionOnlyWithoutTarget`](crate::DiError::InjectionOnlyWithoutTarget).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use servitor::ServiceCollection;
    ///
    /// struct Logger { owner: &'static str }
    ///
    /// let mut services = ServiceCollection::new();
    /// services.add_injection_factory::<Logger, _>(|_, target| Logger {
    ///     owner: target.display_name(),
    /// });
    /// ```
    pub fn add_injection_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>, &Key) -> T + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::injection_factory(factory))
    }

    // ----- Trait-object registrations -----

    /// Registers an already-built trait object as a singleton.
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
    {
        self.insert(ServiceDescriptor::trait_instance(value))
    }

    /// Registers a singleton factory producing a trait object.
    pub fn add_singleton_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::trait_factory(Lifetime::Singleton, factory))
    }

    /// Registers a scoped factory producing a trait object.
    pub fn add_scoped_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::trait_factory(Lifetime::Scoped, factory))
    }

    /// Registers a transient factory producing a trait object.
    pub fn add_transient_trait_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        self.insert(ServiceDescriptor::trait_factory(Lifetime::Transient, factory))
    }

    // ----- Constructor registrations -----

    fn add_constructor_candidates(
        &mut self,
        lifetime: Lifetime,
        service: &'static str,
        key: Key,
        candidates: Vec<Constructor>,
    ) -> &mut Self {
        debug!(service, lifetime = ?lifetime, candidates = candidates.len(), "constructors registered");
        self.pending
            .insert(key, Pending::Constructors { lifetime, service, candidates });
        self
    }

    /// Registers a singleton built from a single constructor.
    ///
    /// Constructor parameters are resolved by type through the provider the
    /// resolution request arrives on; see [`constructor!`](crate::constructor).
    pub fn add_singleton_constructor(&mut self, ctor: Constructor) -> &mut Self {
        let key = ctor.service_key().clone();
        let service = key.display_name();
        self.add_constructor_candidates(Lifetime::Singleton, service, key, vec![ctor])
    }

    /// Registers a scoped service built from a single constructor.
    pub fn add_scoped_constructor(&mut self, ctor: Constructor) -> &mut Self {
        let key = ctor.service_key().clone();
        let service = key.display_name();
        self.add_constructor_candidates(Lifetime::Scoped, service, key, vec![ctor])
    }

    /// Registers a transient service built from a single constructor.
    pub fn add_transient_constructor(&mut self, ctor: Constructor) -> &mut Self {
        let key = ctor.service_key().clone();
        let service = key.display_name();
        self.add_constructor_candidates(Lifetime::Transient, service, key, vec![ctor])
    }

    /// Registers a singleton from a list of candidate constructors.
    ///
    /// Exactly one candidate must be eligible: a single candidate wins
    /// outright, otherwise exactly one must be marked
    /// [`designated`](Constructor::designated). Anything else fails
    /// [`build`](Self::build) with
    /// [`DiError::InvalidConstructorCount`](crate::DiError::InvalidConstructorCount).
    pub fn add_singleton_constructors<T: 'static>(
        &mut self,
        candidates: Vec<Constructor>,
    ) -> &mut Self {
        let key = key_of_type::<T>();
        self.add_constructor_candidates(
            Lifetime::Singleton,
            std::any::type_name::<T>(),
            key,
            candidates,
        )
    }

    /// Registers a scoped service from a list of candidate constructors.
    pub fn add_scoped_constructors<T: 'static>(
        &mut self,
        candidates: Vec<Constructor>,
    ) -> &mut Self {
        let key = key_of_type::<T>();
        self.add_constructor_candidates(
            Lifetime::Scoped,
            std::any::type_name::<T>(),
            key,
            candidates,
        )
    }

    /// Registers a transient service from a list of candidate constructors.
    pub fn add_transient_constructors<T: 'static>(
        &mut self,
        candidates: Vec<Constructor>,
    ) -> &mut Self {
        let key = key_of_type::<T>();
        self.add_constructor_candidates(
            Lifetime::Transient,
            std::any::type_name::<T>(),
            key,
            candidates,
        )
    }

    // ----- Build -----

    /// Validates every registration and builds the root provider.
    ///
    /// Constructor selection and lifetime/strategy validation happen here,
    /// before any resolution is attempted. Two built-in services are always
    /// injected, replacing any user registration of the same types: a
    /// transient [`Scope`] (any service can ask for a fresh scope) and a
    /// singleton [`ServiceProvider`] (any service can depend on the root
    /// provider).
    pub fn build(self) -> DiResult<ServiceProvider> {
        let mut services: CacheMap<Key, ServiceDescriptor> = CacheMap::default();

        for (key, pending) in self.pending {
            let descriptor = match pending {
                Pending::Ready(descriptor) => descriptor,
                Pending::Constructors { lifetime, service, candidates } => {
                    for candidate in &candidates {
                        if candidate.service_key() != &key {
                            return Err(DiError::InvalidRegistration {
                                service,
                                reason: "constructor candidate targets a different service type",
                            });
                        }
                    }
                    let selected = select_constructor(service, candidates)?;
                    ServiceDescriptor::from_constructor(lifetime, selected)
                }
            };
            descriptor.validate()?;
            services.insert(key, descriptor);
        }

        let scope_service =
            ServiceDescriptor::factory::<Scope, _>(Lifetime::Transient, |r| r.create_scope());
        services.insert(scope_service.key().clone(), scope_service);

        let provider_service =
            ServiceDescriptor::factory::<ServiceProvider, _>(Lifetime::Singleton, |r| r.root());
        services.insert(provider_service.key().clone(), provider_service);

        Ok(ServiceProvider::new(ServiceRegistry::new(services)))
    }
}
