//! Service descriptors: how a registered service gets built, and under
//! what lifetime.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxedCause, DiError, DiResult};
use crate::key::{key_of_trait, key_of_type, Key};
use crate::lifetime::Lifetime;
use crate::provider::ResolverContext;
use crate::traits::ResolverCore;

/// Type-erased `Arc` under which every resolved instance is stored.
///
/// Concrete services are stored as `Arc<T>`; trait-object services are
/// stored as `Arc<Arc<dyn Trait>>` so the outer erased pointer stays sized.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Factory signature: build an instance using the current provider.
pub type FactoryFn = Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Injection factory signature: like [`FactoryFn`], but also receives the
/// key of the type the instance is being injected into.
pub type InjectionFn =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>, &Key) -> DiResult<AnyArc> + Send + Sync>;

/// Constructor callable: consumes the resolved parameters in declaration
/// order and produces the instance, or the failure to attach as a cause.
pub type ConstructFn = Arc<dyn Fn(ResolvedArgs) -> Result<AnyArc, BoxedCause> + Send + Sync>;

/// Ordered, already-resolved constructor arguments.
///
/// Handed to a [`ConstructFn`]; arguments are taken back out in the same
/// order the parameter types were declared. Normally only touched by the
/// expansion of [`constructor!`](crate::constructor).
pub struct ResolvedArgs {
    values: std::vec::IntoIter<AnyArc>,
}

#[derive(Debug)]
struct ArgMismatch {
    expected: &'static str,
}

impl fmt::Display for ArgMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constructor argument is not of type {}", self.expected)
    }
}

impl std::error::Error for ArgMismatch {}

impl ResolvedArgs {
    pub(crate) fn new(values: Vec<AnyArc>) -> Self {
        Self { values: values.into_iter() }
    }

    /// Takes the next argument, downcast to `T`.
    pub fn take<T: 'static + Send + Sync>(&mut self) -> Result<Arc<T>, BoxedCause> {
        let expected = std::any::type_name::<T>();
        let value = self
            .values
            .next()
            .ok_or_else(|| Arc::new(ArgMismatch { expected }) as BoxedCause)?;
        value
            .downcast::<T>()
            .map_err(|_| Arc::new(ArgMismatch { expected }) as BoxedCause)
    }
}

/// A candidate constructor for a constructor-based registration.
///
/// Carries the service key, the ordered parameter keys, and the callable
/// that assembles the instance once the parameters are resolved. Built by
/// the [`constructor!`](crate::constructor),
/// [`try_constructor!`](crate::try_constructor) and
/// [`bound_constructor!`](crate::bound_constructor) macros; a registration
/// may supply several candidates, of which exactly one must be eligible
/// (see [`ServiceCollection`](crate::ServiceCollection)).
pub struct Constructor {
    pub(crate) service: Key,
    pub(crate) implementation: Option<Key>,
    pub(crate) produced: TypeId,
    pub(crate) params: Vec<Key>,
    pub(crate) call: ConstructFn,
    pub(crate) designated: bool,
}

impl Constructor {
    /// Candidate constructor for a concrete service type `T`.
    pub fn new<T: 'static + Send + Sync>(params: Vec<Key>, call: ConstructFn) -> Self {
        Self {
            service: key_of_type::<T>(),
            implementation: None,
            produced: TypeId::of::<T>(),
            params,
            call,
            designated: false,
        }
    }

    /// Candidate constructor for a trait-object service `TSvc`, built from
    /// the concrete implementation `TImpl`.
    ///
    /// The callable must produce an `Arc<TSvc>` (double-`Arc` erased); the
    /// implementation key is what constructor parameters see as their
    /// consuming type.
    pub fn bound<TSvc, TImpl>(params: Vec<Key>, call: ConstructFn) -> Self
    where
        TSvc: ?Sized + 'static + Send + Sync,
        TImpl: 'static,
    {
        Self {
            service: key_of_trait::<TSvc>(),
            implementation: Some(key_of_type::<TImpl>()),
            produced: TypeId::of::<Arc<TSvc>>(),
            params,
            call,
            designated: false,
        }
    }

    /// Marks this candidate as the designated constructor, resolving
    /// ambiguity when a registration supplies several candidates.
    pub fn designated(mut self) -> Self {
        self.designated = true;
        self
    }

    /// The service key this constructor produces.
    pub fn service_key(&self) -> &Key {
        &self.service
    }
}

/// Selects the single eligible constructor from a candidate list.
///
/// Exactly one candidate wins outright; otherwise exactly one designated
/// candidate wins. Anything else is an [`DiError::InvalidConstructorCount`].
pub(crate) fn select_constructor(
    service: &'static str,
    mut candidates: Vec<Constructor>,
) -> DiResult<Constructor> {
    if candidates.len() == 1 {
        return Ok(candidates.pop().expect("len checked"));
    }
    let designated = candidates.iter().filter(|c| c.designated).count();
    if designated == 1 {
        return Ok(candidates
            .into_iter()
            .find(|c| c.designated)
            .expect("count checked"));
    }
    let conflicting = if designated > 1 { designated } else { candidates.len() };
    Err(DiError::InvalidConstructorCount { service, candidates: conflicting })
}

/// How a descriptor produces instances. Exactly one strategy per service.
pub(crate) enum Strategy {
    /// Precomputed instance supplied at registration, returned as-is
    Instance(AnyArc),
    /// Factory invoked with the current provider
    Factory(FactoryFn),
    /// Factory invoked with the current provider and the consuming type
    InjectionFactory(InjectionFn),
    /// Selected constructor: resolve parameters, then invoke the callable
    Constructor(Constructor),
}

impl Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Instance(_) => "instance",
            Strategy::Factory(_) => "factory",
            Strategy::InjectionFactory(_) => "injection-factory",
            Strategy::Constructor(_) => "constructor",
        }
    }
}

/// Immutable description of a registered service.
///
/// Created once while the registry is built and never modified afterwards.
/// The descriptor knows *how* to produce an instance; *whether* and *where*
/// the instance is cached is the provider's concern.
pub struct ServiceDescriptor {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    pub(crate) produced: TypeId,
    pub(crate) strategy: Strategy,
}

impl fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("key", &self.key)
            .field("lifetime", &self.lifetime)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl ServiceDescriptor {
    /// Singleton descriptor wrapping an already-built instance.
    pub(crate) fn instance<T: 'static + Send + Sync>(value: T) -> Self {
        Self {
            key: key_of_type::<T>(),
            lifetime: Lifetime::Singleton,
            produced: TypeId::of::<T>(),
            strategy: Strategy::Instance(Arc::new(value)),
        }
    }

    /// Singleton descriptor wrapping an already-built trait object.
    pub(crate) fn trait_instance<T: ?Sized + 'static + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            key: key_of_trait::<T>(),
            lifetime: Lifetime::Singleton,
            produced: TypeId::of::<Arc<T>>(),
            strategy: Strategy::Instance(Arc::new(value) as AnyArc),
        }
    }

    /// Factory descriptor for a concrete type under the given lifetime.
    pub(crate) fn factory<T, F>(lifetime: Lifetime, factory: F) -> Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> T + Send + Sync + 'static,
    {
        let ctor: FactoryFn =
            Arc::new(move |r: &ResolverContext| Ok(Arc::new(factory(r)) as AnyArc));
        Self {
            key: key_of_type::<T>(),
            lifetime,
            produced: TypeId::of::<T>(),
            strategy: Strategy::Factory(ctor),
        }
    }

    /// Factory descriptor for a trait-object service under the given lifetime.
    pub(crate) fn trait_factory<T, F>(lifetime: Lifetime, factory: F) -> Self
    where
        T: ?Sized + 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>) -> Arc<T> + Send + Sync + 'static,
    {
        let ctor: FactoryFn =
            Arc::new(move |r: &ResolverContext| Ok(Arc::new(factory(r)) as AnyArc));
        Self {
            key: key_of_trait::<T>(),
            lifetime,
            produced: TypeId::of::<Arc<T>>(),
            strategy: Strategy::Factory(ctor),
        }
    }

    /// Injection-only descriptor; the factory sees the consuming type's key.
    pub(crate) fn injection_factory<T, F>(factory: F) -> Self
    where
        T: 'static + Send + Sync,
        F: for<'a> Fn(&ResolverContext<'a>, &Key) -> T + Send + Sync + 'static,
    {
        let ctor: InjectionFn = Arc::new(move |r: &ResolverContext, target: &Key| {
            Ok(Arc::new(factory(r, target)) as AnyArc)
        });
        Self {
            key: key_of_type::<T>(),
            lifetime: Lifetime::InjectionOnly,
            produced: TypeId::of::<T>(),
            strategy: Strategy::InjectionFactory(ctor),
        }
    }

    /// Descriptor around an already-selected constructor.
    pub(crate) fn from_constructor(lifetime: Lifetime, ctor: Constructor) -> Self {
        Self {
            key: ctor.service.clone(),
            lifetime,
            produced: ctor.produced,
            strategy: Strategy::Constructor(ctor),
        }
    }

    /// The key callers use to request this service.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The registered lifetime.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// The concrete implementation key, when it differs from the service key.
    pub fn implementation(&self) -> Option<&Key> {
        match &self.strategy {
            Strategy::Constructor(ctor) => ctor.implementation.as_ref(),
            _ => None,
        }
    }

    /// Ordered constructor parameter keys.
    ///
    /// `Some` only for constructor-based descriptors; factory and instance
    /// descriptors are opaque to dependency-order computation.
    pub fn param_keys(&self) -> Option<&[Key]> {
        match &self.strategy {
            Strategy::Constructor(ctor) => Some(&ctor.params),
            _ => None,
        }
    }

    /// Checks lifetime/strategy coherence at build time.
    ///
    /// The lifetime enum cannot be unset, so the registration errors that
    /// remain are incoherent pairings of strategy and lifetime.
    pub(crate) fn validate(&self) -> DiResult<()> {
        let service = self.key.display_name();
        match (&self.strategy, self.lifetime) {
            (Strategy::Instance(_), Lifetime::Singleton) => Ok(()),
            (Strategy::Instance(_), _) => Err(DiError::InvalidRegistration {
                service,
                reason: "a precomputed instance must be registered as a singleton",
            }),
            (Strategy::InjectionFactory(_), Lifetime::InjectionOnly) => Ok(()),
            (Strategy::InjectionFactory(_), _) => Err(DiError::InvalidRegistration {
                service,
                reason: "an injection factory must be registered as injection-only",
            }),
            (_, Lifetime::InjectionOnly) => Err(DiError::InvalidRegistration {
                service,
                reason: "an injection-only service requires an injection factory",
            }),
            _ => Ok(()),
        }
    }

    /// Whether `value` is of the type this descriptor is declared to produce.
    pub(crate) fn produces(&self, value: &AnyArc) -> bool {
        value.as_ref().type_id() == self.produced
    }

    /// Produces one instance, applying the registered strategy.
    ///
    /// Constructor parameters are resolved through `ctx` — the provider the
    /// original request came in on — so scoping context threads through the
    /// entire construction graph. `consumer` is the type currently being
    /// injected into, required by injection factories.
    pub(crate) fn instantiate(
        &self,
        ctx: &ResolverContext<'_>,
        consumer: Option<&Key>,
    ) -> DiResult<AnyArc> {
        match &self.strategy {
            Strategy::Instance(value) => Ok(value.clone()),
            Strategy::Factory(factory) => factory(ctx),
            Strategy::InjectionFactory(factory) => {
                let target = consumer
                    .ok_or(DiError::InjectionOnlyWithoutTarget(self.key.display_name()))?;
                factory(ctx, target)
            }
            Strategy::Constructor(ctor) => {
                let target = ctor.implementation.as_ref().unwrap_or(&self.key);
                let mut resolved = Vec::with_capacity(ctor.params.len());
                for param in &ctor.params {
                    match ctx.resolve_any(param, Some(target))? {
                        Some(value) => resolved.push(value),
                        None => {
                            return Err(DiError::MissingDependency {
                                dependent: target.display_name(),
                                missing: param.display_name(),
                            })
                        }
                    }
                }
                let value = (ctor.call)(ResolvedArgs::new(resolved)).map_err(|cause| {
                    DiError::InstantiationFailed {
                        service: self.key.display_name(),
                        source: Some(cause),
                    }
                })?;
                if !self.produces(&value) {
                    return Err(DiError::TypeMismatch(self.key.display_name()));
                }
                Ok(value)
            }
        }
    }
}
