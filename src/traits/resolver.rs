//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::descriptor::AnyArc;
use crate::error::{DiError, DiResult};
use crate::key::{key_of_trait, key_of_type, Key};
use crate::provider::{Scope, ServiceProvider};

/// Core resolver trait for object-safe service resolution.
///
/// Implemented by the root [`ServiceProvider`], by [`Scope`], and by the
/// [`ResolverContext`](crate::ResolverContext) handed to factories. Most
/// callers want the typed methods on [`Resolver`] instead.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key.
    ///
    /// Returns `Ok(None)` when the key is not registered — absence is a
    /// valid outcome, distinct from every error. `consumer` is the key of
    /// the type currently being injected into, if any; it is what
    /// injection-only factories receive as their target.
    fn resolve_any(&self, key: &Key, consumer: Option<&Key>) -> DiResult<Option<AnyArc>>;

    /// Creates a new scope for resolving scoped services.
    ///
    /// Scopes are never nested: calling this on a scope yields a fresh
    /// sibling scope bound directly to the root provider.
    fn create_scope(&self) -> Scope;

    /// The root provider behind this resolver.
    fn root(&self) -> ServiceProvider;
}

/// Typed resolution interface built on [`ResolverCore`].
///
/// Both provider variants (and the factory-facing resolver context)
/// implement this, making them interchangeable for service resolution
/// within their respective lifetimes.
///
/// # Examples
///
/// ```rust
/// use servitor::{ServiceCollection, Resolver};
///
/// let mut services = ServiceCollection::new();
/// services.add_singleton(42usize);
///
/// let provider = services.build().unwrap();
/// assert_eq!(*provider.get_required::<usize>().unwrap(), 42);
/// assert!(provider.get::<String>().unwrap().is_none());
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete service type, or `Ok(None)` if unregistered.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Option<Arc<T>>> {
        let key = key_of_type::<T>();
        match self.resolve_any(&key, None)? {
            None => Ok(None),
            Some(any) => any
                .downcast::<T>()
                .map(Some)
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>())),
        }
    }

    /// Resolves a concrete service type, failing with
    /// [`DiError::NotFound`] if it is not registered.
    fn get_required<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        self.get::<T>()?
            .ok_or(DiError::NotFound(std::any::type_name::<T>()))
    }

    /// Resolves a trait-object service, or `Ok(None)` if unregistered.
    fn get_trait<T>(&self) -> DiResult<Option<Arc<T>>>
    where
        T: ?Sized + 'static + Send + Sync,
    {
        let key = key_of_trait::<T>();
        match self.resolve_any(&key, None)? {
            None => Ok(None),
            // Trait objects are stored double-Arc'd; unwrap one level.
            Some(any) => any
                .downcast::<Arc<T>>()
                .map(|boxed| Some((*boxed).clone()))
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>())),
        }
    }

    /// Resolves a trait-object service, failing with
    /// [`DiError::NotFound`] if it is not registered.
    fn get_required_trait<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + 'static + Send + Sync,
    {
        self.get_trait::<T>()?
            .ok_or(DiError::NotFound(std::any::type_name::<T>()))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
