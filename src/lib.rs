//! # servitor
//!
//! Lifetime-aware dependency injection for Rust: declarative service
//! registrations resolved on demand into fully-constructed object graphs.
//!
//! ## Features
//!
//! - **Four lifetimes**: Singleton, Scoped, Transient, and InjectionOnly
//!   services with at-most-one-instance-per-lifetime-per-scope semantics
//! - **Constructor wiring**: parameters resolved by type through the same
//!   provider the request came in on, captured without reflection by the
//!   [`constructor!`] family of macros
//! - **Two-tier providers**: a root provider owning singletons and any
//!   number of sibling scopes owning scoped instances
//! - **Trait support**: trait-object services bound to concrete
//!   implementations
//! - **Load order**: a topological ordering of constructor-based services,
//!   dependencies first
//! - **Thread-safe**: `Arc`-based sharing; caches synchronized so racing
//!   first accesses still yield one instance
//!
//! ## Quick start
//!
//! ```rust
//! use servitor::{ServiceCollection, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let mut services = ServiceCollection::new();
//! services.add_singleton(Database {
//!     connection_string: "postgres://localhost".to_string(),
//! });
//! services.add_transient_factory::<UserService, _>(|resolver| UserService {
//!     db: resolver.get_required::<Database>().unwrap(),
//! });
//!
//! let provider = services.build().unwrap();
//! let user_service = provider.get_required::<UserService>().unwrap();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! ```
//!
//! ## Service lifetimes
//!
//! - **Singleton**: created once, shared across the entire application
//! - **Scoped**: created once per scope (one request, one unit of work)
//! - **Transient**: created fresh on every resolution
//! - **InjectionOnly**: created fresh on every resolution by a factory
//!   that also receives the type being injected into
//!
//! ```rust
//! use servitor::{ServiceCollection, Resolver};
//! use std::sync::{Arc, Mutex};
//!
//! struct RequestId(String);
//!
//! let mut services = ServiceCollection::new();
//! let counter = Arc::new(Mutex::new(0));
//! let counter_clone = counter.clone();
//!
//! services.add_scoped_factory::<RequestId, _>(move |_| {
//!     let mut c = counter_clone.lock().unwrap();
//!     *c += 1;
//!     RequestId(format!("req-{}", *c))
//! });
//!
//! let provider = services.build().unwrap();
//! let scope1 = provider.create_scope();
//! let scope2 = provider.create_scope();
//!
//! let req1 = scope1.get_required::<RequestId>().unwrap();
//! let req2 = scope2.get_required::<RequestId>().unwrap();
//! assert_ne!(req1.0, req2.0); // different scopes, different instances
//! ```
//!
//! ## Absent versus broken
//!
//! "Not registered" and "registered but broken" never share a channel:
//! [`Resolver::get`] returns `Ok(None)` for unregistered services and
//! reserves errors for registrations that exist but cannot produce an
//! instance. Only [`Resolver::get_required`] turns absence into
//! [`DiError::NotFound`].

// Module declarations
pub mod collection;
pub mod descriptor;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod registry;
pub mod traits;

mod macros;

// Internal modules
mod internal;

// Re-export core types
pub use collection::ServiceCollection;
pub use descriptor::{AnyArc, Constructor, ResolvedArgs, ServiceDescriptor};
pub use error::{BoxedCause, DiError, DiResult};
pub use key::{key_of_trait, key_of_type, Key};
pub use lifetime::Lifetime;
pub use provider::{ResolverContext, Scope, ServiceProvider};
pub use registry::ServiceRegistry;
pub use traits::{Resolver, ResolverCore};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_singleton_resolution() {
        let mut sc = ServiceCollection::new();
        sc.add_singleton(42usize);

        let sp = sc.build().unwrap();
        let a = sp.get_required::<usize>().unwrap();
        let b = sp.get_required::<usize>().unwrap();

        assert_eq!(*a, 42);
        assert!(Arc::ptr_eq(&a, &b)); // Same instance
    }

    #[test]
    fn test_transient_resolution() {
        let mut sc = ServiceCollection::new();
        let counter = Arc::new(Mutex::new(0));
        let counter_clone = counter.clone();

        sc.add_transient_factory::<String, _>(move |_| {
            let mut c = counter_clone.lock().unwrap();
            *c += 1;
            format!("instance-{}", *c)
        });

        let sp = sc.build().unwrap();
        let a = sp.get_required::<String>().unwrap();
        let b = sp.get_required::<String>().unwrap();

        assert_eq!(a.as_str(), "instance-1");
        assert_eq!(b.as_str(), "instance-2");
        assert!(!Arc::ptr_eq(&a, &b)); // Different instances
    }

    #[test]
    fn test_scoped_resolution() {
        let mut sc = ServiceCollection::new();
        let counter = Arc::new(Mutex::new(0));
        let counter_clone = counter.clone();

        sc.add_scoped_factory::<String, _>(move |_| {
            let mut c = counter_clone.lock().unwrap();
            *c += 1;
            format!("scoped-{}", *c)
        });

        let sp = sc.build().unwrap();

        // Same scope should have same instance
        let scope1 = sp.create_scope();
        let s1a = scope1.get_required::<String>().unwrap();
        let s1b = scope1.get_required::<String>().unwrap();
        assert!(Arc::ptr_eq(&s1a, &s1b));

        // Different scope should have different instance
        let scope2 = sp.create_scope();
        let s2 = scope2.get_required::<String>().unwrap();
        assert!(!Arc::ptr_eq(&s1a, &s2));
    }

    #[test]
    fn test_trait_resolution() {
        trait TestTrait: Send + Sync {
            fn get_value(&self) -> i32;
        }

        struct TestImpl {
            value: i32,
        }

        impl TestTrait for TestImpl {
            fn get_value(&self) -> i32 {
                self.value
            }
        }

        let mut sc = ServiceCollection::new();
        sc.add_singleton_trait::<dyn TestTrait>(Arc::new(TestImpl { value: 42 }));

        let sp = sc.build().unwrap();
        let service = sp.get_required_trait::<dyn TestTrait>().unwrap();
        assert_eq!(service.get_value(), 42);
    }
}
