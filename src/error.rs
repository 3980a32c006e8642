//! Error types for the dependency injection container.

use std::fmt;
use std::sync::Arc;

/// Shared boxed error used as the cause of an [`DiError::InstantiationFailed`].
pub type BoxedCause = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency injection errors
///
/// Represents the error conditions that can occur while building a
/// container or resolving services from it. "Not registered" is never an
/// error: [`Resolver::get`](crate::Resolver::get) reports an absent service
/// as `Ok(None)`, and only [`Resolver::get_required`](crate::Resolver::get_required)
/// turns absence into [`DiError::NotFound`]. Every other variant means a
/// service *was* registered but its registration or construction is broken.
///
/// # Examples
///
/// ```rust
/// use servitor::{DiError, ServiceCollection, Resolver};
///
/// let provider = ServiceCollection::new().build().unwrap();
///
/// // Absent services are not an error on the optional path...
/// assert!(provider.get::<String>().unwrap().is_none());
///
/// // ...but are on the required path.
/// match provider.get_required::<String>() {
///     Err(DiError::NotFound(name)) => assert_eq!(name, "alloc::string::String"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Required service not registered
    NotFound(&'static str),
    /// Resolved or constructed value was not of the registered service type
    TypeMismatch(&'static str),
    /// A constructor parameter resolved to absent during recursive construction
    MissingDependency {
        /// The type being constructed
        dependent: &'static str,
        /// The parameter type that was not registered
        missing: &'static str,
    },
    /// Scoped service requested directly from the root provider
    ScopedInRoot(&'static str),
    /// Registration combines a lifetime and construction strategy incoherently
    InvalidRegistration {
        /// The service whose registration is broken
        service: &'static str,
        /// What is wrong with it
        reason: &'static str,
    },
    /// Zero or ambiguous constructor candidates for a constructor-based registration
    InvalidConstructorCount {
        /// The service whose constructors could not be selected
        service: &'static str,
        /// Number of candidates in conflict (0 for none at all)
        candidates: usize,
    },
    /// Injection-only factory invoked without a consuming type
    InjectionOnlyWithoutTarget(&'static str),
    /// The underlying construction call failed; the original error is the cause
    InstantiationFailed {
        /// The service that failed to construct
        service: &'static str,
        /// The underlying failure, when the constructor reported one
        source: Option<BoxedCause>,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::NotFound(name) => write!(f, "Service not found: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::MissingDependency { dependent, missing } => {
                write!(f, "Missing dependency: {} requires unregistered {}", dependent, missing)
            }
            DiError::ScopedInRoot(name) => {
                write!(f, "Scoped service {} cannot be resolved from the root provider", name)
            }
            DiError::InvalidRegistration { service, reason } => {
                write!(f, "Invalid registration for {}: {}", service, reason)
            }
            DiError::InvalidConstructorCount { service, candidates } => {
                write!(
                    f,
                    "Constructor selection for {} failed: {} eligible candidates, expected exactly one",
                    service, candidates
                )
            }
            DiError::InjectionOnlyWithoutTarget(name) => {
                write!(f, "Injection-only service {} resolved without an injection target", name)
            }
            DiError::InstantiationFailed { service, source } => match source {
                Some(cause) => write!(f, "Failed to instantiate {}: {}", service, cause),
                None => write!(f, "Failed to instantiate {}", service),
            },
        }
    }
}

impl std::error::Error for DiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DiError::InstantiationFailed { source: Some(cause), .. } => {
                let cause: &(dyn std::error::Error + 'static) = &**cause;
                Some(cause)
            }
            _ => None,
        }
    }
}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout servitor.
pub type DiResult<T> = Result<T, DiError>;
