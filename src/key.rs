//! Service key types for the dependency injection container.

use std::any::TypeId;

/// Key for service storage and lookup.
///
/// Keys uniquely identify services in the registry and in the provider
/// caches. Concrete types are identified by their [`TypeId`]; trait-object
/// services carry only the trait's type name, since unsized types have no
/// `TypeId` of their own.
///
/// # Examples
///
/// ```rust
/// use servitor::{key_of_type, key_of_trait};
///
/// trait Logger: Send + Sync {}
///
/// let type_key = key_of_type::<u32>();
/// assert_eq!(type_key.display_name(), "u32");
///
/// let trait_key = key_of_trait::<dyn Logger>();
/// assert!(trait_key.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Trait-object binding key, identified by trait name
    Trait(&'static str),
}

impl Key {
    /// Get the type or trait name for display.
    ///
    /// This is the `std::any::type_name` result and is used in error
    /// messages and log events.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
        }
    }
}

// Equality on the TypeId only for concrete types; the name is diagnostic.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

/// Builds the key for a concrete service type.
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Builds the key for a trait-object service.
#[inline(always)]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
