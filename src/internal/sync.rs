//! Locking and hashing primitives, switchable via the `parking-lot` and
//! `ahash` features.

#[cfg(feature = "parking-lot")]
pub(crate) use parking_lot::Mutex;

#[cfg(not(feature = "parking-lot"))]
pub(crate) struct Mutex<T>(std::sync::Mutex<T>);

#[cfg(not(feature = "parking-lot"))]
impl<T> Mutex<T> {
    pub(crate) fn new(value: T) -> Self {
        Self(std::sync::Mutex::new(value))
    }

    // A poisoned cache only means another thread panicked mid-insert; the
    // map itself is still coherent, so recover the guard.
    pub(crate) fn lock(&self) -> std::sync::MutexGuard<'_, T> {
        self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(feature = "ahash")]
pub(crate) type CacheMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(not(feature = "ahash"))]
pub(crate) type CacheMap<K, V> = std::collections::HashMap<K, V>;
