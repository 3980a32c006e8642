//! Internal implementation details.

mod sync;

pub(crate) use sync::{CacheMap, Mutex};
