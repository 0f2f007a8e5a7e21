//! Global singletons.

pub mod settings;

use windowsill_core::pool::SharedPool;

/// Get the shared global pool of sketches.
pub fn pool() -> &'static SharedPool {
    static POOL: std::sync::OnceLock<SharedPool> = std::sync::OnceLock::new();
    POOL.get_or_init(SharedPool::new)
}
