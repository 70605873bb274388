//! Cache backends
//!
//! The staging pipeline only knows the [`CacheDistributor`] capability: hand
//! it the staged manifest's path and wait. What a restore means is up to the
//! backend.
//!
//! | Backend | Selected when | Behavior |
//! |---------|---------------|----------|
//! | [`LocalCacheDistributor`] | `cache.enabled = true` | copies `<cache.dir>/<key>` into the restore dir |
//! | [`DisabledDistributor`] | `--no-restore` or `cache.enabled = false` | logs and returns |

pub mod distributor;
pub mod local;

pub use distributor::{create_distributor, CacheDistributor, DisabledDistributor};
pub use local::{CacheLookup, LocalCacheDistributor};
