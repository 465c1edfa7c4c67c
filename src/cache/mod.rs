//! Caching subsystem.
//!
//! [`ClusterCache`] holds recent cluster search results keyed on
//! `(keyword, limit)` so repeated chat commands within a short window do not
//! hit the upstream API again. Entries leave the cache only through expiry
//! or capacity eviction; there is no explicit invalidation.

mod cluster;

pub use cluster::{CacheConfig, ClusterCache, ClusterKey};
