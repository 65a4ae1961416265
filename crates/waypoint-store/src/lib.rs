//! [`LinkStore`][waypoint_core::LinkStore] implementations.
//!
//! [`MemoryStore`] keeps the collection in process memory; [`KvStore`]
//! snapshots it as a single JSON document in an abstract [`KeyValue`]
//! byte store.

pub mod kv;
pub mod memory;

pub use kv::{KeyValue, KvStore, MemoryKv};
pub use memory::MemoryStore;
