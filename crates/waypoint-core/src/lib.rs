//! Core types and traits for the Waypoint link registry.
//!
//! This crate provides the shared vocabulary used by the store
//! implementations and the registry: the validated [`ShortCode`], the
//! persisted [`LinkRecord`], the [`Clock`] and [`EventSink`] dependencies,
//! and the [`LinkStore`] contract.

pub mod clock;
pub mod error;
pub mod event;
pub mod record;
pub mod shortcode;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StoreError, ValidationError};
pub use event::{Event, EventLevel, EventSink, MemorySink, NullSink};
pub use record::LinkRecord;
pub use shortcode::ShortCode;
pub use store::LinkStore;
