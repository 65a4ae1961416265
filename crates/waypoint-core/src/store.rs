use crate::error::StoreResult;
use crate::record::LinkRecord;
use async_trait::async_trait;
use jiff::Timestamp;

/// The persisted collection of link records.
///
/// Every operation acts on the live view of the collection: callers are
/// expected to run [`prune`][LinkStore::prune] before uniqueness checks and
/// before any full read, so "live" stays accurate. Individual operations
/// are atomic, but compound check-then-act sequences (prune, check, insert)
/// must be serialized by the caller; the registry holds a write lock across
/// them.
///
/// Lookup keys are plain `&str` rather than [`ShortCode`][crate::ShortCode]
/// so presentation can probe arbitrary path segments without validating
/// them first.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Removes every record with `expires_at <= now`.
    /// Returns how many records were dropped. Idempotent.
    async fn prune(&self, now: Timestamp) -> StoreResult<usize>;

    /// Checks whether a live record with the given code is present.
    async fn exists(&self, code: &str) -> StoreResult<bool>;

    /// Inserts a new record at the front of the collection.
    ///
    /// Precondition: no live record shares the code. Returns
    /// `Err(Conflict)` if violated.
    async fn insert(&self, record: LinkRecord) -> StoreResult<()>;

    /// Retrieves the record for a given code.
    /// Returns `None` if no live record matches.
    async fn find_by_code(&self, code: &str) -> StoreResult<Option<LinkRecord>>;

    /// Increments the visit counter on the matching live record and
    /// returns the updated record. Returns `None` if no live record
    /// matches (already pruned or never existed).
    async fn record_visit(&self, code: &str) -> StoreResult<Option<LinkRecord>>;

    /// Returns the full live collection, newest first.
    async fn list_all(&self) -> StoreResult<Vec<LinkRecord>>;
}
