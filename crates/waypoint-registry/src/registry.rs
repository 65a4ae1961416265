use crate::codegen::{CodeGenerator, DEFAULT_VALIDITY_MINUTES};
use crate::error::{RedirectError, RegistryError};
use crate::{codegen, sink};
use jiff::SignedDuration;
use std::sync::Arc;
use tokio::sync::Mutex;
use typed_builder::TypedBuilder;
use waypoint_core::{
    Clock, Event, EventLevel, EventSink, LinkRecord, LinkStore, ShortCode, ValidationError,
};

/// Tunables for a [`LinkRegistry`] instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RegistrySettings {
    /// Validity applied when a request carries no duration.
    #[builder(default = DEFAULT_VALIDITY_MINUTES)]
    pub default_validity_minutes: u32,
    /// Random-code draws per request before giving up with
    /// [`RegistryError::CodeExhausted`].
    #[builder(default = 10)]
    pub max_code_attempts: u32,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// One row of a batch-create request.
#[derive(Debug, Clone, TypedBuilder)]
pub struct LinkRequest {
    /// The URL to shorten. Must parse as an absolute URL.
    #[builder(setter(into))]
    pub url: String,
    /// Minutes until expiry; `None` means the registry default.
    #[builder(default)]
    pub validity_minutes: Option<u32>,
    /// Caller-chosen code instead of a generated one.
    #[builder(default, setter(strip_option, into))]
    pub custom_code: Option<String>,
}

/// Orchestrates code generation and the store to create and resolve links.
///
/// The registry owns a write lock that serializes its check-then-act
/// sequences (prune/check/insert and prune/lookup/increment), so a single
/// instance is safe to share across tasks even though the store's
/// operations are only individually atomic.
///
/// Batch size is the caller's contract: presentation caps batches at five
/// rows, and the registry processes whatever it is given all-or-nothing.
pub struct LinkRegistry<S, G, C, E> {
    store: Arc<S>,
    generator: Arc<G>,
    clock: Arc<C>,
    events: Arc<E>,
    settings: RegistrySettings,
    write_lock: Mutex<()>,
}

impl<S, G, C, E> LinkRegistry<S, G, C, E>
where
    S: LinkStore,
    G: CodeGenerator,
    C: Clock,
    E: EventSink,
{
    /// Creates a registry with default settings.
    pub fn new(store: S, generator: G, clock: C, events: E) -> Self {
        Self::with_settings(store, generator, clock, events, RegistrySettings::default())
    }

    /// Creates a registry with explicit settings.
    pub fn with_settings(
        store: S,
        generator: G,
        clock: C,
        events: E,
        settings: RegistrySettings,
    ) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            clock: Arc::new(clock),
            events: Arc::new(events),
            settings,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates the whole batch or nothing.
    ///
    /// Rows are validated in order; the first failure aborts the call with
    /// its 1-based row index and no records are inserted. On success the
    /// created records are returned in request order, one info event per
    /// record.
    pub async fn create_batch(
        &self,
        requests: Vec<LinkRequest>,
    ) -> Result<Vec<LinkRecord>, RegistryError> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();

        // Pruning must precede the uniqueness checks below, so codes held
        // by expired records are free again.
        self.store.prune(now).await?;

        let mut staged: Vec<LinkRecord> = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            let row = index + 1;

            codegen::validate_url(&request.url)
                .map_err(|source| RegistryError::Validation { row, source })?;
            let validity_minutes = self.validity_for(request, row)?;

            // An absurdly large validity must come back as a typed error,
            // not blow up inside the timestamp arithmetic.
            let expires_at = now
                .checked_add(SignedDuration::from_mins(i64::from(validity_minutes)))
                .map_err(|_| RegistryError::Validation {
                    row,
                    source: ValidationError::InvalidValidity(format!(
                        "expiry out of the representable time range: {validity_minutes} minutes"
                    )),
                })?;

            let code = match &request.custom_code {
                Some(candidate) => {
                    let code = codegen::validate_custom_code(candidate)
                        .map_err(|source| RegistryError::Validation { row, source })?;
                    if self.is_taken(&staged, code.as_str()).await? {
                        return Err(RegistryError::DuplicateCode {
                            row,
                            code: code.to_string(),
                        });
                    }
                    code
                }
                None => self.generate_code(&staged, row).await?,
            };

            staged.push(LinkRecord {
                code,
                original_url: request.url.clone(),
                created_at: now,
                expires_at,
                visit_count: 0,
            });
        }

        for record in &staged {
            self.store.insert(record.clone()).await?;
            self.events.emit(sink::created(record));
        }

        Ok(staged)
    }

    /// Resolves a short code to its original URL, counting the visit.
    pub async fn resolve(&self, code: &str) -> Result<String, RedirectError> {
        let _guard = self.write_lock.lock().await;
        let now = self.clock.now();
        self.store.prune(now).await?;

        let Some(record) = self.store.find_by_code(code).await? else {
            self.events
                .emit(Event::new(EventLevel::Error, "not_found").with("code", code));
            return Err(RedirectError::NotFound(code.to_string()));
        };

        // Unreachable after the prune above; kept as a guard against a
        // store backend serving a stale read.
        if record.is_expired(now) {
            self.events
                .emit(Event::new(EventLevel::Warn, "expired").with("code", code));
            return Err(RedirectError::Expired(code.to_string()));
        }

        match self.store.record_visit(code).await? {
            Some(updated) => Ok(updated.original_url),
            None => {
                self.events
                    .emit(Event::new(EventLevel::Error, "not_found").with("code", code));
                Err(RedirectError::NotFound(code.to_string()))
            }
        }
    }

    /// Read-only snapshot of the live collection, newest first.
    pub async fn list_all(&self) -> Result<Vec<LinkRecord>, RegistryError> {
        let _guard = self.write_lock.lock().await;
        self.store.prune(self.clock.now()).await?;
        Ok(self.store.list_all().await?)
    }

    fn validity_for(&self, request: &LinkRequest, row: usize) -> Result<u32, RegistryError> {
        match request.validity_minutes {
            None => Ok(self.settings.default_validity_minutes),
            Some(0) => Err(RegistryError::Validation {
                row,
                source: ValidationError::InvalidValidity(
                    "must be a positive number of minutes, got '0'".to_string(),
                ),
            }),
            Some(minutes) => Ok(minutes),
        }
    }

    /// Checks the persisted store and the batch staged so far, so two rows
    /// of one batch cannot claim the same code.
    async fn is_taken(&self, staged: &[LinkRecord], code: &str) -> Result<bool, RegistryError> {
        if staged.iter().any(|r| r.code.as_str() == code) {
            return Ok(true);
        }
        Ok(self.store.exists(code).await?)
    }

    async fn generate_code(
        &self,
        staged: &[LinkRecord],
        row: usize,
    ) -> Result<ShortCode, RegistryError> {
        let mut last_candidate = None;

        for _ in 0..self.settings.max_code_attempts {
            let candidate = self.generator.random_code();
            if !self.is_taken(staged, candidate.as_str()).await? {
                return Ok(candidate);
            }
            last_candidate = Some(candidate);
        }

        let mut event = Event::new(EventLevel::Error, "shortcode_collision");
        if let Some(candidate) = last_candidate {
            event = event.with("code", candidate.as_str());
        }
        self.events.emit(event);

        Err(RegistryError::CodeExhausted { row })
    }
}
