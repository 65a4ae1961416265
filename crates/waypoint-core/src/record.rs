use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored link record, the sole persisted entity of the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The short code under which the record is reachable.
    pub code: ShortCode,
    /// The original URL that was shortened. Immutable after creation.
    pub original_url: String,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record becomes eligible for pruning. Always after `created_at`.
    pub expires_at: Timestamp,
    /// How many times the record has been successfully resolved.
    pub visit_count: u64,
}

impl LinkRecord {
    /// Returns `true` once the expiry instant has been reached.
    ///
    /// Expiry is inclusive: a record whose `expires_at` equals `now`
    /// is already expired.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    fn record(expires_at: Timestamp) -> LinkRecord {
        LinkRecord {
            code: ShortCode::new_unchecked("abc123"),
            original_url: "https://example.com".to_string(),
            created_at: expires_at - SignedDuration::from_mins(30),
            expires_at,
            visit_count: 0,
        }
    }

    #[test]
    fn not_expired_before_deadline() {
        let now = Timestamp::now();
        let rec = record(now + SignedDuration::from_secs(1));
        assert!(!rec.is_expired(now));
    }

    #[test]
    fn expired_at_exact_deadline() {
        let now = Timestamp::now();
        let rec = record(now);
        assert!(rec.is_expired(now));
    }

    #[test]
    fn expired_after_deadline() {
        let now = Timestamp::now();
        let rec = record(now - SignedDuration::from_secs(1));
        assert!(rec.is_expired(now));
    }

    #[test]
    fn serde_round_trip() {
        let now = Timestamp::now();
        let rec = record(now + SignedDuration::from_mins(30));
        let json = serde_json::to_string(&rec).unwrap();
        let back: LinkRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(rec, back);
    }
}
