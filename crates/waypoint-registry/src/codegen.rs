use rand::Rng;
use typed_builder::TypedBuilder;
use url::Url;
use waypoint_core::{ShortCode, ValidationError};

/// Validity applied when a request leaves the duration unspecified.
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Produces candidate short codes.
///
/// Implementations are pure generators that don't interact with storage:
/// candidates are not guaranteed unique, and the registry checks them
/// against the store before use.
pub trait CodeGenerator: Send + Sync {
    /// Generates one candidate short code.
    fn random_code(&self) -> ShortCode;
}

impl<G: CodeGenerator> CodeGenerator for std::sync::Arc<G> {
    fn random_code(&self) -> ShortCode {
        (**self).random_code()
    }
}

/// Generator drawing codes uniformly from the lowercase base-36 alphabet.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct RandomGenerator {
    /// Length of generated codes.
    #[builder(default = 6)]
    length: usize,
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CodeGenerator for RandomGenerator {
    fn random_code(&self) -> ShortCode {
        let mut rng = rand::rng();
        let code: String = (0..self.length)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                ALPHABET[idx] as char
            })
            .collect();
        ShortCode::new_unchecked(code)
    }
}

/// Validates a caller-supplied custom code.
pub fn validate_custom_code(candidate: &str) -> Result<ShortCode, ValidationError> {
    ShortCode::new(candidate)
}

/// Validates that the candidate parses as an absolute URL.
pub fn validate_url(candidate: &str) -> Result<Url, ValidationError> {
    Url::parse(candidate).map_err(|e| ValidationError::InvalidUrl(format!("'{candidate}': {e}")))
}

/// Parses a validity duration from raw form input.
///
/// Empty or absent input yields [`DEFAULT_VALIDITY_MINUTES`]; anything
/// else must be a positive integer number of minutes.
pub fn validate_validity(raw: Option<&str>) -> Result<u32, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(DEFAULT_VALIDITY_MINUTES);
    };

    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidValidity(format!(
            "must be a positive number of minutes, got '{raw}'"
        )));
    }

    match raw.parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ValidationError::InvalidValidity(format!(
            "must be a positive number of minutes, got '{raw}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn random_codes_are_six_lowercase_base36_chars() {
        let generator = RandomGenerator::default();

        for _ in 0..100 {
            let code = generator.random_code();
            assert_eq!(code.as_str().len(), 6);
            assert!(code
                .as_str()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn random_codes_rarely_collide() {
        let generator = RandomGenerator::default();
        let codes: HashSet<String> = (0..1000)
            .map(|_| generator.random_code().to_string())
            .collect();
        // 1000 draws from a 36^6 space should not collide.
        assert_eq!(codes.len(), 1000);
    }

    #[test]
    fn generator_length_is_configurable() {
        let generator = RandomGenerator::builder().length(8).build();
        assert_eq!(generator.random_code().as_str().len(), 8);
    }

    #[test]
    fn accepts_absolute_urls() {
        assert!(validate_url("https://example.com").is_ok());
        assert!(validate_url("http://example.com/a/b?q=1").is_ok());
        assert!(validate_url("ftp://files.example.com").is_ok());
    }

    #[test]
    fn rejects_relative_or_garbage_urls() {
        assert!(matches!(
            validate_url("not-a-valid-url"),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert!(validate_url("/relative/path").is_err());
        assert!(validate_url("").is_err());
    }

    #[test]
    fn empty_validity_yields_default() {
        assert_eq!(validate_validity(None).unwrap(), 30);
        assert_eq!(validate_validity(Some("")).unwrap(), 30);
        assert_eq!(validate_validity(Some("   ")).unwrap(), 30);
    }

    #[test]
    fn positive_integer_validity_parses() {
        assert_eq!(validate_validity(Some("1")).unwrap(), 1);
        assert_eq!(validate_validity(Some("1440")).unwrap(), 1440);
    }

    #[test]
    fn non_positive_or_non_numeric_validity_rejected() {
        for raw in ["0", "-5", "+5", "ten", "1.5", "5m"] {
            assert!(
                matches!(
                    validate_validity(Some(raw)),
                    Err(ValidationError::InvalidValidity(_))
                ),
                "expected '{raw}' to be rejected"
            );
        }
    }
}
