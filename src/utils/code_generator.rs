//! Short code generation and validation utilities.
//!
//! Generated codes are drawn uniformly from the 62 ASCII alphanumerics.
//! Uniqueness is enforced by an injected existence check rather than by the
//! quality of the random source; the store's unique constraint stays the final
//! authority.

use crate::error::AppError;
use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::future::Future;
use std::sync::Mutex;
use tracing::debug;

/// Characters a generated code may contain.
pub const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated codes unless configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Upper bound for administrator-chosen codes.
const MAX_CUSTOM_CODE_LENGTH: usize = 64;

/// Random short code generator with an injectable random source.
///
/// The RNG sits behind a mutex that is only held while drawing a single code,
/// never across an `.await`.
pub struct CodeGenerator {
    length: usize,
    rng: Mutex<StdRng>,
}

impl CodeGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn new(length: usize) -> Self {
        Self::with_rng(length, StdRng::from_os_rng())
    }

    /// Creates a generator with a fixed seed, producing a reproducible sequence.
    pub fn with_seed(length: usize, seed: u64) -> Self {
        Self::with_rng(length, StdRng::seed_from_u64(seed))
    }

    /// Creates a generator around an existing random source.
    pub fn with_rng(length: usize, rng: StdRng) -> Self {
        Self {
            length,
            rng: Mutex::new(rng),
        }
    }

    /// Length of the codes this generator produces.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Draws one random code.
    pub fn draw(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        (0..self.length)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    }

    /// Draws codes until `exists` reports one as free.
    ///
    /// There is no retry cap: at 62^6 combinations a long run of collisions is
    /// not a realistic outcome. An error from `exists` ends the search at once
    /// and is returned unchanged, so an unreachable store surfaces as a store
    /// failure instead of an endless loop.
    ///
    /// # Errors
    ///
    /// Propagates the first error returned by `exists`.
    pub async fn generate_unique<F, Fut, E>(&self, mut exists: F) -> Result<String, E>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
    {
        loop {
            let code = self.draw();

            if !exists(code.clone()).await? {
                return Ok(code);
            }

            debug!(code = %code, "Generated short code already taken, drawing again");
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

/// Validates an administrator-chosen short code.
///
/// # Rules
///
/// - Length: 1-64 characters
/// - Allowed characters: ASCII letters, digits, hyphens, underscores
///
/// Uniqueness is not checked here; the store rejects duplicates on insert.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_CUSTOM_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Custom code must be 1-64 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, hyphens, and underscores",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_alphabet_has_62_distinct_characters() {
        let distinct: HashSet<char> = ALPHABET.chars().collect();
        assert_eq!(distinct.len(), 62);
        assert!(ALPHABET.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_draw_has_requested_length() {
        for length in [1, 4, 6, 12, 32] {
            let generator = CodeGenerator::new(length);
            assert_eq!(generator.draw().len(), length);
        }
    }

    #[test]
    fn test_draw_uses_alphabet_only() {
        let generator = CodeGenerator::default();

        for _ in 0..500 {
            let code = generator.draw();
            assert_eq!(code.len(), DEFAULT_CODE_LENGTH);
            assert!(code.chars().all(|c| ALPHABET.contains(c)), "bad code {code}");
        }
    }

    #[test]
    fn test_draw_covers_all_character_classes() {
        let generator = CodeGenerator::with_seed(32, 7);
        let joined: String = (0..50).map(|_| generator.draw()).collect();

        assert!(joined.chars().any(|c| c.is_ascii_lowercase()));
        assert!(joined.chars().any(|c| c.is_ascii_uppercase()));
        assert!(joined.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_seeded_generators_are_reproducible() {
        let first = CodeGenerator::with_seed(6, 42);
        let second = CodeGenerator::with_seed(6, 42);

        for _ in 0..20 {
            assert_eq!(first.draw(), second.draw());
        }
    }

    #[tokio::test]
    async fn test_generate_unique_skips_taken_codes() {
        // Pre-populate with the first codes the seeded sequence will produce.
        let probe = CodeGenerator::with_seed(6, 99);
        let taken: HashSet<String> = (0..3).map(|_| probe.draw()).collect();
        let expected = probe.draw();

        let generator = CodeGenerator::with_seed(6, 99);
        let mut queries = 0;

        let code = generator
            .generate_unique(|candidate| {
                queries += 1;
                let hit = taken.contains(&candidate);
                async move { Ok::<_, AppError>(hit) }
            })
            .await
            .unwrap();

        assert_eq!(code, expected);
        assert_eq!(queries, 4);
    }

    #[tokio::test]
    async fn test_generate_unique_against_populated_store() {
        let generator = CodeGenerator::with_seed(2, 1);
        let mut live: HashSet<String> = HashSet::new();

        // Short codes force frequent collisions against the growing set.
        for _ in 0..1000 {
            let code = generator
                .generate_unique(|candidate| {
                    let hit = live.contains(&candidate);
                    async move { Ok::<_, AppError>(hit) }
                })
                .await
                .unwrap();

            assert_eq!(code.len(), 2);
            assert!(code.chars().all(|c| ALPHABET.contains(c)));
            assert!(live.insert(code), "generator returned a live code");
        }

        assert_eq!(live.len(), 1000);
    }

    #[tokio::test]
    async fn test_generate_unique_propagates_store_failure() {
        let generator = CodeGenerator::default();
        let mut queries = 0;

        let result = generator
            .generate_unique(|_| {
                queries += 1;
                async { Err::<bool, _>(AppError::internal("Database error", json!({}))) }
            })
            .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
        assert_eq!(queries, 1);
    }

    #[test]
    fn test_validate_custom_code_accepts_alphanumerics() {
        assert!(validate_custom_code("promo2025").is_ok());
        assert!(validate_custom_code("Launch-Day_1").is_ok());
        assert!(validate_custom_code("a").is_ok());
    }

    #[test]
    fn test_validate_custom_code_rejects_empty() {
        let err = validate_custom_code("").unwrap_err();
        assert!(err.to_string().contains("1-64 characters"));
    }

    #[test]
    fn test_validate_custom_code_rejects_too_long() {
        assert!(validate_custom_code(&"a".repeat(65)).is_err());
        assert!(validate_custom_code(&"a".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_custom_code_rejects_path_characters() {
        for code in ["with/slash", "sp ace", "q?x", "hash#", "dot.dot", "ümlaut"] {
            assert!(validate_custom_code(code).is_err(), "{code} accepted");
        }
    }
}
