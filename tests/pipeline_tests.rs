// Gate pipeline tests with scripted generators

use nl2formula::config::GateConfig;
use nl2formula::error::{GateError, Result};
use nl2formula::gate::{Gate, Generator};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Returns a fixed completion and counts how often it is asked.
struct ScriptedGenerator {
    output: String,
    calls: Arc<AtomicUsize>,
}

impl ScriptedGenerator {
    fn new(output: &str) -> Self {
        Self {
            output: output.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Handle on the call counter that survives moving the generator.
    fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Generator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

struct FailingGenerator;

impl Generator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(GateError::Provider("connection reset by peer".to_string()))
    }
}

fn test_config() -> GateConfig {
    GateConfig {
        rate_limit: 3,
        daily_limit: 1000,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_fresh_generation_is_stored_and_counted() {
    let gate = Gate::new(
        &test_config(),
        false,
        ScriptedGenerator::new("=SUM(B:B)\n합계를 계산합니다"),
    );

    let response = gate.handle("1.2.3.4", "B열의 합계").await.unwrap();
    assert_eq!(response.formula, "=SUM(B:B)");
    assert_eq!(response.explanation, "합계를 계산합니다");
    assert!(!response.cached);
    assert_eq!(gate.quota_usage().0, 1);
}

#[tokio::test]
async fn test_whitespace_and_case_variants_hit_the_same_entry() {
    let generator = ScriptedGenerator::new("=SUM(B:B)\n합계를 계산합니다");
    let calls = generator.counter();
    let gate = Gate::new(&test_config(), false, generator);

    let first = gate.handle("1.2.3.4", "  Sum of column B  ").await.unwrap();
    assert!(!first.cached);

    let second = gate.handle("5.6.7.8", "sum of column b").await.unwrap();
    assert!(second.cached);
    assert_eq!(second.formula, first.formula);

    // cache hits never reach the generator or consume quota
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(gate.cache_stats().hits, 1);
    assert_eq!(gate.quota_usage().0, 1);
}

#[tokio::test]
async fn test_malformed_output_rejected_without_state_change() {
    let gate = Gate::new(&test_config(), false, ScriptedGenerator::new("total\nrow count"));

    let err = gate.handle("1.2.3.4", "count rows").await.unwrap_err();
    assert!(matches!(err, GateError::GenerationInvalid(_)));
    assert_eq!(err.status_code().as_u16(), 400);

    assert_eq!(gate.quota_usage().0, 0);
    assert_eq!(gate.cache_stats().entries, 0);
}

#[tokio::test]
async fn test_provider_failure_maps_to_500() {
    let gate = Gate::new(&test_config(), false, FailingGenerator);

    let err = gate.handle("1.2.3.4", "sum of column b").await.unwrap_err();
    assert!(matches!(err, GateError::Provider(_)));
    assert_eq!(err.status_code().as_u16(), 500);
    assert_eq!(gate.quota_usage().0, 0);
}

#[tokio::test]
async fn test_empty_and_oversized_input_rejected() {
    let gate = Gate::new(&test_config(), false, ScriptedGenerator::new("=A1\nok"));

    let err = gate.handle("1.2.3.4", "   \t  ").await.unwrap_err();
    assert!(matches!(err, GateError::InputEmpty));
    assert_eq!(err.status_code().as_u16(), 400);

    let long_input = "a".repeat(301);
    let err = gate.handle("1.2.3.4", &long_input).await.unwrap_err();
    assert!(matches!(err, GateError::InputTooLong(300)));

    // validation failures never touch the client's window
    assert_eq!(gate.client_window_len("1.2.3.4"), 0);
}

#[tokio::test]
async fn test_fourth_request_within_window_is_rate_limited() {
    let gate = Gate::new(
        &test_config(),
        false,
        ScriptedGenerator::new("=SUM(B:B)\n합계를 계산합니다"),
    );

    for _ in 0..3 {
        assert!(gate.handle("9.9.9.9", "sum of column b").await.is_ok());
    }

    // rejected regardless of the entry sitting in cache
    let err = gate.handle("9.9.9.9", "sum of column b").await.unwrap_err();
    assert!(matches!(err, GateError::RateLimited));
    assert_eq!(err.status_code().as_u16(), 429);

    // an unrelated client is unaffected
    assert!(gate.handle("8.8.8.8", "sum of column b").await.is_ok());
}

#[tokio::test]
async fn test_quota_rejection_precedes_rate_limiter_bookkeeping() {
    let config = GateConfig {
        daily_limit: 0,
        ..Default::default()
    };
    let gate = Gate::new(&config, false, ScriptedGenerator::new("=A1\nok"));

    let err = gate.handle("1.2.3.4", "sum of column b").await.unwrap_err();
    assert!(matches!(err, GateError::QuotaExceeded));
    assert_eq!(err.status_code().as_u16(), 429);

    // the client's window must be untouched by a quota rejection
    assert_eq!(gate.client_window_len("1.2.3.4"), 0);
}

#[tokio::test]
async fn test_quota_counts_only_real_generations() {
    let config = GateConfig {
        daily_limit: 2,
        ..Default::default()
    };
    let gate = Gate::new(
        &config,
        false,
        ScriptedGenerator::new("=SUM(B:B)\n합계를 계산합니다"),
    );

    assert!(gate.handle("a", "sum of column b").await.is_ok());
    let hit = gate.handle("b", "sum of column b").await.unwrap();
    assert!(hit.cached);
    // the cache hit left the count untouched
    assert_eq!(gate.quota_usage().0, 1);

    assert!(gate.handle("c", "count of column a").await.is_ok());
    assert_eq!(gate.quota_usage().0, 2);

    // quota is checked before the cache, so even a cached input is rejected now
    let err = gate.handle("d", "sum of column b").await.unwrap_err();
    assert!(matches!(err, GateError::QuotaExceeded));
}

#[tokio::test]
async fn test_dev_mode_short_circuits_after_validation() {
    let generator = ScriptedGenerator::new("=A1\nok");
    let calls = generator.counter();
    let gate = Gate::new(&test_config(), true, generator);

    let response = gate.handle("1.2.3.4", "B열의 합계").await.unwrap();
    assert_eq!(response.formula, "=SUM(B:B)");
    assert!(response.cached);

    // nothing downstream of validation runs
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(gate.quota_usage().0, 0);
    assert_eq!(gate.client_window_len("1.2.3.4"), 0);
    assert_eq!(gate.cache_stats().entries, 0);

    // validation still applies in dev mode
    let err = gate.handle("1.2.3.4", "").await.unwrap_err();
    assert!(matches!(err, GateError::InputEmpty));
}
