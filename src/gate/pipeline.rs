// Request gate: validation, quota, rate limit, cache, then generation

use crate::config::GateConfig;
use crate::error::{GateError, Result};
use crate::gate::cache::{CacheStats, FormulaResult, ResponseCache};
use crate::gate::normalize::normalize;
use crate::gate::quota::QuotaGuard;
use crate::gate::rate_limit::RateLimiter;
use crate::metrics;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// External text-generation collaborator.
///
/// The gate treats it as opaque: a prompt goes in, raw completion text comes
/// out, and any failure (including timeout) surfaces as
/// [`GateError::Provider`].
pub trait Generator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Successful gate outcome, serialized verbatim to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateResponse {
    pub formula: String,
    pub explanation: String,
    pub cached: bool,
}

/// Composes the cost-protection stores with the generation provider.
///
/// Each store synchronizes its own read-modify-write internally; the gate
/// never holds a store lock across the provider call.
pub struct Gate<G> {
    generator: G,
    cache: ResponseCache,
    rate_limiter: RateLimiter,
    quota: QuotaGuard,
    max_input_chars: usize,
    dev_mode: bool,
}

impl<G: Generator> Gate<G> {
    pub fn new(config: &GateConfig, dev_mode: bool, generator: G) -> Self {
        Self {
            generator,
            cache: ResponseCache::new(
                Duration::from_secs(config.cache_ttl_seconds),
                config.cache_capacity,
            ),
            rate_limiter: RateLimiter::new(
                Duration::from_secs(config.rate_window_seconds),
                config.rate_limit,
            ),
            quota: QuotaGuard::new(config.daily_limit),
            max_input_chars: config.max_input_chars,
            dev_mode,
        }
    }

    /// Run one request through the gating pipeline.
    ///
    /// Stage order is load-bearing: quota before rate limit (a globally
    /// exhausted quota must not touch per-client windows), both before the
    /// cache lookup, and a cache hit returns before any quota is consumed.
    pub async fn handle(&self, client_id: &str, input: &str) -> Result<GateResponse> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            metrics::record_rejection("input_empty");
            return Err(GateError::InputEmpty);
        }
        if input.chars().count() > self.max_input_chars {
            metrics::record_rejection("input_too_long");
            return Err(GateError::InputTooLong(self.max_input_chars));
        }

        if self.dev_mode {
            debug!("dev mode active, serving canned response");
            return Ok(GateResponse {
                formula: "=SUM(B:B)".to_string(),
                explanation: "B열에 있는 모든 값을 합계로 계산합니다.".to_string(),
                cached: true,
            });
        }

        if !self.quota.check() {
            metrics::record_rejection("quota_exceeded");
            warn!("daily generation quota exhausted, rejecting request");
            return Err(GateError::QuotaExceeded);
        }

        if !self.rate_limiter.check(client_id) {
            metrics::record_rejection("rate_limited");
            debug!(client_id, "rate limit exceeded");
            return Err(GateError::RateLimited);
        }

        let key = normalize(input);
        if let Some(result) = self.cache.get(&key) {
            debug!("cache hit, serving stored result");
            return Ok(GateResponse {
                formula: result.formula,
                explanation: result.explanation,
                cached: true,
            });
        }

        // The provider call runs with no store lock held. Two concurrent
        // misses on the same key may both reach the provider; the later
        // insert simply replaces the earlier one.
        let prompt = build_prompt(trimmed);
        let raw = match self.generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("generation failed: {}", e);
                return Err(e);
            }
        };

        let result = match parse_completion(&raw) {
            Ok(result) => result,
            Err(e) => {
                warn!("discarding malformed generator output: {}", e);
                return Err(e);
            }
        };

        self.cache.insert(key, result.clone());
        self.quota.record_usage();
        info!(formula = %result.formula, "generated and cached new formula");

        Ok(GateResponse {
            formula: result.formula,
            explanation: result.explanation,
            cached: false,
        })
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// `(used, limit)` of today's generation quota.
    pub fn quota_usage(&self) -> (u32, u32) {
        self.quota.usage()
    }

    /// Admitted requests currently inside `client_id`'s rate window.
    pub fn client_window_len(&self, client_id: &str) -> usize {
        self.rate_limiter.window_len(client_id)
    }
}

/// Embed the trimmed input in the fixed instruction template.
///
/// The template pins the output contract: exactly two lines, a formula line
/// starting with `=` and one sentence of Korean explanation.
fn build_prompt(input: &str) -> String {
    format!(
        "다음 설명을 엑셀 수식으로 변환하세요.\n\
         규칙:\n\
         - 출력은 반드시 두 줄\n\
         - 1줄: \"=\"로 시작하는 엑셀 수식\n\
         - 2줄: 한국어 설명 한 문장\n\
         - 추가 텍스트 금지\n\
         \n\
         설명: {input}\n\
         \n\
         형식:\n\
         =FORMULA_HERE\n\
         한국어 설명"
    )
}

/// Split raw completion text into a formula and its explanation.
///
/// Fails if fewer than two non-empty lines remain or the first line does not
/// start with `=`. Extra explanation lines are joined with single spaces.
fn parse_completion(raw: &str) -> Result<FormulaResult> {
    let lines: Vec<&str> = raw
        .trim()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < 2 {
        return Err(GateError::GenerationInvalid(format!(
            "expected a formula line and an explanation line, got {} line(s)",
            lines.len()
        )));
    }
    if !lines[0].starts_with('=') {
        return Err(GateError::GenerationInvalid(
            "first line is not a formula".to_string(),
        ));
    }

    Ok(FormulaResult {
        formula: lines[0].to_string(),
        explanation: lines[1..].join(" "),
    })
}
