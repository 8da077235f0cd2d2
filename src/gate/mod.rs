//! Cost-protection gate in front of the generation provider.
//!
//! Given a raw user request, the gate decides in constant time whether to
//! serve a previously computed answer, reject the request as over-limit, or
//! allow exactly one outstanding generation and record its result for reuse.
//!
//! # Components
//!
//! - `normalize`: canonicalizes raw input into a stable cache key.
//! - `cache`: TTL response cache with bounded LRU eviction.
//! - `rate_limit`: sliding-window log limiter per client identity.
//! - `quota`: global daily generation counter with lazy day rollover.
//! - `pipeline`: the orchestrator composing the above with the provider.

pub mod cache;
pub mod normalize;
pub mod pipeline;
pub mod quota;
pub mod rate_limit;

pub use cache::{CacheStats, FormulaResult, ResponseCache};
pub use normalize::normalize;
pub use pipeline::{Gate, GateResponse, Generator};
pub use quota::QuotaGuard;
pub use rate_limit::RateLimiter;
