//! Configuration data structures for the nl2formula service.
//!
//! This module defines the schema for the application settings, including
//! server parameters, generation-provider specifics, and the cost-protection
//! gate limits.

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, workers).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream generation-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Cost-protection gate limits.
    #[serde(default)]
    pub gate: GateConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads for the Axum server.
    /// Default: Number of logical CPU cores.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

/// Settings for the upstream generation provider (OpenAI-compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the chat-completions API.
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model used for formula generation.
    /// Default: `gpt-4o-mini`
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds. A timed-out call fails the request;
    /// the gate never retries it.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Hard cap on completion tokens. Two short lines fit comfortably.
    /// Default: `150`
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature. Low, for deterministic-leaning formulas.
    /// Default: `0.3`
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// When set, the gate serves a canned response after validation and
    /// never contacts the provider. No limiter or quota state is touched.
    /// Default: `false`
    #[serde(default)]
    pub dev_mode: bool,
}

/// Limits enforced by the cost-protection gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Seconds a cached result stays servable.
    /// Default: `3600` (1 hour)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// Maximum number of cached results before LRU eviction.
    /// Default: `1024`
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Length of the per-client sliding window in seconds.
    /// Default: `60`
    #[serde(default = "default_rate_window")]
    pub rate_window_seconds: u64,

    /// Requests admitted per client within one window.
    /// Default: `3`
    #[serde(default = "default_rate_limit")]
    pub rate_limit: usize,

    /// Global ceiling on external generations per calendar day.
    /// Default: `1000`
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u32,

    /// Maximum accepted input length in characters.
    /// Default: `300`
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            api_key: None,
            timeout_seconds: default_timeout(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            dev_mode: false,
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cache_ttl_seconds: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
            rate_window_seconds: default_rate_window(),
            rate_limit: default_rate_limit(),
            daily_limit: default_daily_limit(),
            max_input_chars: default_max_input_chars(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    num_cpus::get()
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_output_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.3
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_capacity() -> usize {
    1024
}

fn default_rate_window() -> u64 {
    60
}

fn default_rate_limit() -> usize {
    3
}

fn default_daily_limit() -> u32 {
    1000
}

fn default_max_input_chars() -> usize {
    300
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
