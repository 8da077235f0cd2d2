//! Utility functions and helpers for the nl2formula service.
//!
//! This module provides cross-cutting concerns like structured logging and
//! API-key sanitization.
//!
//! # Submodules
//!
//! - `logging`: Tracing and logging initialization with security filters.

pub mod logging;
