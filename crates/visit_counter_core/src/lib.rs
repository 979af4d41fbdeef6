//! Shared visit counter domain primitives.
//!
//! This crate owns the counter record identity, the increment-or-initialize
//! operation description, response body contracts and configuration
//! resolution. It intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod config;
pub mod contract;
