//! AWS-oriented adapters and handlers for the visit counter.
//!
//! This crate owns runtime integration details (the Lambda handler and the
//! DynamoDB store adapter) and exposes a single runtime module boundary for
//! the contract and configuration primitives in `visit_counter_core`.

pub mod adapters;
pub mod handlers;
pub mod runtime;
