//! AWS-oriented adapters and handler for the management-interface lifecycle hook.
//!
//! This crate owns runtime integration details (the Lambda entrypoint and the
//! EC2/Auto Scaling adapters) and keeps the orchestration itself free of SDK
//! types so it can run against recorded fakes in tests.

pub mod adapters;
pub mod handlers;
