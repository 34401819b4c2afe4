//! Shared lifecycle-event domain primitives.
//!
//! This crate owns the Auto Scaling lifecycle event contract and the
//! management-subnet naming rule. It intentionally excludes AWS SDK and
//! Lambda runtime concerns.

pub mod contract;
pub mod subnet_naming;
