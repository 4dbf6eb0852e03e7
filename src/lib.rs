//! # Consul Token Library
//!
//! Reconciles one Consul ACL token against a declarative description:
//! creates it when missing, updates it when present and removes it when
//! asked to, reporting whether anything changed.
//!
//! Modules:
//! - `config` — YAML configuration, defaults and boundary validation
//! - `consul` — agent HTTP API, version gates, link/identity wire types
//! - `reconcile` — the create/update/remove decision and its outcome
//! - `errors` — validation, remote API and connectivity failures

pub mod config;
pub mod consul;
pub mod errors;
pub mod reconcile;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::errors::ReconcileError;
pub use crate::reconcile::{reconcile_token, Operation, Outcome};
