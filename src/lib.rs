#![warn(missing_docs)]
//! Reconciles declaratively configured monitoring alarms against AWS
//! CloudWatch by issuing idempotent create-or-update calls.

pub mod context;
pub mod http_client;
pub mod loader;
pub mod models;
pub mod provider;
pub mod reconciler;
pub mod region;
pub mod resolver;
