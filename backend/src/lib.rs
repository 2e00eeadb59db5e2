//! User management and stateless token authentication.
//!
//! The [`domain`] module holds transport-agnostic types, ports and services;
//! [`outbound`] provides the adapters wired in by callers.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;
