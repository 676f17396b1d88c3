//! Nerix Core - Shared types library.
//!
//! This crate provides common types used across all Nerix components:
//! - `platform` - The single deployment serving every tenancy surface
//! - `integration-tests` - End-to-end tests against the assembled router
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles, host classification, tenancy
//!   probes, and session types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
