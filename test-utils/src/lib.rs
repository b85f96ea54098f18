//! Shared test utilities for the ledger client.
//!
//! This crate provides:
//! - Proptest generators for request fields and status codes
//! - A recording mock of the ledger stubs
//! - Fixtures with sample key material and status payloads

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mocks;

pub use generators::*;
pub use mocks::{MockLedgerStub, Operation, RecordedCall, RecordedRequest};
