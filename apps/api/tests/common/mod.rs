//! Common test utilities for API integration tests
//!
//! This module provides shared test infrastructure: database access that
//! skips cleanly when Postgres is absent, router builders wired to mock
//! upstreams, and request/response helpers.

#![allow(unused_imports)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
