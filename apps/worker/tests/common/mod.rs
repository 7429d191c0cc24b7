//! Common test utilities for worker integration tests

#![allow(dead_code)]

pub mod fixtures;

pub use fixtures::*;
