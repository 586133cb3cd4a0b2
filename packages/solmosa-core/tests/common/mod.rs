//! Common test utilities for solmosa-core
//!
//! Shared CFG fixtures and a scripted executor that fabricates traces
//! for them, so searches can run end to end without an EVM.

#![allow(dead_code)]

mod executor;
mod fixtures;

pub use executor::*;
pub use fixtures::*;
