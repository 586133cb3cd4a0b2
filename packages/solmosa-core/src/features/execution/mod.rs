//! Executor collaborator boundary
//!
//! The core hands a flat, population-ordered list of calls to an external
//! transaction executor and gets back one result per call. Slicing the flat
//! response back into per-test chunks relies only on the submitted call
//! counts.

pub mod domain;
pub mod ports;

pub use domain::{split_by_counts, CallRequest, CallResult, StackSnapshot};
pub use ports::{ExecutorError, TransactionExecutor};
