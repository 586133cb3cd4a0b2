//! Transaction executor port

use super::domain::{CallRequest, CallResult};
use alloy_primitives::Address;
use thiserror::Error;

/// Failure of the executor collaborator itself
///
/// Per-call problems (insufficient funds, pseudo-calls) are reported as
/// [`CallResult`] sentinels instead.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to start executor: {0}")]
    Spawn(String),

    #[error("executor exited with status {status}: {stderr}")]
    Status { status: i32, stderr: String },

    #[error("malformed executor response: {0}")]
    Protocol(String),

    #[error("executor returned {received} account(s), at least {required} needed")]
    NotEnoughAccounts { required: usize, received: usize },

    #[error("IO error talking to executor: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecutorError {
    pub fn protocol<E: std::fmt::Display>(e: E) -> Self {
        Self::Protocol(e.to_string())
    }
}

/// Runs method-call batches against a fresh deployment
///
/// `execute` is one blocking round trip per generation. Results must come
/// back in submission order, one per request.
pub trait TransactionExecutor {
    /// Funded accounts usable as senders; the first ones deploy
    fn accounts(&mut self, count: usize) -> Result<Vec<Address>, ExecutorError>;

    fn execute(&mut self, calls: &[CallRequest]) -> Result<Vec<CallResult>, ExecutorError>;
}

impl<T: TransactionExecutor + ?Sized> TransactionExecutor for &mut T {
    fn accounts(&mut self, count: usize) -> Result<Vec<Address>, ExecutorError> {
        (**self).accounts(count)
    }

    fn execute(&mut self, calls: &[CallRequest]) -> Result<Vec<CallResult>, ExecutorError> {
        (**self).execute(calls)
    }
}
