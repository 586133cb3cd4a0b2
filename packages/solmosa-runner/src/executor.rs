//! Process-backed transaction executor
//!
//! One child process per request. The request goes to stdin as a single
//! JSON document and the response is read from stdout:
//!
//! ```text
//! -> {"contract": {"abi": [...], "bytecode": "0x.."}, "calls": [CallRequest, ...]}
//! <- {"results": [CallResult, ...]}
//!
//! -> {"contract": {...}, "accounts": 10}
//! <- {"accounts": ["0x..", ...]}
//! ```

use crate::config::ExecutorSettings;
use crate::error::Result;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use solmosa_core::{CallRequest, CallResult, ContractUnderTest, ExecutorError, TransactionExecutor};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Creates one executor per contract run
pub trait ExecutorFactory {
    type Executor: TransactionExecutor;

    fn create(&self, contract: &ContractUnderTest) -> Result<Self::Executor>;
}

#[derive(Debug, Serialize)]
struct BatchRequest<'a> {
    contract: &'a Value,
    calls: &'a [CallRequest],
}

#[derive(Debug, Serialize)]
struct AccountsRequest<'a> {
    contract: &'a Value,
    accounts: usize,
}

#[derive(Debug, Deserialize)]
struct BatchResponse {
    results: Vec<CallResult>,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<Address>,
}

#[derive(Debug, Clone)]
pub struct CommandExecutor {
    settings: ExecutorSettings,
    /// `abi` and `bytecode` of the contract under test
    contract: Value,
}

impl CommandExecutor {
    pub fn new(settings: ExecutorSettings, artifact: &Value) -> Self {
        let contract = json!({
            "abi": artifact.get("abi").cloned().unwrap_or(Value::Null),
            "bytecode": artifact.get("bytecode").cloned().unwrap_or(Value::Null),
        });
        Self { settings, contract }
    }

    fn round_trip<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        request: &Req,
    ) -> std::result::Result<Resp, ExecutorError> {
        let payload = serde_json::to_vec(request).map_err(ExecutorError::protocol)?;

        let mut child = Command::new(&self.settings.program)
            .args(&self.settings.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ExecutorError::Spawn(format!("{}: {}", self.settings.program.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&payload)?;
        }
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(ExecutorError::Status {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        serde_json::from_slice(&output.stdout).map_err(ExecutorError::protocol)
    }
}

impl TransactionExecutor for CommandExecutor {
    fn accounts(&mut self, count: usize) -> std::result::Result<Vec<Address>, ExecutorError> {
        let response: AccountsResponse = self.round_trip(&AccountsRequest {
            contract: &self.contract,
            accounts: count,
        })?;
        if response.accounts.is_empty() {
            return Err(ExecutorError::NotEnoughAccounts {
                required: 1,
                received: 0,
            });
        }
        let mut accounts = response.accounts;
        accounts.truncate(count);
        debug!(accounts = accounts.len(), "executor accounts");
        Ok(accounts)
    }

    fn execute(&mut self, calls: &[CallRequest]) -> std::result::Result<Vec<CallResult>, ExecutorError> {
        let response: BatchResponse = self.round_trip(&BatchRequest {
            contract: &self.contract,
            calls,
        })?;
        debug!(calls = calls.len(), results = response.results.len(), "executor batch");
        Ok(response.results)
    }
}

/// Spawns the configured program for every contract
#[derive(Debug, Clone)]
pub struct CommandExecutorFactory {
    settings: ExecutorSettings,
}

impl CommandExecutorFactory {
    pub fn new(settings: ExecutorSettings) -> Self {
        Self { settings }
    }
}

impl ExecutorFactory for CommandExecutorFactory {
    type Executor = CommandExecutor;

    fn create(&self, contract: &ContractUnderTest) -> Result<CommandExecutor> {
        Ok(CommandExecutor::new(self.settings.clone(), &contract.artifact))
    }
}
