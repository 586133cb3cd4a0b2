//! CDG inspection for the `inspect-cdg` subcommand

use crate::error::Result;
use serde::Serialize;
use serde_json::Value;
use solmosa_core::config::SearchConfig;
use solmosa_core::features::cdg::{build_cdg, CdgSummary};
use solmosa_core::features::search::relevant_targets;
use solmosa_core::{ContractAbi, ContractUnderTest, ControlFlowGraph};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct CdgInspection {
    #[serde(flatten)]
    pub summary: CdgSummary,
    /// Relevance flag per edge, aligned with `edges`
    pub relevant: Vec<bool>,
}

/// Build the CDG of one contract and describe it
pub fn inspect_cdg(cfg_path: &Path, artifact_path: &Path, config: &SearchConfig) -> Result<CdgInspection> {
    let artifact: Value = serde_json::from_str(&std::fs::read_to_string(artifact_path)?)?;
    let cfg = ControlFlowGraph::from_json(&std::fs::read_to_string(cfg_path)?)?;
    let name = artifact
        .get("contractName")
        .and_then(Value::as_str)
        .unwrap_or("contract")
        .to_string();
    let contract = ContractUnderTest::new(name, artifact, cfg);

    let ignored = contract.ignored_signatures(config);
    let abi = ContractAbi::from_artifact(&contract.artifact, &ignored).map_err(solmosa_core::SolmosaError::from)?;
    let payable = abi.payable_signatures();
    let cdg = build_cdg(&contract.name, &contract.cfg, &payable).map_err(solmosa_core::SolmosaError::from)?;

    Ok(CdgInspection {
        summary: cdg.summary(&contract.name),
        relevant: relevant_targets(&cdg, &payable, &ignored),
    })
}
