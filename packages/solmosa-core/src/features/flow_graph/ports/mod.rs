//! CFG source port
//!
//! Abstracts over where recovered CFGs come from (a JSON dump written by
//! the recovery tool, an in-memory fixture, ...).

use super::domain::ControlFlowGraph;
use crate::errors::Result;
use std::path::PathBuf;

/// Supplies the control-flow graph of one deployed contract
pub trait CfgSource: Send + Sync {
    fn control_flow_graph(&self) -> Result<ControlFlowGraph>;
}

/// Reads a CFG dump from a JSON file
#[derive(Debug, Clone)]
pub struct JsonCfgSource {
    path: PathBuf,
}

impl JsonCfgSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CfgSource for JsonCfgSource {
    fn control_flow_graph(&self) -> Result<ControlFlowGraph> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(ControlFlowGraph::from_json(&content)?)
    }
}

impl CfgSource for ControlFlowGraph {
    fn control_flow_graph(&self) -> Result<ControlFlowGraph> {
        Ok(self.clone())
    }
}
