//! CDG construction use case

use crate::features::cdg::domain::ControlDependencyGraph;
use crate::features::cdg::infrastructure::{
    compact_methods, eliminate_revert_nodes, CdgResult, DominatorAnalyzer,
};
use crate::features::flow_graph::ports::CfgSource;
use crate::features::flow_graph::ControlFlowGraph;
use std::collections::BTreeSet;
use tracing::info;

/// Compaction → revert elimination → dominator rewrite
pub struct BuildCdgUseCase<S: CfgSource> {
    source: S,
}

impl<S: CfgSource> BuildCdgUseCase<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn execute(
        &self,
        contract: &str,
        payable_methods: &BTreeSet<String>,
    ) -> crate::errors::Result<ControlDependencyGraph> {
        let cfg = self.source.control_flow_graph()?;
        Ok(build_cdg(contract, &cfg, payable_methods)?)
    }
}

/// Build the CDG of one contract from its recovered CFG
pub fn build_cdg(
    contract: &str,
    cfg: &ControlFlowGraph,
    payable_methods: &BTreeSet<String>,
) -> CdgResult<ControlDependencyGraph> {
    let mut graph = compact_methods(cfg)?;
    let compacted = graph.len();
    let eliminated = eliminate_revert_nodes(&mut graph, payable_methods)?;
    let cdg = DominatorAnalyzer::rewrite(graph)?;

    info!(
        contract,
        blocks = cfg.block_count(),
        compact_nodes = compacted,
        reverts_eliminated = eliminated,
        cdg_nodes = cdg.nodes().len(),
        cdg_edges = cdg.edge_count(),
        "built control-dependency graph"
    );
    Ok(cdg)
}
