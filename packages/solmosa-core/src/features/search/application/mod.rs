//! Test generation use case
//!
//! Wires one contract through the whole pipeline: ABI normalisation,
//! CDG construction, target selection, literal pools and the DynaMOSA
//! loop. The executor is the only collaborator with side effects.

use crate::config::{SearchConfig, Validatable};
use crate::errors::Result;
use crate::features::cdg::build_cdg;
use crate::features::distance::ApproachLevelMatrix;
use crate::features::execution::TransactionExecutor;
use crate::features::flow_graph::ControlFlowGraph;
use crate::features::genotype::{
    scrape_pools, state_variable_getters, ContractAbi, TestCaseGenerator, ValuePools,
};
use crate::features::search::domain::{relevant_targets, SearchOutcome};
use crate::features::search::infrastructure::DynaMosa;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Everything known about one contract before the search
#[derive(Debug, Clone)]
pub struct ContractUnderTest {
    pub name: String,
    /// Compiled artifact (`contractName`, `abi`, optional `ast`)
    pub artifact: Value,
    pub cfg: ControlFlowGraph,
    /// Solidity source used for literal pools
    pub source: Option<String>,
}

impl ContractUnderTest {
    pub fn new(name: impl Into<String>, artifact: Value, cfg: ControlFlowGraph) -> Self {
        Self {
            name: name.into(),
            artifact,
            cfg,
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Signatures never called: configured ones plus state-variable getters
    pub fn ignored_signatures(&self, config: &SearchConfig) -> Vec<String> {
        let mut ignored = config.values.ignore_functions.clone();
        if config.values.ignore_state_variable_getters {
            match self.artifact.get("ast") {
                Some(ast) => ignored.extend(state_variable_getters(ast)),
                None => debug!(contract = %self.name, "artifact has no ast, getters not filtered"),
            }
        }
        ignored.sort();
        ignored.dedup();
        ignored
    }
}

/// Generate branch-covering tests for one contract
pub struct GenerateTestsUseCase<E: TransactionExecutor> {
    executor: E,
    config: SearchConfig,
}

impl<E: TransactionExecutor> GenerateTestsUseCase<E> {
    pub fn new(executor: E, config: SearchConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run with the configured seed, or from entropy when unset
    pub fn execute(&mut self, contract: &ContractUnderTest) -> Result<SearchOutcome> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.execute_with_rng(contract, &mut rng)
    }

    pub fn execute_with_rng<R: Rng + ?Sized>(
        &mut self,
        contract: &ContractUnderTest,
        rng: &mut R,
    ) -> Result<SearchOutcome> {
        self.config.validate()?;
        info!(contract = %contract.name, config = %self.config.describe(), "generating tests");

        let ignored = contract.ignored_signatures(&self.config);
        let abi = ContractAbi::from_artifact(&contract.artifact, &ignored)?;
        let payable = abi.payable_signatures();

        let cdg = build_cdg(&contract.name, &contract.cfg, &payable)?;
        let relevant = relevant_targets(&cdg, &payable, &ignored);
        if !relevant.contains(&true) {
            info!(contract = %contract.name, edges = cdg.edge_count(), "no relevant targets");
            return Ok(SearchOutcome::without_targets(relevant, Utc::now()));
        }
        let approach_levels = ApproachLevelMatrix::compute(&cdg);

        let accounts = self.executor.accounts(self.config.values.max_accounts)?;
        let pools = match &contract.source {
            Some(source) => scrape_pools(source, &accounts),
            None => {
                warn!(contract = %contract.name, "no source available, literal pools are empty");
                ValuePools::default()
            }
        };
        debug!(
            addresses = pools.addresses.len(),
            wei = pools.wei.len(),
            ints = pools.ints.len(),
            strings = pools.strings.len(),
            "literal pools"
        );

        let generator = TestCaseGenerator::new(
            abi,
            pools,
            accounts,
            self.config.sequence.clone(),
            self.config.values.clone(),
        )?;
        let search = DynaMosa::new(
            &cdg,
            &approach_levels,
            relevant,
            &generator,
            self.config.genetic.clone(),
            &mut self.executor,
        );
        search.run(rng)
    }
}
