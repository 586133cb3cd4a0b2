/*
 * Solmosa Core - Branch-Coverage Test Generation for EVM Bytecode
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Opcode vocabulary shared by every slice
 * - features/    : Vertical slices (flow_graph → cdg → distance → genotype → execution → search)
 * - config/      : Search parameters, presets, YAML I/O
 *
 * Pipeline:
 * - Compact the recovered CFG and rewrite it as a control-dependency graph
 * - Precompute approach levels once per contract
 * - Evolve method-call sequences with DynaMOSA until every branch is covered
 */

#![allow(clippy::too_many_arguments)] // Search operators take the full context
#![allow(clippy::type_complexity)] // Front/index bookkeeping
#![allow(clippy::needless_range_loop)] // Index loops mirror matrix notation
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::upper_case_acronyms)] // CDG, ABI, EVM naming

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Crate-wide error type
pub mod errors;

/// Search configuration (presets, validation, YAML)
pub mod config;

/// Opcode vocabulary
pub mod shared;

/// Vertical feature slices
pub mod features;

pub use errors::{Result, SolmosaError};

pub use features::cdg::{
    BuildCdgUseCase, CdgError, CompactEdge, CompactNode, ControlDependencyGraph, NodeId, NodeIdx,
    Predicate, PredicateKind,
};
pub use features::distance::{ApproachLevelMatrix, FitnessEvaluator, ScoringError};
pub use features::execution::{CallRequest, CallResult, ExecutorError, StackSnapshot, TransactionExecutor};
pub use features::flow_graph::{BasicBlock, ControlFlowGraph, Instruction, MethodCfg};
pub use features::genotype::{
    AbiType, ContractAbi, GenotypeError, InputValue, MethodCall, MethodSpec, TestCase, ValuePools,
};
pub use features::search::{
    ContractUnderTest, DynaMosa, GenerateTestsUseCase, SearchError, SearchOutcome, Termination,
};
