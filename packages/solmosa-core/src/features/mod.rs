//! Vertical feature slices
//!
//! Each slice follows the same layout: `domain` (plain data), `ports`
//! (traits at the process boundary), `infrastructure` (algorithms) and
//! `application` (use cases wiring the pieces together).

pub mod cdg;
pub mod distance;
pub mod execution;
pub mod flow_graph;
pub mod genotype;
pub mod search;
