//! Turning a scanned file list into collision-free destinations.
//!
//! - `depth` : effective depth and grouping by output directory
//! - `namer` : per-group filename disambiguation
//! - `plan`  : the two combined into a checked copy plan

pub mod depth;
pub mod namer;
pub mod plan;

pub use depth::{group_by_depth, DepthGroup, MaxDepth};
pub use namer::{resolve_group, NameCounter};
pub use plan::{build_plan, Destination, FlattenPlan, PlannedCopy};
