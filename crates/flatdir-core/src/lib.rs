pub mod config;
pub mod copier;
pub mod engine;
pub mod error;
pub mod flatten;
pub mod progress;
pub mod scanner;

pub use config::AppConfig;
pub use engine::{FlattenEngine, FlattenResult};
pub use error::Error;
pub use flatten::{build_plan, Destination, FlattenPlan, MaxDepth, PlannedCopy};
pub use progress::{ProgressReporter, SilentReporter};
pub use scanner::{scan_tree, FileRecord, ScanOptions, ScanReport};
