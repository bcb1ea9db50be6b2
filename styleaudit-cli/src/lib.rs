// All validation lives in styleaudit-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod batch;
pub mod output;
pub mod settings;

// Re-export core types for convenience
pub use styleaudit_core::*;

pub use batch::{plan_jobs, run_batch, BatchJob, BatchOutcome};
pub use output::{default_output_path, review_file, review_source, OutputFormat, ReviewSettings};
pub use settings::{load_config, task_ttl, ConfigOrigin};
