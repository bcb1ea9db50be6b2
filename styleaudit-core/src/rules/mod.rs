// Main rules module - delegates to semantic sub-modules
// - engine.rs: RuleEngine, the AuditRule trait and shared issue helpers
// - heading_detection.rs: numbering-pattern heading classifier
// - numerals.rs: Chinese / Arabic numeral conversion
// - numbering.rs: per-level numbering continuity
// - typography.rs: heading font family and weight
// - indentation.rs: body paragraph indentation

pub mod engine;
pub mod heading_detection;
pub mod indentation;
pub mod numbering;
pub mod numerals;
pub mod typography;

pub use engine::*;
pub use heading_detection::{Classification, HeadingClassifier, HeadingEntry};
