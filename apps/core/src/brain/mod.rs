//! # Brain Module
//!
//! Everything needed to turn one question into one answer, without I/O
//! except the encyclopedia lookup behind a trait.
//!
//! ## Components
//! - `intent`: keyword classification into Math, Encyclopedia or General
//! - `extractor`: pulls an arithmetic expression out of free text
//! - `evaluator`: sandboxed arithmetic parser and evaluator
//! - `solvers`: linear, power/root, percentage and trigonometry solvers
//! - `math`: ordered dispatch over the solvers
//! - `encyclopedia`: query cleaning and article formatting
//! - `replies`: general-purpose hint templates
//! - `cache`: exact-text answer cache
//! - `format`: number display and length limits
//! - `assistant`: main orchestrator

pub mod assistant;
pub mod cache;
pub mod encyclopedia;
pub mod evaluator;
pub mod extractor;
pub mod format;
pub mod intent;
pub mod math;
pub mod replies;
pub mod solvers;

// Re-export main types for convenience
pub use assistant::{AnswerLimits, Assistant};
#[allow(unused_imports)]
pub use intent::{Intent, IntentClassifier, IntentResult};
#[allow(unused_imports)]
pub use math::{MathSolver, MathSolverKind};
