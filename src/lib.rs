//! fixeval - Quantitative comparison of two fixes for the same bug.
//!
//! A reference fix (written by an engineer) and a candidate fix (typically
//! produced by an automated agent) are each given as before/after snapshots
//! of the files they touched. fixeval turns both into structured analyses
//! (line changes, defect-pattern tags, complexity) and scores the candidate
//! on six metrics: correctness, completeness, pattern match, cleanliness,
//! efficiency and complexity.
//!
//! # Example
//!
//! ```no_run
//! use fixeval::config::Config;
//! use fixeval::core::{FileInput, SubmissionInput};
//! use fixeval::score::Evaluator;
//!
//! let reference = SubmissionInput::new()
//!     .with_file("a.py", FileInput::from_text("x = items[10]\n", "x = items[9]\n"));
//! let candidate = SubmissionInput::new()
//!     .with_file("a.py", FileInput::from_text("x = items[10]\n", "x = items[-1]\n"));
//!
//! let config = Config::default();
//! let evaluator = Evaluator::new(&config.metrics).unwrap();
//! let result = evaluator.evaluate(&reference, &candidate).unwrap();
//! println!("{:.1} ({})", result.overall_score, result.grade);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod core;
pub mod diff;
pub mod input;
pub mod metrics;
pub mod output;
pub mod patterns;
pub mod score;

pub use analysis::{Analyzer, BugFixAnalysis, FileAnalysis};
pub use score::{EvaluationResult, Evaluator};
