//! SpydirWebz puzzle validation engine.
//!
//! A puzzle asks "who used which attack vector against which asset, and
//! what was stolen". The engine resolves each free-text clue against the
//! puzzle's catalogs, compiles it into clauses over one boolean per
//! (actor, vector, asset) triple, solves under an exactly-one constraint
//! and classifies the result into a [`Verdict`].
//!
//! ```no_run
//! use spydirwebz_core::{validate, PuzzleSpec};
//!
//! let json = std::fs::read_to_string("demos/web_1.json").unwrap();
//! let spec: PuzzleSpec = serde_json::from_str(&json).unwrap();
//! let verdict = validate(spec).unwrap();
//! println!("{}: {}", verdict.status().name(), verdict.explanation);
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod model;
pub mod puzzle;
pub mod resolve;
pub mod solver;
pub mod validator;
pub mod verdict;

pub use config::{BackendKind, ValidatorConfig};
pub use error::{ConfigError, PuzzleError, SolverError, ValidateError};
pub use model::Triple;
pub use puzzle::{Category, Clue, ClueKind, Difficulty, Puzzle, PuzzleMeta, PuzzleSpec, Solution};
pub use validator::{validate, Validator};
pub use verdict::{Outcome, Status, Verdict};
