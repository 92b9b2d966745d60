use tracing::{debug, info};

use crate::compile::compile_all;
use crate::config::ValidatorConfig;
use crate::error::ValidateError;
use crate::model::{ConstraintModel, Triple, TripleSpace};
use crate::puzzle::{Category, Puzzle, PuzzleSpec};
use crate::solver::TripleSolver;
use crate::verdict::{classify, Diagnostics, Evidence, ValidationSummary, Verdict};

/// Runs the resolve -> compile -> solve -> classify pipeline for one puzzle.
///
/// Validation is a pure function of the puzzle: no I/O, no shared state
/// between runs. A `Validator` can be reused and shared across threads.
pub struct Validator {
    config: ValidatorConfig,
    solver: Box<dyn TripleSolver + Send + Sync>,
}

impl Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        let solver = config.backend.solver();
        Validator { config, solver }
    }

    /// Use a custom backend instead of the one named in the config.
    pub fn with_solver(config: ValidatorConfig, solver: Box<dyn TripleSolver + Send + Sync>) -> Self {
        Validator { config, solver }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Structural checks first, then validation.
    pub fn validate_spec(&self, spec: PuzzleSpec) -> Result<Verdict, ValidateError> {
        let puzzle = Puzzle::from_spec(spec)?;
        self.validate(&puzzle)
    }

    pub fn validate(&self, puzzle: &Puzzle) -> Result<Verdict, ValidateError> {
        let space = TripleSpace::for_puzzle(puzzle);
        let compiled = compile_all(puzzle, &space);

        let mut model = ConstraintModel::new(space);
        model.extend(compiled.clauses);

        debug!(
            triples = space.size(),
            clauses = model.clauses().len(),
            applied = compiled.applied,
            skipped = compiled.skipped.len(),
            "constraint model built"
        );

        let outcome = self.solver.solve(&model, self.config.effective_cap())?;
        let solutions = outcome
            .solutions
            .iter()
            .map(|id| Triple::from_id(puzzle, &space, *id))
            .collect();

        let diagnostics = Diagnostics {
            backend: self.solver.name().to_string(),
            skipped_clues: compiled.skipped,
            warnings: self.size_warnings(puzzle),
        };

        let verdict = classify(Evidence {
            satisfiable: outcome.satisfiable,
            solutions,
            more_solutions: outcome.more,
            declared: &puzzle.solution,
            clues: &puzzle.clues,
            summary: ValidationSummary {
                triple_space: space.size(),
                clues_total: puzzle.clues.len(),
                clues_applied: compiled.applied,
                data_links: compiled.data_links,
            },
            diagnostics,
        });

        info!(
            puzzle = puzzle.meta.id.as_deref().unwrap_or("-"),
            status = verdict.status().name(),
            "puzzle validated"
        );
        Ok(verdict)
    }

    fn size_warnings(&self, puzzle: &Puzzle) -> Vec<String> {
        let range = &self.config.expected_catalog_size;
        [
            Category::Actor,
            Category::Vector,
            Category::Asset,
            Category::StolenData,
        ]
        .into_iter()
        .filter_map(|category| {
            let len = puzzle.catalog(category).len();
            (!range.contains(&len)).then(|| {
                format!(
                    "{category} catalog has {len} item(s); expected {}-{}",
                    range.start(),
                    range.end()
                )
            })
        })
        .collect()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new(ValidatorConfig::default())
    }
}

/// Validate with the default configuration.
pub fn validate(spec: PuzzleSpec) -> Result<Verdict, ValidateError> {
    Validator::default().validate_spec(spec)
}
