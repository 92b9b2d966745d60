// Solver backends for the triple model.
//
// Both backends answer the same question: which triples can be the single
// true triple once every clue clause holds. They stop after `cap + 1`
// solutions and report whether the cap was exceeded, which is all the
// classifier needs to tell "unique" from "ambiguous".

use rustsat::instances::{BasicVarManager, SatInstance};
use rustsat::solvers::{Solve, SolverResult};
use rustsat::types::{Clause, Lit, TernaryVal};
use tracing::debug;

use crate::error::SolverError;
use crate::model::{ConstraintModel, TripleId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome {
    pub satisfiable: bool,
    /// Satisfying triples in ascending id order, at most `cap` of them.
    /// When more than `cap` exist, which ones are listed depends on the
    /// backend.
    pub solutions: Vec<TripleId>,
    /// More satisfying triples exist beyond `solutions`.
    pub more: bool,
}

impl SolveOutcome {
    fn unsat() -> Self {
        SolveOutcome {
            satisfiable: false,
            solutions: Vec::new(),
            more: false,
        }
    }

    fn from_found(mut found: Vec<TripleId>, cap: usize) -> Self {
        let more = found.len() > cap;
        found.truncate(cap);
        found.sort();
        SolveOutcome {
            satisfiable: !found.is_empty(),
            solutions: found,
            more,
        }
    }
}

pub trait TripleSolver {
    fn name(&self) -> &'static str;

    fn solve(&self, model: &ConstraintModel, cap: usize) -> Result<SolveOutcome, SolverError>;
}

/// Scans the triple space in order and keeps every admitted triple.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveBackend;

impl TripleSolver for ExhaustiveBackend {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve(&self, model: &ConstraintModel, cap: usize) -> Result<SolveOutcome, SolverError> {
        let found: Vec<TripleId> = model
            .space()
            .ids()
            .filter(|id| model.admits(*id))
            .take(cap.saturating_add(1))
            .collect();

        debug!(backend = self.name(), found = found.len(), "enumeration finished");
        Ok(SolveOutcome::from_found(found, cap))
    }
}

/// Encodes the model as CNF and enumerates models with Minisat, blocking
/// each found triple before solving again.
#[derive(Debug, Clone, Copy, Default)]
pub struct SatBackend;

struct TripleVariables {
    instance: SatInstance<BasicVarManager>,
    // triple_true[id] - is this triple the one that happened?
    triple_true: Vec<Lit>,
}

impl TripleVariables {
    fn encode(model: &ConstraintModel) -> Self {
        let mut instance = SatInstance::new();
        let triple_true: Vec<Lit> = model.space().ids().map(|_| instance.new_lit()).collect();

        encode_exactly_one(&mut instance, &triple_true);

        for clause in model.clauses() {
            let clause: Clause = clause
                .lits()
                .iter()
                .map(|lit| {
                    let var = triple_true[lit.triple.0];
                    if lit.positive {
                        var
                    } else {
                        !var
                    }
                })
                .collect();
            instance.add_clause(clause);
        }

        TripleVariables {
            instance,
            triple_true,
        }
    }

    // The triple assigned true in the current model, if any.
    fn extract_true_triple<S: Solve>(
        triple_true: &[Lit],
        solver: &S,
    ) -> Result<Option<TripleId>, SolverError> {
        for (idx, &lit) in triple_true.iter().enumerate() {
            match solver.lit_val(lit) {
                Ok(TernaryVal::True) => return Ok(Some(TripleId(idx))),
                Ok(TernaryVal::False) | Ok(TernaryVal::DontCare) => {}
                Err(e) => return Err(SolverError::Backend(e.to_string())),
            }
        }
        Ok(None)
    }
}

/// Above this many triples the at-most-one half switches from pairwise
/// mutexes to a sequential counter.
const PAIRWISE_LIMIT: usize = 64;

fn encode_exactly_one(instance: &mut SatInstance<BasicVarManager>, lits: &[Lit]) {
    // At least one must be true
    let clause: Clause = lits.iter().copied().collect();
    instance.add_clause(clause);

    if lits.len() <= PAIRWISE_LIMIT {
        // At most one is true (pairwise mutex)
        for i in 0..lits.len() {
            for j in i + 1..lits.len() {
                instance.add_binary(!lits[i], !lits[j]);
            }
        }
    } else {
        encode_at_most_one_sequential(instance, lits);
    }
}

// Sequential counter: seen[i] holds once any of lits[0..=i] is true, and a
// literal may only be true while nothing before it was.
fn encode_at_most_one_sequential(instance: &mut SatInstance<BasicVarManager>, lits: &[Lit]) {
    let Some((last, rest)) = lits.split_last() else {
        return;
    };

    let mut prev: Option<Lit> = None;
    for &lit in rest {
        let seen = instance.new_lit();
        instance.add_binary(!lit, seen);
        if let Some(prev) = prev {
            instance.add_binary(!prev, seen);
            instance.add_binary(!prev, !lit);
        }
        prev = Some(seen);
    }
    if let Some(prev) = prev {
        instance.add_binary(!prev, !*last);
    }
}

impl TripleSolver for SatBackend {
    fn name(&self) -> &'static str {
        "sat"
    }

    fn solve(&self, model: &ConstraintModel, cap: usize) -> Result<SolveOutcome, SolverError> {
        let vars = TripleVariables::encode(model);
        let triple_true = vars.triple_true;

        debug!(
            backend = self.name(),
            variables = vars.instance.n_vars(),
            clauses = vars.instance.n_clauses(),
            "encoded triple model"
        );

        let mut solver = rustsat_minisat::core::Minisat::default();
        solver
            .add_cnf(vars.instance.into_cnf().0)
            .map_err(|e| SolverError::Backend(e.to_string()))?;

        let mut found = Vec::new();
        let mut satisfiable = false;

        while found.len() <= cap {
            let result = solver
                .solve()
                .map_err(|e| SolverError::Backend(e.to_string()))?;

            match result {
                SolverResult::Sat => {
                    satisfiable = true;
                    let Some(triple) = TripleVariables::extract_true_triple(&triple_true, &solver)?
                    else {
                        // A model without a true triple means the encoding is broken;
                        // let the classifier report it.
                        break;
                    };
                    found.push(triple);

                    // Block this triple and look for another
                    let blocking: Clause = std::iter::once(!triple_true[triple.0]).collect();
                    solver
                        .add_clause(blocking)
                        .map_err(|e| SolverError::Backend(e.to_string()))?;
                }
                SolverResult::Unsat => break,
                SolverResult::Interrupted => return Err(SolverError::Interrupted),
            }
        }

        debug!(backend = self.name(), found = found.len(), "enumeration finished");

        if !satisfiable {
            return Ok(SolveOutcome::unsat());
        }
        let mut outcome = SolveOutcome::from_found(found, cap);
        outcome.satisfiable = true;
        Ok(outcome)
    }
}
