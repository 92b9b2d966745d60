//! Clue compiler: turns resolved clues into clauses over the triple space.
//!
//! | archetype      | clauses                                                  |
//! |----------------|----------------------------------------------------------|
//! | negation       | `!(a, v, t)` for every asset `t`                         |
//! | affirmative    | `(a1, v, s) or (a2, v, s) or ...` over all actors        |
//! | relational     | `!(a, v, s)` for every actor `a`                         |
//! | conditional    | `(a, v, t) => (a, v, s)` and `(a, v, s) => !(a, v, t)`    |
//! |                | for every asset `t != s`                                 |
//! | data-inference | none; recorded as a [`DataLink`]                         |

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{TripleClause, TripleLit, TripleSpace};
use crate::puzzle::Puzzle;
use crate::resolve::{resolve_clue, ResolvedClue, SkippedClue};

/// Link between a vector and a stolen-data label stated by a
/// data-inference clue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataLink {
    pub vector: String,
    pub stolen_data: String,
}

/// What a single clue adds to the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contribution {
    pub clauses: Vec<TripleClause>,
    pub data_link: Option<(usize, usize)>,
}

pub fn compile(space: &TripleSpace, clue: &ResolvedClue) -> Contribution {
    let mut out = Contribution::default();

    match *clue {
        ResolvedClue::Negation { actor, vector } => {
            for asset in 0..space.assets() {
                out.clauses
                    .push(TripleClause::unit(TripleLit::neg(space.id(actor, vector, asset))));
            }
        }
        ResolvedClue::Affirmative { vector, asset } => {
            let lits = (0..space.actors())
                .map(|actor| TripleLit::pos(space.id(actor, vector, asset)))
                .collect();
            out.clauses.push(TripleClause(lits));
        }
        ResolvedClue::Relational { vector, asset } => {
            for actor in 0..space.actors() {
                out.clauses
                    .push(TripleClause::unit(TripleLit::neg(space.id(actor, vector, asset))));
            }
        }
        ResolvedClue::Conditional {
            actor,
            vector,
            asset,
        } => {
            let pinned = space.id(actor, vector, asset);
            for other in (0..space.assets()).filter(|&t| t != asset) {
                let elsewhere = space.id(actor, vector, other);
                out.clauses.push(TripleClause::binary(
                    TripleLit::neg(elsewhere),
                    TripleLit::pos(pinned),
                ));
                out.clauses.push(TripleClause::binary(
                    TripleLit::neg(pinned),
                    TripleLit::neg(elsewhere),
                ));
            }
        }
        ResolvedClue::DataInference { vector, data } => {
            out.data_link = Some((vector, data));
        }
    }

    out
}

/// All clues of a puzzle, compiled in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledClues {
    pub clauses: Vec<TripleClause>,
    pub data_links: Vec<DataLink>,
    pub applied: usize,
    pub skipped: Vec<SkippedClue>,
}

pub fn compile_all(puzzle: &Puzzle, space: &TripleSpace) -> CompiledClues {
    let mut compiled = CompiledClues::default();

    for (index, clue) in puzzle.clues.iter().enumerate() {
        let resolved = match resolve_clue(puzzle, index, clue) {
            Ok(resolved) => resolved,
            Err(skipped) => {
                warn!(
                    clue = index,
                    kind = %clue.kind,
                    missing = ?skipped.missing,
                    "skipping clue: {}",
                    clue.text
                );
                compiled.skipped.push(skipped);
                continue;
            }
        };

        let contribution = compile(space, &resolved);
        debug!(
            clue = index,
            kind = %resolved.kind(),
            clauses = contribution.clauses.len(),
            "compiled clue ({})",
            resolved.describe(puzzle)
        );

        compiled.clauses.extend(contribution.clauses);
        if let Some((vector, data)) = contribution.data_link {
            compiled.data_links.push(DataLink {
                vector: puzzle.vectors.label(vector).to_string(),
                stolen_data: puzzle.stolen_data.label(data).to_string(),
            });
        }
        compiled.applied += 1;
    }

    compiled
}
