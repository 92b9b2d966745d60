// Triple space and the constraint model layered on top of it.
//
// Every (actor, vector, asset) combination gets one dense `TripleId`, laid
// out actor-major so that ascending ids follow catalog order. Clue
// constraints are plain clauses over triple literals; the exactly-one
// cardinality constraint is not stored as clauses here because every
// solver backend applies it directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::puzzle::Puzzle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TripleId(pub usize);

/// Catalog indices of one triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripleIndex {
    pub actor: usize,
    pub vector: usize,
    pub asset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripleSpace {
    actors: usize,
    vectors: usize,
    assets: usize,
}

impl TripleSpace {
    pub fn new(actors: usize, vectors: usize, assets: usize) -> Self {
        TripleSpace {
            actors,
            vectors,
            assets,
        }
    }

    pub fn for_puzzle(puzzle: &Puzzle) -> Self {
        TripleSpace::new(puzzle.actors.len(), puzzle.vectors.len(), puzzle.assets.len())
    }

    pub fn size(&self) -> usize {
        self.actors * self.vectors * self.assets
    }

    pub fn actors(&self) -> usize {
        self.actors
    }

    pub fn vectors(&self) -> usize {
        self.vectors
    }

    pub fn assets(&self) -> usize {
        self.assets
    }

    pub fn id(&self, actor: usize, vector: usize, asset: usize) -> TripleId {
        debug_assert!(actor < self.actors && vector < self.vectors && asset < self.assets);
        TripleId((actor * self.vectors + vector) * self.assets + asset)
    }

    pub fn index(&self, id: TripleId) -> TripleIndex {
        let asset = id.0 % self.assets;
        let rest = id.0 / self.assets;
        TripleIndex {
            actor: rest / self.vectors,
            vector: rest % self.vectors,
            asset,
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = TripleId> {
        (0..self.size()).map(TripleId)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TripleLit {
    pub triple: TripleId,
    pub positive: bool,
}

impl TripleLit {
    pub fn pos(triple: TripleId) -> Self {
        TripleLit {
            triple,
            positive: true,
        }
    }

    pub fn neg(triple: TripleId) -> Self {
        TripleLit {
            triple,
            positive: false,
        }
    }

    /// Truth value when `chosen` is the only true triple.
    fn holds_for(&self, chosen: TripleId) -> bool {
        (self.triple == chosen) == self.positive
    }
}

/// A disjunction of triple literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TripleClause(pub Vec<TripleLit>);

impl TripleClause {
    pub fn unit(lit: TripleLit) -> Self {
        TripleClause(vec![lit])
    }

    pub fn binary(a: TripleLit, b: TripleLit) -> Self {
        TripleClause(vec![a, b])
    }

    pub fn lits(&self) -> &[TripleLit] {
        &self.0
    }

    fn holds_for(&self, chosen: TripleId) -> bool {
        self.0.iter().any(|lit| lit.holds_for(chosen))
    }
}

/// Exactly-one constraint over the triple space, conjoined with every clause
/// contributed by the clue compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintModel {
    space: TripleSpace,
    clauses: Vec<TripleClause>,
}

impl ConstraintModel {
    pub fn new(space: TripleSpace) -> Self {
        ConstraintModel {
            space,
            clauses: Vec::new(),
        }
    }

    pub fn space(&self) -> &TripleSpace {
        &self.space
    }

    pub fn clauses(&self) -> &[TripleClause] {
        &self.clauses
    }

    pub fn add_clause(&mut self, clause: TripleClause) {
        self.clauses.push(clause);
    }

    pub fn extend(&mut self, clauses: impl IntoIterator<Item = TripleClause>) {
        self.clauses.extend(clauses);
    }

    /// Whether the assignment "only `chosen` is true" satisfies every clause.
    /// Under exactly-one these assignments are the whole search space.
    pub fn admits(&self, chosen: TripleId) -> bool {
        self.clauses.iter().all(|clause| clause.holds_for(chosen))
    }
}

/// A triple spelled out with catalog labels, as reported in verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub actor: String,
    pub vector: String,
    pub asset: String,
}

impl Triple {
    pub fn from_id(puzzle: &Puzzle, space: &TripleSpace, id: TripleId) -> Self {
        let idx = space.index(id);
        Triple {
            actor: puzzle.actors.label(idx.actor).to_string(),
            vector: puzzle.vectors.label(idx.vector).to_string(),
            asset: puzzle.assets.label(idx.asset).to_string(),
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.actor, self.vector, self.asset)
    }
}
