//! Verdict classification.
//!
//! Statuses are checked in a fixed order and the first one that applies
//! wins: unsatisfiable, no-solution, ambiguous, mismatch,
//! data-not-inferable, valid.

use serde::{Deserialize, Serialize};

use crate::compile::DataLink;
use crate::model::Triple;
use crate::puzzle::{Clue, Solution};
use crate::resolve::SkippedClue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    InvalidUnsatisfiable,
    InvalidNoSolution,
    Ambiguous,
    Mismatch,
    DataNotInferable,
    Valid,
}

impl Status {
    pub const fn name(&self) -> &'static str {
        match self {
            Status::InvalidUnsatisfiable => "invalid-unsatisfiable",
            Status::InvalidNoSolution => "invalid-no-solution",
            Status::Ambiguous => "ambiguous",
            Status::Mismatch => "mismatch",
            Status::DataNotInferable => "data-not-inferable",
            Status::Valid => "valid",
        }
    }
}

/// Status-specific payload, tagged by `status` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    InvalidUnsatisfiable,
    InvalidNoSolution,
    /// `solutions` is a sample of at most the solution cap, sorted by
    /// catalog order. The exhaustive backend lists the first ones in that
    /// order; the SAT backend lists the first ones Minisat finds, so the
    /// two may differ when `more_solutions` is set.
    Ambiguous {
        solutions: Vec<Triple>,
        more_solutions: bool,
    },
    Mismatch {
        found: Triple,
        expected: Triple,
    },
    DataNotInferable {
        stolen_data: String,
    },
    Valid {
        solution: Solution,
        summary: ValidationSummary,
    },
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Outcome::InvalidUnsatisfiable => Status::InvalidUnsatisfiable,
            Outcome::InvalidNoSolution => Status::InvalidNoSolution,
            Outcome::Ambiguous { .. } => Status::Ambiguous,
            Outcome::Mismatch { .. } => Status::Mismatch,
            Outcome::DataNotInferable { .. } => Status::DataNotInferable,
            Outcome::Valid { .. } => Status::Valid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub triple_space: usize,
    pub clues_total: usize,
    pub clues_applied: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_links: Vec<DataLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub backend: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_clues: Vec<SkippedClue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(flatten)]
    pub outcome: Outcome,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl Verdict {
    pub fn status(&self) -> Status {
        self.outcome.status()
    }

    pub fn is_valid(&self) -> bool {
        self.status() == Status::Valid
    }
}

/// Everything the classifier looks at, gathered by the validator.
#[derive(Debug, Clone)]
pub struct Evidence<'a> {
    pub satisfiable: bool,
    pub solutions: Vec<Triple>,
    pub more_solutions: bool,
    pub declared: &'a Solution,
    pub clues: &'a [Clue],
    pub summary: ValidationSummary,
    pub diagnostics: Diagnostics,
}

pub fn classify(evidence: Evidence<'_>) -> Verdict {
    let Evidence {
        satisfiable,
        mut solutions,
        more_solutions,
        declared,
        clues,
        summary,
        diagnostics,
    } = evidence;

    let skipped_hint = skipped_hint(&diagnostics);

    if !satisfiable {
        let mut suggestions = vec![
            "Remove or loosen one of the negation or relational clues".to_string(),
            "Check that no affirmative clue demands a vector/asset pair every actor is excluded from"
                .to_string(),
        ];
        suggestions.extend(skipped_hint);
        return Verdict {
            outcome: Outcome::InvalidUnsatisfiable,
            explanation: "The clues contradict each other: no attack scenario satisfies all of them."
                .to_string(),
            suggestions,
            diagnostics,
        };
    }

    if solutions.len() > 1 {
        let listed = solutions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let mut suggestions = vec![
            format!(
                "Add negation or relational clues that rule out {}",
                solutions[1..]
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            "Add a conditional clue pinning the culprit's vector to one asset".to_string(),
        ];
        suggestions.extend(skipped_hint);
        return Verdict {
            outcome: Outcome::Ambiguous {
                solutions,
                more_solutions,
            },
            explanation: format!(
                "The clues allow more than one scenario: {listed}{}",
                if more_solutions { ", and more" } else { "" }
            ),
            suggestions,
            diagnostics,
        };
    }

    let Some(found) = solutions.pop() else {
        return Verdict {
            outcome: Outcome::InvalidNoSolution,
            explanation: format!(
                "The {} backend reported the clues as satisfiable but produced no scenario.",
                diagnostics.backend
            ),
            suggestions: vec![
                "Re-run validation with the exhaustive backend (SPYDIR_BACKEND=exhaustive)"
                    .to_string(),
                "Report this puzzle as a solver bug".to_string(),
            ],
            diagnostics,
        };
    };
    let expected = Triple {
        actor: declared.actor.clone(),
        vector: declared.vector.clone(),
        asset: declared.asset.clone(),
    };

    if found != expected {
        let mut suggestions = vec![
            format!("If {found} is the intended answer, update the declared solution"),
            format!("Otherwise revise the clues so that they lead to {expected}"),
        ];
        suggestions.extend(skipped_hint);
        return Verdict {
            explanation: format!(
                "The clues uniquely determine {found}, but the declared solution is {expected}."
            ),
            outcome: Outcome::Mismatch { found, expected },
            suggestions,
            diagnostics,
        };
    }

    let data = &declared.stolen_data;
    if !clues.iter().any(|clue| clue.text.contains(data.as_str())) {
        return Verdict {
            outcome: Outcome::DataNotInferable {
                stolen_data: data.clone(),
            },
            explanation: format!(
                "The culprit {found} is uniquely determined, but no clue mentions the stolen data '{data}'."
            ),
            suggestions: vec![format!(
                "Add a data-inference clue, e.g. \"Only attacks using {} resulted in theft of {data}.\"",
                found.vector
            )],
            diagnostics,
        };
    }

    Verdict {
        explanation: format!(
            "Unique solution: {} used {} against the {} and stole {}.",
            found.actor, found.vector, found.asset, data
        ),
        outcome: Outcome::Valid {
            solution: declared.clone(),
            summary,
        },
        suggestions: Vec::new(),
        diagnostics,
    }
}

fn skipped_hint(diagnostics: &Diagnostics) -> Option<String> {
    match diagnostics.skipped_clues.len() {
        0 => None,
        n => Some(format!(
            "{n} clue(s) could not be matched to catalog items and were ignored; fix their wording"
        )),
    }
}
