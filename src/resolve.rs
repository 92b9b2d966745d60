// Entity resolution for free-text clues.
//
// A clue refers to a catalog item when the item's label occurs anywhere in
// the clue text. Catalogs are scanned in order and the first hit wins, so a
// label that is a substring of another label (or of unrelated words in the
// sentence) can shadow the intended item. This is best-effort by nature;
// puzzles with overlapping labels are not supported.

use serde::{Deserialize, Serialize};

use crate::puzzle::{Catalog, Category, Clue, ClueKind, Puzzle};

/// A clue whose archetype-required entities were all found, carrying the
/// catalog indices it refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedClue {
    Negation { actor: usize, vector: usize },
    Affirmative { vector: usize, asset: usize },
    Relational { vector: usize, asset: usize },
    Conditional { actor: usize, vector: usize, asset: usize },
    DataInference { vector: usize, data: usize },
}

impl ResolvedClue {
    pub fn kind(&self) -> ClueKind {
        match self {
            ResolvedClue::Negation { .. } => ClueKind::Negation,
            ResolvedClue::Affirmative { .. } => ClueKind::Affirmative,
            ResolvedClue::Relational { .. } => ClueKind::Relational,
            ResolvedClue::Conditional { .. } => ClueKind::Conditional,
            ResolvedClue::DataInference { .. } => ClueKind::DataInference,
        }
    }

    /// Human readable list of the resolved labels, e.g. `actor=A vector=X`.
    pub fn describe(&self, puzzle: &Puzzle) -> String {
        let part = |category: Category, index: usize| {
            format!("{}={}", category, puzzle.catalog(category).label(index))
        };
        let parts = match *self {
            ResolvedClue::Negation { actor, vector } => {
                vec![part(Category::Actor, actor), part(Category::Vector, vector)]
            }
            ResolvedClue::Affirmative { vector, asset }
            | ResolvedClue::Relational { vector, asset } => {
                vec![part(Category::Vector, vector), part(Category::Asset, asset)]
            }
            ResolvedClue::Conditional {
                actor,
                vector,
                asset,
            } => vec![
                part(Category::Actor, actor),
                part(Category::Vector, vector),
                part(Category::Asset, asset),
            ],
            ResolvedClue::DataInference { vector, data } => vec![
                part(Category::Vector, vector),
                part(Category::StolenData, data),
            ],
        };
        parts.join(" ")
    }
}

/// A clue that contributed nothing because some required entity could not
/// be found in its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkippedClue {
    pub index: usize,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ClueKind,
    pub missing: Vec<Category>,
}

/// Index of the first catalog label (in catalog order) contained in `text`.
pub fn resolve_in(catalog: &Catalog, text: &str) -> Option<usize> {
    catalog.iter().position(|label| text.contains(label))
}

/// Resolve every category the clue's archetype requires. `index` is the
/// clue's position in the puzzle and is only used for reporting.
pub fn resolve_clue(puzzle: &Puzzle, index: usize, clue: &Clue) -> Result<ResolvedClue, SkippedClue> {
    let required = clue.kind.required_categories();
    let mut found = [None; 4];
    let mut missing = Vec::new();

    for &category in required {
        match resolve_in(puzzle.catalog(category), &clue.text) {
            Some(i) => found[slot(category)] = Some(i),
            None => missing.push(category),
        }
    }

    let lookup = |category: Category| found[slot(category)];
    let resolved = match clue.kind {
        ClueKind::Negation => lookup(Category::Actor)
            .zip(lookup(Category::Vector))
            .map(|(actor, vector)| ResolvedClue::Negation { actor, vector }),
        ClueKind::Affirmative => lookup(Category::Vector)
            .zip(lookup(Category::Asset))
            .map(|(vector, asset)| ResolvedClue::Affirmative { vector, asset }),
        ClueKind::Relational => lookup(Category::Vector)
            .zip(lookup(Category::Asset))
            .map(|(vector, asset)| ResolvedClue::Relational { vector, asset }),
        ClueKind::Conditional => match (
            lookup(Category::Actor),
            lookup(Category::Vector),
            lookup(Category::Asset),
        ) {
            (Some(actor), Some(vector), Some(asset)) => Some(ResolvedClue::Conditional {
                actor,
                vector,
                asset,
            }),
            _ => None,
        },
        ClueKind::DataInference => lookup(Category::Vector)
            .zip(lookup(Category::StolenData))
            .map(|(vector, data)| ResolvedClue::DataInference { vector, data }),
    };

    resolved.ok_or_else(|| SkippedClue {
        index,
        text: clue.text.clone(),
        kind: clue.kind,
        missing,
    })
}

fn slot(category: Category) -> usize {
    match category {
        Category::Actor => 0,
        Category::Vector => 1,
        Category::Asset => 2,
        Category::StolenData => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::{PuzzleMeta, PuzzleSpec, Solution};

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn puzzle() -> Puzzle {
        Puzzle::from_spec(PuzzleSpec {
            meta: PuzzleMeta::default(),
            actors: labels(&["GhostShell", "ZeroShadow", "FluxSignal"]),
            vectors: labels(&["Phishing", "SQL Injection", "RDP Exploit"]),
            assets: labels(&["Email Server", "HR Portal", "Finance Database"]),
            stolen_data: labels(&["Payroll Records", "Source Code", "Customer PII"]),
            solution: Solution {
                actor: "FluxSignal".to_string(),
                vector: "Phishing".to_string(),
                asset: "Email Server".to_string(),
                stolen_data: "Payroll Records".to_string(),
            },
            clues: vec![],
        })
        .unwrap()
    }

    #[test]
    fn test_resolve_in_first_match_wins() {
        let catalog = Catalog::new(Category::Actor, labels(&["Ann", "Anna"])).unwrap();
        // "Ann" is a substring of "Anna" and comes first in the catalog
        assert_eq!(resolve_in(&catalog, "Anna did not use X."), Some(0));
        assert_eq!(resolve_in(&catalog, "Bob did not use X."), None);
    }

    #[test]
    fn test_resolve_templates() {
        let p = puzzle();
        let cases = [
            (
                Clue::negation("ZeroShadow", "RDP Exploit"),
                ResolvedClue::Negation { actor: 1, vector: 2 },
            ),
            (
                Clue::affirmative("Phishing", "HR Portal"),
                ResolvedClue::Affirmative { vector: 0, asset: 1 },
            ),
            (
                Clue::relational("SQL Injection", "Finance Database"),
                ResolvedClue::Relational { vector: 1, asset: 2 },
            ),
            (
                Clue::conditional("FluxSignal", "Phishing", "Email Server"),
                ResolvedClue::Conditional {
                    actor: 2,
                    vector: 0,
                    asset: 0,
                },
            ),
            (
                Clue::data_inference("Phishing", "Customer PII"),
                ResolvedClue::DataInference { vector: 0, data: 2 },
            ),
        ];

        for (i, (clue, expected)) in cases.iter().enumerate() {
            assert_eq!(
                resolve_clue(&p, i, clue).unwrap(),
                *expected,
                "clue {:?} resolved incorrectly",
                clue.text
            );
        }
    }

    #[test]
    fn test_missing_entities_are_reported() {
        let p = puzzle();
        let clue = Clue::new("Someone did not use Phishing.", ClueKind::Negation);
        let skipped = resolve_clue(&p, 4, &clue).unwrap_err();
        assert_eq!(skipped.index, 4);
        assert_eq!(skipped.missing, vec![Category::Actor]);

        let clue = Clue::new("Nothing useful here.", ClueKind::Conditional);
        let skipped = resolve_clue(&p, 0, &clue).unwrap_err();
        assert_eq!(
            skipped.missing,
            vec![Category::Actor, Category::Vector, Category::Asset]
        );
    }

    #[test]
    fn test_describe_lists_labels() {
        let p = puzzle();
        let resolved = ResolvedClue::Relational { vector: 1, asset: 2 };
        assert_eq!(
            resolved.describe(&p),
            "vector=SQL Injection asset=Finance Database"
        );
        assert_eq!(resolved.kind(), ClueKind::Relational);
    }

    #[test]
    fn test_skipped_clue_wire_shape() {
        let p = puzzle();
        let clue = Clue::new("Someone did not use Phishing.", ClueKind::Negation);
        let skipped = resolve_clue(&p, 1, &clue).unwrap_err();

        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["type"], "negation");
        assert_eq!(json["missing"][0], "actor");

        let back: SkippedClue = serde_json::from_value(json).unwrap();
        assert_eq!(back, skipped);
    }
}
