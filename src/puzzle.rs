use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Actor,
    Vector,
    Asset,
    StolenData,
}

impl Category {
    pub const fn label(&self) -> &'static str {
        match self {
            Category::Actor => "actor",
            Category::Vector => "vector",
            Category::Asset => "asset",
            Category::StolenData => "stolen-data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered, duplicate-free list of labels for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    category: Category,
    labels: Vec<String>,
}

impl Catalog {
    pub fn new(category: Category, labels: Vec<String>) -> Result<Self, PuzzleError> {
        if labels.is_empty() {
            return Err(PuzzleError::EmptyCatalog { category });
        }

        let mut seen = HashSet::new();
        for (position, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(PuzzleError::EmptyLabel { category, position });
            }
            if !seen.insert(label.as_str()) {
                return Err(PuzzleError::DuplicateLabel {
                    category,
                    label: label.clone(),
                });
            }
        }

        Ok(Catalog { category, labels })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    // Callers only hold indices produced by this catalog.
    pub(crate) fn label(&self, index: usize) -> &str {
        &self.labels[index]
    }
}

/// The five clue archetypes a puzzle may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClueKind {
    Negation,
    Affirmative,
    Relational,
    Conditional,
    DataInference,
}

impl ClueKind {
    pub const fn all() -> &'static [ClueKind] {
        &[
            ClueKind::Negation,
            ClueKind::Affirmative,
            ClueKind::Relational,
            ClueKind::Conditional,
            ClueKind::DataInference,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ClueKind::Negation => "negation",
            ClueKind::Affirmative => "affirmative",
            ClueKind::Relational => "relational",
            ClueKind::Conditional => "conditional",
            ClueKind::DataInference => "data-inference",
        }
    }

    /// Categories the entity resolver must find in the clue text.
    pub const fn required_categories(&self) -> &'static [Category] {
        match self {
            ClueKind::Negation => &[Category::Actor, Category::Vector],
            ClueKind::Affirmative | ClueKind::Relational => &[Category::Vector, Category::Asset],
            ClueKind::Conditional => &[Category::Actor, Category::Vector, Category::Asset],
            ClueKind::DataInference => &[Category::Vector, Category::StolenData],
        }
    }

    pub fn from_name(s: &str) -> Option<ClueKind> {
        let normalized = s.to_lowercase().replace('_', "-");
        ClueKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == normalized)
    }
}

impl fmt::Display for ClueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: ClueKind,
}

// Sentence templates used by puzzle authors. The resolver reads them back
// by substring, so any catalog labels can be dropped in.
impl Clue {
    pub fn new(text: impl Into<String>, kind: ClueKind) -> Self {
        Clue {
            text: text.into(),
            kind,
        }
    }

    pub fn negation(actor: &str, vector: &str) -> Self {
        Clue::new(format!("{actor} did not use {vector}."), ClueKind::Negation)
    }

    pub fn affirmative(vector: &str, asset: &str) -> Self {
        Clue::new(
            format!("{vector} was used against the {asset}."),
            ClueKind::Affirmative,
        )
    }

    pub fn relational(vector: &str, asset: &str) -> Self {
        Clue::new(
            format!("The actor that used {vector} did not access the {asset}."),
            ClueKind::Relational,
        )
    }

    pub fn conditional(actor: &str, vector: &str, asset: &str) -> Self {
        Clue::new(
            format!("If {actor} used {vector}, then they accessed the {asset}."),
            ClueKind::Conditional,
        )
    }

    pub fn data_inference(vector: &str, data: &str) -> Self {
        Clue::new(
            format!("Only attacks using {vector} resulted in theft of {data}."),
            ClueKind::DataInference,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Solution {
    pub actor: String,
    pub vector: String,
    pub asset: String,
    pub stolen_data: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Impossible,
}

/// Authoring metadata carried through untouched; it never affects a verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
}

/// Puzzle description as produced by the authoring tools (the JSON shape
/// of a puzzle file). Unchecked until turned into a [`Puzzle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    #[serde(flatten)]
    pub meta: PuzzleMeta,
    pub actors: Vec<String>,
    pub vectors: Vec<String>,
    pub assets: Vec<String>,
    pub stolen_data: Vec<String>,
    pub solution: Solution,
    pub clues: Vec<Clue>,
}

/// A structurally checked puzzle: catalogs are valid and the declared
/// solution only names catalog items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    pub meta: PuzzleMeta,
    pub actors: Catalog,
    pub vectors: Catalog,
    pub assets: Catalog,
    pub stolen_data: Catalog,
    pub solution: Solution,
    pub clues: Vec<Clue>,
}

impl Puzzle {
    pub fn from_spec(spec: PuzzleSpec) -> Result<Self, PuzzleError> {
        let actors = Catalog::new(Category::Actor, spec.actors)?;
        let vectors = Catalog::new(Category::Vector, spec.vectors)?;
        let assets = Catalog::new(Category::Asset, spec.assets)?;
        let stolen_data = Catalog::new(Category::StolenData, spec.stolen_data)?;

        let declared = [
            (&actors, &spec.solution.actor),
            (&vectors, &spec.solution.vector),
            (&assets, &spec.solution.asset),
            (&stolen_data, &spec.solution.stolen_data),
        ];
        for (catalog, label) in declared {
            if catalog.position(label).is_none() {
                return Err(PuzzleError::SolutionOutOfCatalog {
                    category: catalog.category(),
                    label: label.clone(),
                });
            }
        }

        Ok(Puzzle {
            meta: spec.meta,
            actors,
            vectors,
            assets,
            stolen_data,
            solution: spec.solution,
            clues: spec.clues,
        })
    }

    pub fn catalog(&self, category: Category) -> &Catalog {
        match category {
            Category::Actor => &self.actors,
            Category::Vector => &self.vectors,
            Category::Asset => &self.assets,
            Category::StolenData => &self.stolen_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn spec() -> PuzzleSpec {
        PuzzleSpec {
            meta: PuzzleMeta::default(),
            actors: labels(&["A", "B", "C"]),
            vectors: labels(&["X", "Y", "Z"]),
            assets: labels(&["S1", "S2", "S3"]),
            stolen_data: labels(&["D1", "D2", "D3"]),
            solution: Solution {
                actor: "A".to_string(),
                vector: "X".to_string(),
                asset: "S2".to_string(),
                stolen_data: "D1".to_string(),
            },
            clues: vec![],
        }
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let err = Catalog::new(Category::Actor, labels(&["A", "B", "A"])).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::DuplicateLabel {
                category: Category::Actor,
                label: "A".to_string()
            }
        );
    }

    #[test]
    fn test_catalog_duplicates_are_case_sensitive() {
        let catalog = Catalog::new(Category::Actor, labels(&["ghost", "Ghost"])).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.position("Ghost"), Some(1));
    }

    #[test]
    fn test_catalog_rejects_empty_and_blank() {
        assert_eq!(
            Catalog::new(Category::Vector, vec![]).unwrap_err(),
            PuzzleError::EmptyCatalog {
                category: Category::Vector
            }
        );
        assert_eq!(
            Catalog::new(Category::Asset, labels(&["S1", "  "])).unwrap_err(),
            PuzzleError::EmptyLabel {
                category: Category::Asset,
                position: 1
            }
        );
    }

    #[test]
    fn test_from_spec_rejects_solution_outside_catalog() {
        let mut spec = spec();
        spec.solution.asset = "S9".to_string();
        assert_eq!(
            Puzzle::from_spec(spec).unwrap_err(),
            PuzzleError::SolutionOutOfCatalog {
                category: Category::Asset,
                label: "S9".to_string()
            }
        );
    }

    #[test]
    fn test_from_spec_rejects_empty_stolen_data() {
        let mut spec = spec();
        spec.stolen_data.clear();
        assert!(matches!(
            Puzzle::from_spec(spec),
            Err(PuzzleError::EmptyCatalog {
                category: Category::StolenData
            })
        ));
    }

    #[test]
    fn test_clue_templates() {
        assert_eq!(
            Clue::negation("GhostShell", "SQL Injection").text,
            "GhostShell did not use SQL Injection."
        );
        assert_eq!(
            Clue::conditional("ZeroShadow", "RDP Exploit", "Finance Database").text,
            "If ZeroShadow used RDP Exploit, then they accessed the Finance Database."
        );
        assert_eq!(
            Clue::data_inference("Phishing", "Payroll Records").kind,
            ClueKind::DataInference
        );
    }

    #[test]
    fn test_clue_kind_wire_names() {
        let clue: Clue =
            serde_json::from_str(r#"{"text": "x", "type": "data-inference"}"#).unwrap();
        assert_eq!(clue.kind, ClueKind::DataInference);
        assert_eq!(ClueKind::from_name("Data_Inference"), Some(ClueKind::DataInference));
        assert_eq!(ClueKind::from_name("sarcasm"), None);
    }

    #[test]
    fn test_spec_parses_puzzle_file_with_metadata() {
        let json = r#"{
            "title": "Web 7 - FluxSignal breach",
            "difficulty": "impossible",
            "author": "spydir",
            "actors": ["FluxSignal", "GhostShell", "ZeroShadow"],
            "vectors": ["Phishing", "SQL Injection", "RDP Exploit"],
            "assets": ["Email Server", "HR Portal", "Finance Database"],
            "stolen_data": ["Payroll Records", "Source Code", "Customer PII"],
            "solution": {"actor": "FluxSignal", "vector": "Phishing",
                         "asset": "Email Server", "stolen_data": "Payroll Records"},
            "clues": [{"text": "GhostShell did not use Phishing.", "type": "negation"}]
        }"#;
        let spec: PuzzleSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.meta.difficulty, Some(Difficulty::Impossible));
        assert_eq!(spec.meta.id, None);

        let puzzle = Puzzle::from_spec(spec).unwrap();
        assert_eq!(puzzle.catalog(Category::Vector).position("RDP Exploit"), Some(2));
        assert_eq!(puzzle.clues[0].kind, ClueKind::Negation);
    }
}
