use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::solver::{ExhaustiveBackend, SatBackend, TripleSolver};

pub const BACKEND_ENV: &str = "SPYDIR_BACKEND";
pub const SOLUTION_CAP_ENV: &str = "SPYDIR_SOLUTION_CAP";

/// The classifier has to tell one solution from several.
pub const MIN_SOLUTION_CAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    Sat,
    Exhaustive,
}

impl BackendKind {
    const NAMES: [(&'static str, BackendKind); 2] = [
        ("sat", BackendKind::Sat),
        ("exhaustive", BackendKind::Exhaustive),
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::Sat => "sat",
            BackendKind::Exhaustive => "exhaustive",
        }
    }

    pub fn solver(&self) -> Box<dyn TripleSolver + Send + Sync> {
        match self {
            BackendKind::Sat => Box::new(SatBackend),
            BackendKind::Exhaustive => Box::new(ExhaustiveBackend),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if let Some((_, kind)) = Self::NAMES.iter().find(|(name, _)| *name == wanted) {
            return Ok(*kind);
        }

        // Suggest similar backend using Jaro-Winkler similarity
        let mut max_similarity = 0.0;
        let mut suggestion = None;
        for (name, _) in Self::NAMES {
            let similarity = strsim::jaro_winkler(&wanted, name);
            if similarity > max_similarity {
                max_similarity = similarity;
                suggestion = Some(name);
            }
        }

        Err(ConfigError::UnknownBackend {
            name: s.to_string(),
            // At least 60% catches prefixes like "exh" -> "exhaustive"
            suggestion: suggestion.filter(|_| max_similarity >= 0.6),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    pub backend: BackendKind,
    /// How many satisfying triples to report for ambiguous puzzles.
    pub solution_cap: usize,
    /// Catalog sizes outside this range produce a warning, not an error.
    pub expected_catalog_size: RangeInclusive<usize>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            backend: BackendKind::Sat,
            solution_cap: MIN_SOLUTION_CAP,
            expected_catalog_size: 3..=6,
        }
    }
}

impl ValidatorConfig {
    /// Defaults overridden by `SPYDIR_BACKEND` and `SPYDIR_SOLUTION_CAP`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = ValidatorConfig::default();

        if let Some(name) = lookup(BACKEND_ENV) {
            config.backend = name.parse()?;
        }
        if let Some(value) = lookup(SOLUTION_CAP_ENV) {
            let cap = value
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|cap| *cap > 0)
                .ok_or(ConfigError::InvalidNumber {
                    key: SOLUTION_CAP_ENV,
                    value: value.clone(),
                })?;
            config.solution_cap = cap;
        }

        Ok(config)
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_solution_cap(mut self, cap: usize) -> Self {
        self.solution_cap = cap;
        self
    }

    pub fn effective_cap(&self) -> usize {
        self.solution_cap.max(MIN_SOLUTION_CAP)
    }
}
