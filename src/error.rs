use crate::puzzle::Category;

/// Structural problems with a puzzle description. Raised before any
/// solving happens; these are never turned into a verdict.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("{category} catalog is empty")]
    EmptyCatalog { category: Category },
    #[error("{category} catalog contains an empty label at position {position}")]
    EmptyLabel { category: Category, position: usize },
    #[error("{category} catalog lists '{label}' more than once")]
    DuplicateLabel { category: Category, label: String },
    #[error("declared solution {category} '{label}' is not in the {category} catalog")]
    SolutionOutOfCatalog { category: Category, label: String },
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SolverError {
    #[error("SAT backend failed: {0}")]
    Backend(String),
    #[error("SAT solver was interrupted")]
    Interrupted,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown solver backend '{name}'{}", did_you_mean(.suggestion))]
    UnknownBackend {
        name: String,
        suggestion: Option<&'static str>,
    },
    #[error("invalid value '{value}' for {key}: expected a positive integer")]
    InvalidNumber { key: &'static str, value: String },
}

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Everything `Validator::validate_spec` can fail with.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ValidateError {
    #[error("invalid puzzle: {0}")]
    InvalidPuzzle(#[from] PuzzleError),
    #[error(transparent)]
    Solver(#[from] SolverError),
}
