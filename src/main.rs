// SpydirWebz puzzle validator CLI
//
// Thin caller around the validation engine: reads puzzle files, prints
// verdicts. Exit codes: 0 valid, 1 any other verdict, 2 malformed input or
// configuration.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use spydirwebz_core::resolve::resolve_clue;
use spydirwebz_core::{
    BackendKind, Clue, ClueKind, Outcome, Puzzle, PuzzleSpec, Validator, ValidatorConfig, Verdict,
};
use tracing_subscriber::EnvFilter;

/// SpydirWebz breach-puzzle validator
#[derive(Parser, Debug)]
#[command(name = "spydirwebz-core")]
#[command(about = "SAT-based validator for SpydirWebz breach-deduction puzzles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that a puzzle's clues force exactly its declared solution
    Validate {
        /// Puzzle JSON file
        file: PathBuf,

        /// Solver backend: sat or exhaustive (overrides SPYDIR_BACKEND)
        #[arg(short, long)]
        backend: Option<String>,

        /// How many solutions to list for ambiguous puzzles
        #[arg(short, long)]
        cap: Option<usize>,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which catalog items every clue resolves to
    Explain {
        /// Puzzle JSON file
        file: PathBuf,
    },

    /// Print the canonical sentence for a clue
    RenderClue {
        /// negation, affirmative, relational, conditional or data-inference
        kind: String,

        #[arg(long)]
        actor: Option<String>,

        #[arg(long)]
        vector: Option<String>,

        #[arg(long)]
        asset: Option<String>,

        #[arg(long)]
        data: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Some(Command::Validate {
            file,
            backend,
            cap,
            json,
        }) => validate_cmd(&file, backend.as_deref(), cap, json),
        Some(Command::Explain { file }) => explain_cmd(&file),
        Some(Command::RenderClue {
            kind,
            actor,
            vector,
            asset,
            data,
        }) => render_clue_cmd(
            &kind,
            actor.as_deref(),
            vector.as_deref(),
            asset.as_deref(),
            data.as_deref(),
        ),
        None => {
            println!("=== SpydirWebz Puzzle Validator ===\n");
            println!("Available commands:");
            println!("  validate <puzzle.json> [--backend sat|exhaustive] [--cap N] [--json]");
            println!("  explain <puzzle.json>");
            println!("  render-clue <kind> [--actor A] [--vector V] [--asset S] [--data D]");
            0
        }
    };

    std::process::exit(code);
}

fn load_spec(path: &Path) -> Result<PuzzleSpec, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

fn validate_cmd(path: &Path, backend: Option<&str>, cap: Option<usize>, json: bool) -> i32 {
    let mut config = match ValidatorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    if let Some(name) = backend {
        match name.parse::<BackendKind>() {
            Ok(kind) => config.backend = kind,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 2;
            }
        }
    }
    if let Some(cap) = cap {
        config.solution_cap = cap;
    }

    let spec = match load_spec(path) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    let verdict = match Validator::new(config).validate_spec(spec) {
        Ok(verdict) => verdict,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    if json {
        match serde_json::to_string_pretty(&verdict) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: cannot serialize verdict: {}", e);
                return 2;
            }
        }
    } else {
        print_verdict(&verdict);
    }

    if verdict.is_valid() {
        0
    } else {
        1
    }
}

fn print_verdict(verdict: &Verdict) {
    println!("=== RESULT ===");
    if verdict.is_valid() {
        println!("✓ VALID: {}", verdict.explanation);
    } else {
        println!("✗ {}: {}", verdict.status().name().to_uppercase(), verdict.explanation);
    }

    match &verdict.outcome {
        Outcome::Ambiguous {
            solutions,
            more_solutions,
        } => {
            println!("\n  Possible scenarios:");
            for triple in solutions {
                println!("    - {}", triple);
            }
            if *more_solutions {
                println!("    - ...");
            }
        }
        Outcome::Mismatch { found, expected } => {
            println!("\n  Derived:  {}", found);
            println!("  Declared: {}", expected);
        }
        Outcome::Valid { summary, .. } => {
            println!(
                "\n  Triple space: {}, clues applied: {}/{}",
                summary.triple_space, summary.clues_applied, summary.clues_total
            );
        }
        Outcome::InvalidUnsatisfiable
        | Outcome::InvalidNoSolution
        | Outcome::DataNotInferable { .. } => {}
    }

    if !verdict.suggestions.is_empty() {
        println!("\n  Suggestions:");
        for suggestion in &verdict.suggestions {
            println!("    • {}", suggestion);
        }
    }

    let diagnostics = &verdict.diagnostics;
    if !diagnostics.skipped_clues.is_empty() {
        println!("\n  Skipped clues:");
        for skipped in &diagnostics.skipped_clues {
            let missing: Vec<&str> = skipped.missing.iter().map(|c| c.label()).collect();
            println!(
                "    #{} ({}) \"{}\" - no {} found",
                skipped.index + 1,
                skipped.kind,
                skipped.text,
                missing.join("/")
            );
        }
    }
    for warning in &diagnostics.warnings {
        println!("  warning: {}", warning);
    }
}

fn explain_cmd(path: &Path) -> i32 {
    let puzzle = match load_spec(path).and_then(|spec| Puzzle::from_spec(spec).map_err(|e| e.to_string())) {
        Ok(puzzle) => puzzle,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };

    if let Some(title) = &puzzle.meta.title {
        println!("{}", title);
    }
    println!(
        "  {} actors x {} vectors x {} assets = {} triples",
        puzzle.actors.len(),
        puzzle.vectors.len(),
        puzzle.assets.len(),
        puzzle.actors.len() * puzzle.vectors.len() * puzzle.assets.len()
    );

    println!("\n  Clues:");
    let mut skipped = 0;
    for (index, clue) in puzzle.clues.iter().enumerate() {
        match resolve_clue(&puzzle, index, clue) {
            Ok(resolved) => {
                println!("    #{} [{}] {}", index + 1, clue.kind, clue.text);
                println!("        -> {}", resolved.describe(&puzzle));
            }
            Err(e) => {
                skipped += 1;
                let missing: Vec<&str> = e.missing.iter().map(|c| c.label()).collect();
                println!("    #{} [{}] {}", index + 1, clue.kind, clue.text);
                println!("        -> SKIPPED: no {} found", missing.join("/"));
            }
        }
    }

    if skipped > 0 {
        println!("\n  {} of {} clues contribute no constraint", skipped, puzzle.clues.len());
        1
    } else {
        0
    }
}

fn render_clue_cmd(
    kind: &str,
    actor: Option<&str>,
    vector: Option<&str>,
    asset: Option<&str>,
    data: Option<&str>,
) -> i32 {
    let Some(kind) = ClueKind::from_name(kind) else {
        eprintln!("Error: Unknown clue type '{}'", kind);

        // Suggest similar clue type using Jaro-Winkler similarity
        let suggestion = ClueKind::all()
            .iter()
            .map(|k| (strsim::jaro_winkler(&kind.to_lowercase(), k.name()), k.name()))
            .max_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((similarity, name)) = suggestion {
            if similarity >= 0.6 {
                eprintln!("Did you mean '{}'?", name);
            }
        }
        return 2;
    };

    let need = |value: Option<&str>, flag: &str| -> Result<String, String> {
        value
            .map(str::to_string)
            .ok_or_else(|| format!("{} clues need --{}", kind, flag))
    };

    let clue: Result<Clue, String> = (|| {
        Ok(match kind {
            ClueKind::Negation => Clue::negation(&need(actor, "actor")?, &need(vector, "vector")?),
            ClueKind::Affirmative => {
                Clue::affirmative(&need(vector, "vector")?, &need(asset, "asset")?)
            }
            ClueKind::Relational => {
                Clue::relational(&need(vector, "vector")?, &need(asset, "asset")?)
            }
            ClueKind::Conditional => Clue::conditional(
                &need(actor, "actor")?,
                &need(vector, "vector")?,
                &need(asset, "asset")?,
            ),
            ClueKind::DataInference => {
                Clue::data_inference(&need(vector, "vector")?, &need(data, "data")?)
            }
        })
    })();

    match clue {
        Ok(clue) => match serde_json::to_string(&clue) {
            Ok(json) => {
                println!("{}", json);
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                2
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    }
}
