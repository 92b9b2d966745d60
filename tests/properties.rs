// Randomized checks of the validator against a direct reading of the clue
// semantics over the 3x3x3 triple space.

use proptest::prelude::*;
use spydirwebz_core::{
    BackendKind, Clue, Outcome, PuzzleMeta, PuzzleSpec, Solution, Status, Triple, Validator,
    ValidatorConfig,
};

const ACTORS: [&str; 3] = ["A", "B", "C"];
const VECTORS: [&str; 3] = ["X", "Y", "Z"];
const ASSETS: [&str; 3] = ["S1", "S2", "S3"];
const DATA: [&str; 3] = ["D1", "D2", "D3"];

#[derive(Debug, Clone, Copy)]
enum Fact {
    Negation(usize, usize),
    Affirmative(usize, usize),
    Relational(usize, usize),
    Conditional(usize, usize, usize),
    DataInference(usize, usize),
}

impl Fact {
    fn clue(&self) -> Clue {
        match *self {
            Fact::Negation(a, v) => Clue::negation(ACTORS[a], VECTORS[v]),
            Fact::Affirmative(v, s) => Clue::affirmative(VECTORS[v], ASSETS[s]),
            Fact::Relational(v, s) => Clue::relational(VECTORS[v], ASSETS[s]),
            Fact::Conditional(a, v, s) => Clue::conditional(ACTORS[a], VECTORS[v], ASSETS[s]),
            Fact::DataInference(v, d) => Clue::data_inference(VECTORS[v], DATA[d]),
        }
    }

    fn allows(&self, (a, v, s): (usize, usize, usize)) -> bool {
        match *self {
            Fact::Negation(na, nv) => !(a == na && v == nv),
            Fact::Affirmative(av, as_) => v == av && s == as_,
            Fact::Relational(rv, rs) => !(v == rv && s == rs),
            Fact::Conditional(ca, cv, cs) => !(a == ca && v == cv) || s == cs,
            Fact::DataInference(..) => true,
        }
    }
}

fn fact() -> impl Strategy<Value = Fact> {
    (0..5usize, 0..3usize, 0..3usize, 0..3usize).prop_map(|(kind, x, y, z)| match kind {
        0 => Fact::Negation(x, y),
        1 => Fact::Affirmative(y, z),
        2 => Fact::Relational(y, z),
        3 => Fact::Conditional(x, y, z),
        _ => Fact::DataInference(y, z),
    })
}

fn puzzle() -> impl Strategy<Value = (Vec<Fact>, [usize; 4])> {
    (
        proptest::collection::vec(fact(), 0..10),
        [0..3usize, 0..3usize, 0..3usize, 0..3usize],
    )
}

// Clues that leave exactly `target` standing, plus random noise that keeps it.
fn unique_puzzle() -> impl Strategy<Value = ((usize, usize, usize), Vec<Fact>, [usize; 4])> {
    (
        (0..3usize, 0..3usize, 0..3usize),
        proptest::collection::vec(fact(), 0..6),
        [0..3usize, 0..3usize, 0..3usize, 0..3usize],
    )
        .prop_map(|(target, noise, declared)| {
            let (a, v, s) = target;
            let mut facts: Vec<Fact> = noise.into_iter().filter(|f| f.allows(target)).collect();
            facts.push(Fact::Affirmative(v, s));
            for other in (0..3).filter(|&o| o != a) {
                facts.push(Fact::Negation(other, v));
            }
            (target, facts, declared)
        })
}

fn spec(facts: &[Fact], declared: [usize; 4]) -> PuzzleSpec {
    let labels = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    PuzzleSpec {
        meta: PuzzleMeta::default(),
        actors: labels(&ACTORS),
        vectors: labels(&VECTORS),
        assets: labels(&ASSETS),
        stolen_data: labels(&DATA),
        solution: Solution {
            actor: ACTORS[declared[0]].to_string(),
            vector: VECTORS[declared[1]].to_string(),
            asset: ASSETS[declared[2]].to_string(),
            stolen_data: DATA[declared[3]].to_string(),
        },
        clues: facts.iter().map(Fact::clue).collect(),
    }
}

fn survivors(facts: &[Fact]) -> Vec<(usize, usize, usize)> {
    let mut out = Vec::new();
    for a in 0..3 {
        for v in 0..3 {
            for s in 0..3 {
                if facts.iter().all(|f| f.allows((a, v, s))) {
                    out.push((a, v, s));
                }
            }
        }
    }
    out
}

fn reported(outcome: &Outcome, declared: &Solution) -> Vec<Triple> {
    match outcome {
        Outcome::Ambiguous { solutions, .. } => solutions.clone(),
        Outcome::Mismatch { found, .. } => vec![found.clone()],
        // Both only fire when the unique triple equals the declared one
        Outcome::Valid { .. } | Outcome::DataNotInferable { .. } => vec![Triple {
            actor: declared.actor.clone(),
            vector: declared.vector.clone(),
            asset: declared.asset.clone(),
        }],
        Outcome::InvalidUnsatisfiable | Outcome::InvalidNoSolution => vec![],
    }
}

fn validator(backend: BackendKind) -> Validator {
    Validator::new(ValidatorConfig::default().with_backend(backend))
}

proptest! {
    #[test]
    fn property_status_aligns_with_survivor_count((facts, declared) in puzzle()) {
        let expected = survivors(&facts);
        let verdict = validator(BackendKind::Sat).validate_spec(spec(&facts, declared)).unwrap();

        match expected.len() {
            0 => prop_assert_eq!(verdict.status(), Status::InvalidUnsatisfiable),
            1 => prop_assert!(matches!(
                verdict.status(),
                Status::Mismatch | Status::DataNotInferable | Status::Valid
            )),
            _ => prop_assert_eq!(verdict.status(), Status::Ambiguous),
        }
        prop_assert!(!verdict.explanation.is_empty());
        if !verdict.is_valid() {
            prop_assert!(!verdict.suggestions.is_empty());
        }
    }

    #[test]
    fn property_validation_is_idempotent((facts, declared) in puzzle()) {
        let v = validator(BackendKind::Sat);
        let first = v.validate_spec(spec(&facts, declared)).unwrap();
        let second = v.validate_spec(spec(&facts, declared)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn property_negation_and_conditional_are_respected((facts, declared) in puzzle()) {
        let spec = spec(&facts, declared);
        let verdict = validator(BackendKind::Sat).validate_spec(spec.clone()).unwrap();
        for triple in reported(&verdict.outcome, &spec.solution) {
            for f in &facts {
                match *f {
                    Fact::Negation(a, v) => prop_assert!(
                        !(triple.actor == ACTORS[a] && triple.vector == VECTORS[v]),
                        "{} violates negation of ({}, {})", triple, ACTORS[a], VECTORS[v]
                    ),
                    Fact::Conditional(a, v, s) => prop_assert!(
                        !(triple.actor == ACTORS[a] && triple.vector == VECTORS[v])
                            || triple.asset == ASSETS[s],
                        "{} violates conditional pin to {}", triple, ASSETS[s]
                    ),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn property_backends_agree((facts, declared) in puzzle()) {
        let sat = validator(BackendKind::Sat).validate_spec(spec(&facts, declared)).unwrap();
        let exhaustive = validator(BackendKind::Exhaustive)
            .validate_spec(spec(&facts, declared))
            .unwrap();

        prop_assert_eq!(sat.status(), exhaustive.status());
        if sat.status() != Status::Ambiguous {
            prop_assert_eq!(sat.outcome, exhaustive.outcome);
        }
    }

    #[test]
    fn property_unique_survivor_is_the_reported_triple((target, facts, declared) in unique_puzzle()) {
        prop_assert_eq!(survivors(&facts), vec![target]);

        let (a, v, s) = target;
        let verdict = validator(BackendKind::Exhaustive)
            .validate_spec(spec(&facts, declared))
            .unwrap();
        let matches_declared = [a, v, s] == [declared[0], declared[1], declared[2]];
        prop_assert_eq!(verdict.status() == Status::Mismatch, !matches_declared);
        if let Outcome::Mismatch { found, .. } = &verdict.outcome {
            prop_assert_eq!(found.actor.as_str(), ACTORS[a]);
            prop_assert_eq!(found.vector.as_str(), VECTORS[v]);
            prop_assert_eq!(found.asset.as_str(), ASSETS[s]);
        }
    }
}
