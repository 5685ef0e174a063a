//! Seeded randomized checks of the analysis invariants.
//!
//! Two generators drive the shared checkers from the `testing` module: raw
//! text over an alphabet biased toward the language's own characters, and
//! structured [`FuzzSource`] values decoded from random bytes with
//! [`arbitrary::Unstructured`], the same input type the `structured` fuzz
//! harness uses.

#![cfg(feature = "testing")]

use arbitrary::{Arbitrary, Unstructured};
use minisql_analyzer::testing::{FuzzSource, check_analysis};
use minisql_analyzer::{NodeKind, analyze};
use rand::RngExt;
use rand::SeedableRng;
use rand::rngs::StdRng;

const ITERATIONS: usize = 500;

const ALPHABET: &[char] = &[
    'S', 'E', 'L', 'C', 'T', 'F', 'R', 'O', 'M', 'W', 'H', 'N', 'D', 'a', 'b', 'x', '_', '0',
    '1', '9', '.', ' ', ' ', ' ', '\n', '\t', '\'', '-', '#', '+', '*', '/', '%', '=', '<', '>',
    '!', '(', ')', ',', ';', '@', 'é', '字',
];

const WORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "CREATE",
    "TABLE", "INT", "FLOAT", "TEXT", "AND", "OR", "NOT", "users", "id", "name", "*", "=", "<>",
    ">=", "+", "(", ")", ",", ";", "1", "2.5", "'s'", "-- c\n", "## c ##",
];

fn random_text(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..80);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

fn random_words(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..30);
    let words: Vec<&str> = (0..len)
        .map(|_| WORDS[rng.random_range(0..WORDS.len())])
        .collect();
    words.join(" ")
}

#[test]
fn test_random_text_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5e1ec7);
    for _ in 0..ITERATIONS {
        let source = random_text(&mut rng);
        check_analysis(&source);
    }
}

#[test]
fn test_random_word_sequences_invariants() {
    let mut rng = StdRng::seed_from_u64(0xf00d);
    for _ in 0..ITERATIONS {
        let source = random_words(&mut rng);
        let analysis = check_analysis(&source);
        assert_eq!(analysis, analyze(&source), "{source:?}");
    }
}

#[test]
fn test_structured_sources() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..ITERATIONS {
        let len = rng.random_range(0..256);
        let bytes: Vec<u8> = (0..len).map(|_| rng.random_range(0..=u8::MAX)).collect();
        let Ok(input) = FuzzSource::arbitrary(&mut Unstructured::new(&bytes)) else {
            continue;
        };
        check_analysis(&input.render());
    }
}

/// Appending a well-formed statement after `;` always yields that statement
/// as the last child, whatever garbage came before.
#[test]
fn test_recovery_reaches_trailing_statement() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ITERATIONS {
        let source = format!("{} ; DELETE FROM tail", random_words(&mut rng));
        let analysis = analyze(&source);
        let last = analysis.parsed.tree.children().last();
        assert!(
            last.is_some_and(|node| node.kind() == NodeKind::DeleteStmt
                && node.children()[0].value() == Some("tail")),
            "{source:?}"
        );
    }
}
