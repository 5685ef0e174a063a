//! Query-shaped fuzzer for the syntax analyzer.
//!
//! Builds sources from keywords, identifiers, literals and operators so the
//! parser sees mostly well-formed token streams, then checks the same
//! invariants as the raw-text fuzzer and that analysis is deterministic.

use honggfuzz::fuzz;
use minisql_analyzer::analyze;
use minisql_analyzer::testing::{FuzzSource, check_analysis};

fn main() {
    loop {
        fuzz!(|input: FuzzSource| {
            let source = input.render();
            let analysis = check_analysis(&source);
            assert_eq!(analysis, analyze(&source));
        });
    }
}
