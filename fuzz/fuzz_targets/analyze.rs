//! Raw-text fuzzer for the full analysis pipeline.
//!
//! Feeds arbitrary strings through lexing and parsing and checks that
//! positions, the symbol table and the parse tree stay consistent.

use honggfuzz::fuzz;
use minisql_analyzer::testing::check_analysis;

fn main() {
    loop {
        fuzz!(|source: String| {
            check_analysis(&source);
        });
    }
}
