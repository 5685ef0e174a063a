//! Identifier occurrences collected while lexing.

use alloc::string::String;

use indexmap::IndexMap as IndexMapRaw;

use crate::token::Position;

/// `IndexMap` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexMap<K, V> = IndexMapRaw<K, V, hashbrown::DefaultHashBuilder>;

/// What is known about one identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SymbolEntry {
    /// Position of the first occurrence.
    pub first: Position,
    /// Number of times the identifier was seen, at least 1.
    pub occurrences: usize,
}

/// Mapping from identifier text to its first position and occurrence count.
///
/// Keys are compared exactly, so `users` and `Users` are distinct symbols.
/// Iteration follows first-sighting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SymbolTable {
    entries: IndexMap<String, SymbolEntry>,
}

impl SymbolTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sighting of `name` at `position`.
    ///
    /// The first sighting fixes the entry's position; later ones only bump
    /// the count.
    pub fn record(&mut self, name: &str, position: Position) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.occurrences += 1;
        } else {
            self.entries.insert(
                name.into(),
                SymbolEntry {
                    first: position,
                    occurrences: 1,
                },
            );
        }
    }

    /// Look up an identifier.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SymbolEntry> {
        self.entries.get(name)
    }

    /// Whether the identifier has been seen.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of distinct identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no identifier has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, entry)` pairs in first-sighting order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn test_first_sighting_is_kept() {
        let mut table = SymbolTable::new();
        table.record("users", Position::new(1, 15));
        table.record("users", Position::new(3, 8));
        table.record("users", Position::new(4, 1));

        let entry = table.get("users").unwrap();
        assert_eq!(entry.first, Position::new(1, 15));
        assert_eq!(entry.occurrences, 3);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut table = SymbolTable::new();
        table.record("name", Position::new(1, 1));
        table.record("Name", Position::new(1, 6));
        assert_eq!(table.len(), 2);
        assert!(table.contains("Name"));
        assert!(!table.contains("NAME"));
    }

    #[test]
    fn test_iteration_follows_first_sighting() {
        let mut table = SymbolTable::new();
        table.record("b", Position::new(1, 1));
        table.record("a", Position::new(1, 3));
        table.record("b", Position::new(1, 5));
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "a"]);
    }
}
