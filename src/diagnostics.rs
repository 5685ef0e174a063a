//! Append-only collection of the errors a phase reports.
//!
//! The lexer and the parser each own a separate [`Diagnostics`] instance, so
//! lexical and syntax errors always arrive through two distinct channels.

use alloc::vec::Vec;
use core::ops::Index;

use crate::token::Position;

/// An error that knows where in the source it was detected.
pub trait Located {
    /// Line and column the error refers to.
    fn position(&self) -> Position;

    /// Line the error refers to.
    fn line(&self) -> u32 {
        self.position().line
    }

    /// Column the error refers to.
    fn column(&self) -> u32 {
        self.position().column
    }
}

/// Ordered list of reported errors.
///
/// Entries keep detection order and are never reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics<E> {
    entries: Vec<E>,
}

impl<E> Default for Diagnostics<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> Diagnostics<E> {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error.
    pub fn report(&mut self, error: E) {
        self.entries.push(error);
    }

    /// Number of errors recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate in detection order.
    pub fn iter(&self) -> core::slice::Iter<'_, E> {
        self.entries.iter()
    }

    /// The recorded errors as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.entries
    }

    /// Consume the collector, returning the errors in detection order.
    #[must_use]
    pub fn into_vec(self) -> Vec<E> {
        self.entries
    }
}

impl<E> Index<usize> for Diagnostics<E> {
    type Output = E;

    fn index(&self, index: usize) -> &E {
        &self.entries[index]
    }
}

impl<'a, E> IntoIterator for &'a Diagnostics<E> {
    type Item = &'a E;
    type IntoIter = core::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<E> IntoIterator for Diagnostics<E> {
    type Item = E;
    type IntoIter = alloc::vec::IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
