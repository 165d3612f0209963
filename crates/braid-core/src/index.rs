//! Row addressing.
//!
//! An `IndexPath` names a row by its displayed section index and its row
//! within that section. Index paths are positional: they are only meaningful
//! against one generation of displayed data and should not be stored across
//! updates.

use std::fmt;

/// The position of a row in a sectioned table.
///
/// Ordering is by section, then row, which is the order a table lays rows
/// out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct IndexPath {
    section: usize,
    row: usize,
}

impl IndexPath {
    /// Creates an index path.
    #[inline]
    pub const fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }

    /// The displayed section index.
    #[inline]
    pub const fn section(&self) -> usize {
        self.section
    }

    /// The row within the section.
    #[inline]
    pub const fn row(&self) -> usize {
        self.row
    }

    /// Returns a path to another row in the same section.
    #[inline]
    pub const fn with_row(&self, row: usize) -> Self {
        Self::new(self.section, row)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, row): (usize, usize)) -> Self {
        Self::new(section, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_section_major() {
        let mut paths = vec![
            IndexPath::new(1, 0),
            IndexPath::new(0, 5),
            IndexPath::new(0, 1),
        ];
        paths.sort();
        assert_eq!(
            paths,
            vec![IndexPath::new(0, 1), IndexPath::new(0, 5), IndexPath::new(1, 0)]
        );
    }

    #[test]
    fn test_display_and_conversion() {
        let path: IndexPath = (2, 3).into();
        assert_eq!(path.to_string(), "[2, 3]");
        assert_eq!(path.with_row(0), IndexPath::new(2, 0));
    }
}
