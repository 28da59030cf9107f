//! Source positions.

use std::cmp::Ordering;
use std::fmt;

/// A position in a source file. Any node may carry one in its `pos` slot.
///
/// Positions compare lexicographically by line then column. Positions from
/// different files (or one with a filename and one without) are incomparable,
/// so `Pos` implements [`PartialOrd`] but not `Ord`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pos {
    pub filename: Option<String>,
    pub line: u32,
    pub col: u32,
}

impl Pos {
    pub fn new(filename: Option<&str>, line: u32, col: u32) -> Self {
        Pos {
            filename: filename.map(str::to_owned),
            line,
            col,
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filename {
            Some(name) => write!(f, "{}:{}:{}", name, self.line, self.col),
            None => write!(f, "{}:{}", self.line, self.col),
        }
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.filename != other.filename {
            return None;
        }
        Some(self.line.cmp(&other.line).then(self.col.cmp(&other.col)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_within_one_file() {
        let a = Pos::new(Some("x.c"), 1, 5);
        let b = Pos::new(Some("x.c"), 1, 9);
        let c = Pos::new(Some("x.c"), 2, 0);
        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
        assert_eq!(a.partial_cmp(&a), Some(Ordering::Equal));
    }

    #[test]
    fn test_incomparable_across_files() {
        let a = Pos::new(Some("x.c"), 1, 5);
        let b = Pos::new(Some("y.c"), 1, 5);
        let c = Pos::new(None, 1, 5);
        assert_eq!(a.partial_cmp(&b), None);
        assert_eq!(a.partial_cmp(&c), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Pos::new(Some("x.c"), 3, 7).to_string(), "x.c:3:7");
        assert_eq!(Pos::new(None, 3, 7).to_string(), "3:7");
    }
}
