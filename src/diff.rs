//! Structural diffing of clause trees.
//!
//! [`diff_trees`] walks two trees side by side and produces one [`DiffLine`]
//! per emitted configuration line. [`render`] turns those into marked text,
//! and [`concise`] reduces marked text to the changed lines plus the context
//! needed to locate them.

mod concise;
mod engine;

pub use concise::concise;
pub use engine::diff_trees;

use std::fmt;

/// One-character annotation in front of every diff line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Present only in the old configuration (`-`)
    Removed,
    /// Present only in the new configuration (`+`)
    Added,
    /// Present in both (` `)
    Unchanged,
}

impl Marker {
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Marker::Removed => '-',
            Marker::Added => '+',
            Marker::Unchanged => ' ',
        }
    }

    /// Marker for a leading character, `None` if it is not one of `-`, `+`, ` `
    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '-' => Some(Marker::Removed),
            '+' => Some(Marker::Added),
            ' ' => Some(Marker::Unchanged),
            _ => None,
        }
    }

    /// Whether lines with this marker are additions or removals
    #[must_use]
    pub fn is_change(self) -> bool {
        !matches!(self, Marker::Unchanged)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// A single configuration line in a diff, borrowed from its clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLine<'a> {
    pub marker: Marker,
    /// Raw line text including its indentation
    pub text: &'a str,
}

impl<'a> DiffLine<'a> {
    #[must_use]
    pub fn new(marker: Marker, text: &'a str) -> Self {
        Self { marker, text }
    }
}

impl fmt::Display for DiffLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker, self.text)
    }
}

/// Render diff lines as marked text, one newline-terminated line each
#[must_use]
pub fn render(lines: &[DiffLine<'_>]) -> String {
    let mut output = String::new();
    for line in lines {
        output.push(line.marker.as_char());
        output.push_str(line.text);
        output.push('\n');
    }
    output
}

/// Line counts per marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

impl DiffStats {
    #[must_use]
    pub fn from_lines(lines: &[DiffLine<'_>]) -> Self {
        lines.iter().fold(Self::default(), |mut stats, line| {
            match line.marker {
                Marker::Added => stats.added += 1,
                Marker::Removed => stats.removed += 1,
                Marker::Unchanged => stats.unchanged += 1,
            }
            stats
        })
    }

    /// True when the two configurations differ
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

impl fmt::Display for DiffStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} removed, {} unchanged",
            self.added, self.removed, self.unchanged
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn marker_chars_round_trip() {
        for marker in [Marker::Removed, Marker::Added, Marker::Unchanged] {
            assert_eq!(Marker::from_char(marker.as_char()), Some(marker));
        }
        assert_eq!(Marker::from_char('x'), None);
    }

    #[test]
    fn only_additions_and_removals_are_changes() {
        assert!(Marker::Added.is_change());
        assert!(Marker::Removed.is_change());
        assert!(!Marker::Unchanged.is_change());
    }

    #[test]
    fn render_terminates_every_line() {
        let lines = [
            DiffLine::new(Marker::Unchanged, "interface Gi0"),
            DiffLine::new(Marker::Removed, " shutdown"),
            DiffLine::new(Marker::Added, " no shutdown"),
        ];
        assert_eq!(render(&lines), " interface Gi0\n- shutdown\n+ no shutdown\n");
        assert_eq!(render(&[]), "");
    }

    #[test]
    fn diff_line_display() {
        assert_eq!(DiffLine::new(Marker::Added, " mtu 9000").to_string(), "+ mtu 9000");
    }

    #[test]
    fn stats_count_markers() {
        let lines = [
            DiffLine::new(Marker::Unchanged, "a"),
            DiffLine::new(Marker::Removed, " b"),
            DiffLine::new(Marker::Added, " c"),
            DiffLine::new(Marker::Added, " d"),
        ];
        let stats = DiffStats::from_lines(&lines);
        assert_eq!(
            stats,
            DiffStats {
                added: 2,
                removed: 1,
                unchanged: 1
            }
        );
        assert!(stats.has_changes());
        assert_eq!(stats.to_string(), "2 added, 1 removed, 1 unchanged");
        assert!(!DiffStats::from_lines(&lines[..1]).has_changes());
    }
}
