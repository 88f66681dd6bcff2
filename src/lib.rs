//! Order-insensitive structural diff for indented configuration files.
//!
//! Configuration text such as a network device's running config nests
//! statements by indentation. This crate parses such text into a tree of
//! [`Clause`]s and compares two trees by line text rather than by position:
//! moving a statement within its block is not a change, while editing,
//! adding or removing one is.
//!
//! # Examples
//!
//! ```
//! let old = "interface Gi0\n ip address 1.1.1.1\n";
//! let new = "interface Gi0\n ip address 2.2.2.2\n";
//!
//! assert_eq!(
//!     confdiff::diff(old, new).unwrap(),
//!     " interface Gi0\n- ip address 1.1.1.1\n+ ip address 2.2.2.2\n"
//! );
//! assert_eq!(
//!     confdiff::concise_diff(old, new).unwrap(),
//!     " interface Gi0\n- ip address 1.1.1.1\n+ ip address 2.2.2.2"
//! );
//! ```

pub mod clause;
pub mod diff;
pub mod parse;

#[cfg(test)]
mod testing;

pub use clause::Clause;
pub use diff::{DiffLine, DiffStats, Marker};
pub use parse::ParseError;

use std::str::FromStr;

/// A parsed configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    root: Clause,
}

impl Config {
    /// Parse configuration text
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidDedent`] if a line dedents below the
    /// outermost open block.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self {
            root: parse::parse_config(text)?,
        })
    }

    /// The synthetic root clause holding the top-level lines
    #[must_use]
    pub fn root(&self) -> &Clause {
        &self.root
    }

    /// Structured diff from `self` to `new`
    #[must_use]
    pub fn diff_lines<'a>(&'a self, new: &'a Config) -> Vec<DiffLine<'a>> {
        diff::diff_trees(&self.root, &new.root)
    }

    /// Marked diff text from `self` to `new`, see [`diff()`]
    #[must_use]
    pub fn diff(&self, new: &Config) -> String {
        diff::render(&self.diff_lines(new))
    }

    /// Changed lines and their enclosing context, see [`concise_diff()`]
    #[must_use]
    pub fn concise_diff(&self, new: &Config) -> String {
        diff::concise(&self.diff(new))
    }

    /// Line counts of the diff from `self` to `new`
    #[must_use]
    pub fn stats(&self, new: &Config) -> DiffStats {
        DiffStats::from_lines(&self.diff_lines(new))
    }
}

impl FromStr for Config {
    type Err = ParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

/// Diff two configuration texts.
///
/// Every line of the result carries a one-character marker: `-` for lines
/// only in `old`, `+` for lines only in `new` and a space for lines in both.
/// Each line is newline-terminated.
///
/// # Errors
///
/// Returns [`ParseError`] if either text dedents below an open block.
pub fn diff(old: &str, new: &str) -> Result<String, ParseError> {
    Ok(Config::parse(old)?.diff(&Config::parse(new)?))
}

/// Diff two configuration texts, keeping only changed lines and the
/// unchanged lines that enclose them.
///
/// # Errors
///
/// Returns [`ParseError`] if either text dedents below an open block.
pub fn concise_diff(old: &str, new: &str) -> Result<String, ParseError> {
    Ok(Config::parse(old)?.concise_diff(&Config::parse(new)?))
}
