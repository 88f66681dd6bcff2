//! The clause tree produced by parsing an indented configuration.
//!
//! A [`Clause`] is one configuration line together with the lines nested
//! beneath it. The synthetic root of every tree has no line and an indent of
//! [`ROOT_INDENT`], lower than any real line.

use std::fmt;

/// Indent of the synthetic root clause
pub const ROOT_INDENT: isize = -1;

/// A configuration line and its nested sub-clauses.
///
/// Clauses are built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    line: Option<String>,
    indent: isize,
    children: Vec<Clause>,
}

impl Clause {
    /// Create an empty root clause
    #[must_use]
    pub fn root() -> Self {
        Self {
            line: None,
            indent: ROOT_INDENT,
            children: Vec::new(),
        }
    }

    /// Create a leaf clause for `line` at the given indent
    pub(crate) fn new(line: String, indent: usize) -> Self {
        Self {
            line: Some(line),
            indent: indent as isize,
            children: Vec::new(),
        }
    }

    /// Raw line text including its leading whitespace, `None` for the root
    #[must_use]
    pub fn line(&self) -> Option<&str> {
        self.line.as_deref()
    }

    /// Count of leading whitespace characters, [`ROOT_INDENT`] for the root
    #[must_use]
    pub fn indent(&self) -> isize {
        self.indent
    }

    /// Nested clauses in source order
    #[must_use]
    pub fn children(&self) -> &[Clause] {
        &self.children
    }

    /// Whether this is the synthetic root of a tree
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.line.is_none()
    }

    /// Whether two clauses denote the same configuration line.
    ///
    /// Only the raw line text is compared. Children and indent play no part.
    #[must_use]
    pub fn same_line(&self, other: &Clause) -> bool {
        self.line == other.line
    }

    pub(crate) fn push_child(&mut self, child: Clause) {
        self.children.push(child);
    }

    pub(crate) fn pop_child(&mut self) -> Option<Clause> {
        self.children.pop()
    }

    pub(crate) fn last_child(&self) -> Option<&Clause> {
        self.children.last()
    }

    /// Render this clause as configuration text.
    ///
    /// Every emitted line is prefixed with `prefix` and terminated by a
    /// newline. The root contributes no line of its own. With `with_children`
    /// unset only the clause's own line is rendered.
    ///
    /// # Examples
    ///
    /// ```
    /// use confdiff::Config;
    ///
    /// let config = Config::parse("interface Gi0\n shutdown\n").unwrap();
    /// let interface = &config.root().children()[0];
    /// assert_eq!(interface.config_lines("-", true), "-interface Gi0\n- shutdown\n");
    /// assert_eq!(interface.config_lines(" ", false), " interface Gi0\n");
    /// ```
    #[must_use]
    pub fn config_lines(&self, prefix: &str, with_children: bool) -> String {
        let mut output = String::new();
        self.write_lines(prefix, with_children, &mut output);
        output
    }

    /// Append [`Clause::config_lines`] output to `output`
    fn write_lines(&self, prefix: &str, with_children: bool, output: &mut String) {
        if !with_children {
            if let Some(line) = &self.line {
                push_line(output, prefix, line);
            }
            return;
        }

        // Pre-order walk; children pushed in reverse so the first pops first
        let mut pending = vec![self];
        while let Some(clause) = pending.pop() {
            if let Some(line) = &clause.line {
                push_line(output, prefix, line);
            }
            pending.extend(clause.children.iter().rev());
        }
    }

    /// Visit every clause below this one in pre-order
    pub fn descendants(&self) -> impl Iterator<Item = &Clause> {
        let mut pending: Vec<&Clause> = self.children.iter().rev().collect();
        std::iter::from_fn(move || {
            let clause = pending.pop()?;
            pending.extend(clause.children.iter().rev());
            Some(clause)
        })
    }
}

fn push_line(output: &mut String, prefix: &str, line: &str) {
    output.push_str(prefix);
    output.push_str(line);
    output.push('\n');
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.config_lines("", true))
    }
}
