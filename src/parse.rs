//! Parsing indented configuration text into a [`Clause`] tree.
//!
//! Nesting is inferred purely from the count of leading whitespace
//! characters. The indent width does not need to be fixed: a dedented line
//! joins the innermost open block indented less than it. A dedent below the
//! outermost open block is rejected.
//!
//! Blank lines and comment lines (first non-whitespace character `!`) are
//! dropped.
//!
//! # Examples
//!
//! ```
//! use confdiff::parse::parse_config;
//!
//! let root = parse_config("interface Gi0\n ip address 1.1.1.1\n!\nhostname r1\n").unwrap();
//! assert_eq!(root.children().len(), 2);
//! assert_eq!(root.children()[0].children()[0].line(), Some(" ip address 1.1.1.1"));
//! ```

use crate::clause::Clause;
use error_set::error_set;
use nom::bytes::complete::take_while;
use nom::{IResult, Parser};
use std::cmp::Ordering;
use tracing::{debug, instrument, trace};

error_set! {
    /// Errors from parsing indented configuration text
    ParseError := {
        /// A dedented line falls below every open block
        #[display("Invalid dedent at line {line_number}: '{line}' is indented by {indent}, expected at least {expected}")]
        InvalidDedent {
            line_number: usize,
            line: String,
            indent: usize,
            expected: usize,
        },
    }
}

/// Marker that starts a comment line
const COMMENT: char = '!';

/// Leading whitespace of `line`
pub(crate) fn indentation(line: &str) -> IResult<&str, &str> {
    take_while(char::is_whitespace).parse(line)
}

/// Split `line` into its content and its indent width in characters
pub(crate) fn split_indent(line: &str) -> (&str, usize) {
    match indentation(line) {
        Ok((content, leading)) => (content, leading.chars().count()),
        Err(_) => (line, 0),
    }
}

/// Parse configuration text into a rooted clause tree.
///
/// # Errors
///
/// Returns [`ParseError::InvalidDedent`] if a line dedents below the
/// outermost open block.
#[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
pub fn parse_config(text: &str) -> Result<Clause, ParseError> {
    // Open blocks, outermost first. The clause parsed last is always the
    // final child of the innermost open block.
    let mut open = vec![Clause::root()];
    let mut clauses = 0usize;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_end();
        let (content, indent) = split_indent(line);
        if content.is_empty() || content.starts_with(COMMENT) {
            trace!(line_number = index + 1, "skipping blank or comment line");
            continue;
        }

        let depth = indent as isize;
        let previous_indent = match open.last() {
            Some(top) => top.last_child().map_or(top.indent(), Clause::indent),
            None => return Err(underflow(index, line, indent)),
        };

        match depth.cmp(&previous_indent) {
            Ordering::Greater => {
                // The previous clause starts a new block
                if let Some(previous) = open.last_mut().and_then(Clause::pop_child) {
                    open.push(previous);
                }
            }
            Ordering::Less => {
                // open[0] is the root, open[1] the outermost real block
                if let Some(outermost) = open.get(1).filter(|block| depth < block.indent()) {
                    return Err(ParseError::InvalidDedent {
                        line_number: index + 1,
                        line: line.to_string(),
                        indent,
                        expected: usize::try_from(outermost.indent()).unwrap_or(0),
                    });
                }
                close_blocks(&mut open, depth, index, line, indent)?;
            }
            Ordering::Equal => {}
        }

        match open.last_mut() {
            Some(parent) => parent.push_child(Clause::new(line.to_string(), indent)),
            None => return Err(underflow(index, line, indent)),
        }
        clauses += 1;
    }

    let mut blocks = open.into_iter().rev();
    let mut tree = blocks.next().unwrap_or_else(Clause::root);
    for mut parent in blocks {
        parent.push_child(tree);
        tree = parent;
    }

    debug!(clauses, "parsed configuration");
    Ok(tree)
}

/// Pop every open block whose indent is at or beyond `depth`, reattaching
/// each to its parent.
fn close_blocks(
    open: &mut Vec<Clause>,
    depth: isize,
    index: usize,
    line: &str,
    indent: usize,
) -> Result<(), ParseError> {
    loop {
        let top_indent = match open.last() {
            Some(top) => top.indent(),
            None => return Err(underflow(index, line, indent)),
        };
        if depth > top_indent {
            return Ok(());
        }
        let Some(closed) = open.pop() else {
            return Err(underflow(index, line, indent));
        };
        let Some(parent) = open.last_mut() else {
            return Err(underflow(index, line, indent));
        };
        parent.push_child(closed);
    }
}

fn underflow(index: usize, line: &str, indent: usize) -> ParseError {
    ParseError::InvalidDedent {
        line_number: index + 1,
        line: line.to_string(),
        indent,
        expected: 0,
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod proptests {
    use super::*;
    use crate::testing::{arb_config, render_config};
    use proptest::prelude::*;

    proptest! {
        /// Rendering a parsed tree reproduces the source text
        #[test]
        fn parse_round_trips(blocks in arb_config("")) {
            let text = render_config(&blocks);
            let root = parse_config(&text).unwrap();

            prop_assert_eq!(root.config_lines("", true), text);
            prop_assert_eq!(root.children().len(), blocks.len());
        }

        /// Comment and blank lines never become clauses
        #[test]
        fn comments_are_dropped(blocks in arb_config(""), comment in "[ ]{0,3}![ -~]{0,10}") {
            let text = render_config(&blocks);
            let noisy: String = text
                .lines()
                .flat_map(|line| [line.to_string(), comment.clone(), String::new()])
                .map(|line| line + "\n")
                .collect();

            prop_assert_eq!(parse_config(&noisy).unwrap(), parse_config(&text).unwrap());
        }
    }
}
