use super::{DiffLine, Marker};
use crate::clause::Clause;
use std::iter;
use tracing::{debug, instrument, trace};

/// Diff two clause trees by line text.
///
/// Siblings are matched by identical line text regardless of position, so
/// reordering a block's children produces no changes. A matched pair is
/// emitted once as unchanged and its children are diffed in turn. Unmatched
/// old clauses are emitted with their whole subtree as removed, unmatched new
/// clauses with their whole subtree as added.
///
/// When several siblings share the same text, each is matched against the
/// first sibling on the other side that has not been matched yet.
///
/// Nesting is walked with an explicit stack of frames, one per level.
#[instrument(level = "debug", skip_all)]
pub fn diff_trees<'a>(old: &'a Clause, new: &'a Clause) -> Vec<DiffLine<'a>> {
    let mut output = Vec::new();
    let mut frames = vec![Frame::new(old, new)];
    let mut max_depth = 1;

    while let Some(frame) = frames.last_mut() {
        match frame.step(&mut output) {
            Step::Descend(old_child, new_child) => {
                frames.push(Frame::new(old_child, new_child));
                max_depth = max_depth.max(frames.len());
            }
            Step::Continue => {}
            Step::Done => {
                frames.pop();
            }
        }
    }

    debug!(lines = output.len(), max_depth, "diffed configuration trees");
    output
}

/// What the walk should do after one step of a frame
enum Step<'a> {
    /// Diff the children of a matched pair before resuming this frame
    Descend(&'a Clause, &'a Clause),
    Continue,
    Done,
}

/// Matching state for the children of one pair of corresponding clauses
struct Frame<'a> {
    old: &'a [Clause],
    new: &'a [Clause],
    old_cursor: usize,
    new_cursor: usize,
    old_consumed: Vec<bool>,
    new_consumed: Vec<bool>,
}

impl<'a> Frame<'a> {
    fn new(old: &'a Clause, new: &'a Clause) -> Self {
        Self {
            old: old.children(),
            new: new.children(),
            old_cursor: 0,
            new_cursor: 0,
            old_consumed: vec![false; old.children().len()],
            new_consumed: vec![false; new.children().len()],
        }
    }

    fn step(&mut self, output: &mut Vec<DiffLine<'a>>) -> Step<'a> {
        let (old, new) = (self.old, self.new);
        self.skip_consumed();
        if self.old_cursor >= old.len() && self.new_cursor >= new.len() {
            return Step::Done;
        }

        // Remove up to the next old sibling that is matched or matchable
        while let Some(old_child) = old.get(self.old_cursor) {
            if self.old_consumed[self.old_cursor]
                || find_unconsumed(new, &self.new_consumed, old_child).is_some()
            {
                break;
            }
            trace!(line = old_child.line(), "removed");
            emit_subtree(old_child, Marker::Removed, output);
            self.old_consumed[self.old_cursor] = true;
            self.old_cursor += 1;
        }

        let Some(new_child) = new.get(self.new_cursor) else {
            return Step::Continue;
        };
        self.new_consumed[self.new_cursor] = true;

        match find_unconsumed(old, &self.old_consumed, new_child) {
            Some(index) => {
                trace!(line = new_child.line(), "matched");
                self.old_consumed[index] = true;
                if let Some(line) = new_child.line() {
                    output.push(DiffLine::new(Marker::Unchanged, line));
                }
                Step::Descend(&old[index], new_child)
            }
            None => {
                trace!(line = new_child.line(), "added");
                emit_subtree(new_child, Marker::Added, output);
                Step::Continue
            }
        }
    }

    fn skip_consumed(&mut self) {
        while self.old_consumed.get(self.old_cursor) == Some(&true) {
            self.old_cursor += 1;
        }
        while self.new_consumed.get(self.new_cursor) == Some(&true) {
            self.new_cursor += 1;
        }
    }
}

/// Index of the first unconsumed sibling with the same line as `clause`
fn find_unconsumed(siblings: &[Clause], consumed: &[bool], clause: &Clause) -> Option<usize> {
    siblings
        .iter()
        .zip(consumed)
        .position(|(sibling, &taken)| !taken && sibling.same_line(clause))
}

fn emit_subtree<'a>(clause: &'a Clause, marker: Marker, output: &mut Vec<DiffLine<'a>>) {
    output.extend(
        iter::once(clause)
            .chain(clause.descendants())
            .filter_map(Clause::line)
            .map(|line| DiffLine::new(marker, line)),
    );
}
