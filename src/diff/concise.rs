use super::Marker;
use nom::bytes::complete::take_while;
use nom::character::complete::anychar;
use nom::{IResult, Parser};
use tracing::{debug, instrument};

/// Split a marked line into its marker character and the whitespace that
/// follows it
fn marked_line(line: &str) -> IResult<&str, (char, &str)> {
    (anychar, take_while(char::is_whitespace)).parse(line)
}

/// Marker and indent of a marked line. Anything that is not `+` or `-`
/// counts as unchanged.
fn classify(line: &str) -> (Marker, usize) {
    match marked_line(line) {
        Ok((_, (marker, leading))) => (
            Marker::from_char(marker).unwrap_or(Marker::Unchanged),
            leading.chars().count(),
        ),
        Err(_) => (Marker::Unchanged, 0),
    }
}

/// Reduce marked diff text to its changed lines plus the unchanged lines
/// that enclose them.
///
/// Enclosing lines are emitted once, right before the first change beneath
/// them, and keep their leading space. The result is newline-separated with
/// no trailing newline.
///
/// # Examples
///
/// ```
/// use confdiff::diff::concise;
///
/// let marked = " hostname r1\n interface Gi0\n- shutdown\n";
/// assert_eq!(concise(marked), " interface Gi0\n- shutdown");
/// ```
#[instrument(level = "debug", skip_all)]
#[must_use]
pub fn concise(marked: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    // Unchanged lines that may enclose a later change, outermost first
    let mut enclosing: Vec<(&str, usize)> = Vec::new();
    let mut previous_indent = 0;
    let mut previous_context: Option<&str> = None;

    for line in marked.lines() {
        let (marker, indent) = classify(line);

        if indent > previous_indent {
            if let Some(context) = previous_context {
                enclosing.push((context, previous_indent));
            }
        }
        if indent < previous_indent {
            while enclosing.last().is_some_and(|&(_, level)| indent <= level) {
                enclosing.pop();
            }
        }
        previous_indent = indent;

        if marker.is_change() {
            output.extend(enclosing.drain(..).map(|(context, _)| context));
            output.push(line);
            previous_context = None;
        } else {
            previous_context = Some(line);
        }
    }

    debug!(lines = output.len(), "reduced diff");
    output.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn classify_lines() {
        assert_eq!(classify("-  shutdown"), (Marker::Removed, 2));
        assert_eq!(classify("+mtu 9000"), (Marker::Added, 0));
        assert_eq!(classify("  ip address"), (Marker::Unchanged, 1));
        assert_eq!(classify(""), (Marker::Unchanged, 0));
    }

    #[test]
    fn context_precedes_changes_once() {
        let marked = " interface Gi0\n- ip address 1.1.1.1\n+ ip address 2.2.2.2\n";
        let output = concise(marked);
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                " interface Gi0",
                "- ip address 1.1.1.1",
                "+ ip address 2.2.2.2"
            ]
        );
    }

    #[test]
    fn unchanged_diff_is_empty() {
        assert_eq!(concise(" hostname r1\n interface Gi0\n  shutdown\n"), "");
        assert_eq!(concise(""), "");
    }

    #[test]
    fn top_level_change_has_no_context() {
        assert_eq!(
            concise(" hostname r1\n-ntp server 1.1.1.1\n+ntp server 2.2.2.2\n"),
            "-ntp server 1.1.1.1\n+ntp server 2.2.2.2"
        );
    }

    #[test]
    fn unrelated_unchanged_lines_are_dropped() {
        let marked = " interface Gi0\n  mtu 9000\n interface Gi1\n- shutdown\n";
        assert_eq!(concise(marked), " interface Gi1\n- shutdown");
    }

    #[test]
    fn deep_change_emits_full_ancestor_chain() {
        let marked = " router bgp 1\n  neighbor 10.0.0.1\n   remote-as 2\n-  description old\n+  description new\n";
        insta::assert_snapshot!(concise(marked), @r"
         router bgp 1
          neighbor 10.0.0.1
        -  description old
        +  description new
        ");
    }

    #[test]
    fn sibling_changes_share_context() {
        let marked = " interface Gi0\n- shutdown\n  mtu 9000\n+ description uplink\n";
        assert_eq!(
            concise(marked),
            " interface Gi0\n- shutdown\n+ description uplink"
        );
    }

    #[test]
    fn separate_blocks_get_their_own_context() {
        let marked = " interface Gi0\n- shutdown\n interface Gi1\n  mtu 9000\n+ mtu 1500\n";
        assert_eq!(
            concise(marked),
            " interface Gi0\n- shutdown\n interface Gi1\n+ mtu 1500"
        );
    }

    #[test]
    fn removed_subtree_is_kept_whole() {
        let marked = " hostname r1\n-interface Gi0\n- shutdown\n";
        assert_eq!(concise(marked), "-interface Gi0\n- shutdown");
    }
}
