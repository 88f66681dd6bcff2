//! Shared proptest strategies for configuration text.

use proptest::prelude::*;

/// Top-level blocks, each a line with its nested lines
pub type Blocks = Vec<(String, Vec<String>)>;

fn arb_word(prefix: &'static str) -> impl Strategy<Value = String> {
    "[a-z]{1,6}( [0-9]{1,3})?".prop_map(move |word| format!("{prefix}{word}"))
}

/// Configuration blocks with distinct lines among siblings
pub fn arb_config(prefix: &'static str) -> impl Strategy<Value = Blocks> {
    prop::collection::btree_map(
        arb_word(prefix),
        prop::collection::btree_set(arb_word(prefix), 0..4),
        0..6,
    )
    .prop_map(|blocks| {
        blocks
            .into_iter()
            .map(|(name, children)| (name, children.into_iter().collect::<Vec<_>>()))
            .collect::<Blocks>()
    })
}

/// Configuration blocks drawn from a small vocabulary, so sibling lines
/// repeat often
pub fn arb_config_with_duplicates() -> impl Strategy<Value = Blocks> {
    prop::collection::vec(
        (
            "(interface Gi[01]|hostname r1)",
            prop::collection::vec("(shutdown|mtu 9000|vlan [12])", 0..4),
        ),
        0..6,
    )
}

/// Render blocks as text with a single space of indent per level
pub fn render_config(blocks: &[(String, Vec<String>)]) -> String {
    let mut text = String::new();
    for (name, children) in blocks {
        text.push_str(name);
        text.push('\n');
        for child in children {
            text.push(' ');
            text.push_str(child);
            text.push('\n');
        }
    }
    text
}
