use arbor_core::{OrganizeMode, OutlineShape, organize, parse_outline};
use proptest::prelude::*;

fn plain_line() -> impl Strategy<Value = String> {
    prop_oneof![
        (1usize..=5, "[a-zA-Z]{1,6}( [a-z]{1,4})?")
            .prop_map(|(level, text)| format!("{} {text}", "#".repeat(level))),
        (1usize..=3).prop_map(|level| "#".repeat(level)),
        "[a-zA-Z]{1,6}( [a-z]{1,4})?",
        Just(String::new()),
    ]
}

/// Everything smart clean may only reshape, never renest.
fn structural_line() -> impl Strategy<Value = String> {
    prop_oneof![
        plain_line(),
        "  #{1,3} [a-z]{1,5}  ",
        "\t[a-z]{1,5}\r",
    ]
}

/// Bullets additionally lose their marker, so only the node count survives them.
fn messy_line() -> impl Strategy<Value = String> {
    prop_oneof![structural_line(), "[-*+] [a-z]{1,5}"]
}

fn outline_text(line: impl Strategy<Value = String>) -> impl Strategy<Value = String> {
    prop::collection::vec(line, 0..24).prop_map(|lines| lines.join("\n"))
}

/// Headings whose names are unique across the whole document.
fn distinct_outline() -> impl Strategy<Value = String> {
    prop::collection::vec((1usize..=4, "[a-zA-Z]{1,4}"), 1..24).prop_map(|lines| {
        lines
            .into_iter()
            .enumerate()
            .map(|(i, (level, word))| format!("{} {word}{i}", "#".repeat(level)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn reversed(shape: &OutlineShape) -> OutlineShape {
    OutlineShape {
        name: shape.name.clone(),
        children: shape.children.iter().rev().map(reversed).collect(),
    }
}

#[test]
fn indented_hash_lines_nest_the_same_before_and_after_smart_clean() {
    let text = "# Root\n## Child\n  ## indented\n### Grandchild";
    let parsed = parse_outline(text);
    let child = &parsed.children[0];
    assert_eq!(child.name, "Child");
    let names: Vec<&str> = child.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["## indented", "Grandchild"]);

    let cleaned = organize(text, OrganizeMode::Smart);
    assert_eq!(
        cleaned,
        "# Root\n## Child\n### ## indented\n### Grandchild"
    );
    assert_eq!(parse_outline(&cleaned).shape(), parsed.shape());
}

proptest! {
    #[test]
    fn smart_clean_is_idempotent(text in outline_text(messy_line())) {
        let once = organize(&text, OrganizeMode::Smart);
        prop_assert_eq!(organize(&once, OrganizeMode::Smart), once);
    }

    #[test]
    fn smart_clean_preserves_structure(text in outline_text(structural_line())) {
        let cleaned = organize(&text, OrganizeMode::Smart);
        prop_assert_eq!(parse_outline(&cleaned).shape(), parse_outline(&text).shape());
    }

    #[test]
    fn za_after_az_reverses_every_level(text in distinct_outline()) {
        let ascending = organize(&text, OrganizeMode::Az);
        let descending = organize(&ascending, OrganizeMode::Za);
        prop_assert_eq!(
            parse_outline(&descending).shape(),
            reversed(&parse_outline(&ascending).shape())
        );
    }

    #[test]
    fn sorting_never_changes_the_node_count(text in outline_text(messy_line())) {
        let smart = parse_outline(&organize(&text, OrganizeMode::Smart)).node_count();
        prop_assert_eq!(parse_outline(&organize(&text, OrganizeMode::Az)).node_count(), smart);
        prop_assert_eq!(parse_outline(&organize(&text, OrganizeMode::Za)).node_count(), smart);
    }
}
