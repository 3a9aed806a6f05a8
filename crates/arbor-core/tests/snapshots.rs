use arbor_core::{OrganizeMode, organize, parse_outline};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..")
}

fn fixtures_root() -> PathBuf {
    workspace_root().join("fixtures").join("outline")
}

fn list_fixture_outlines(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let Ok(entries) = std::fs::read_dir(root) else {
        return out;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let is_md = path.extension().is_some_and(|e| e == "md");
        let is_expected_output = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.ends_with(".smart"));
        if is_md && !is_expected_output {
            out.push(path);
        }
    }
    out.sort();
    out
}

#[test]
fn fixtures_match_golden_snapshots() {
    let fixtures = list_fixture_outlines(&fixtures_root());
    assert!(
        !fixtures.is_empty(),
        "no fixtures found under {}",
        fixtures_root().display()
    );

    for md_path in fixtures {
        let text = std::fs::read_to_string(&md_path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", md_path.display()));
        let snapshot = serde_json::to_value(parse_outline(&text)).expect("serialize outline");

        let golden_path = md_path.with_extension("golden.json");
        let golden_text = std::fs::read_to_string(&golden_path)
            .unwrap_or_else(|_| panic!("missing golden snapshot {}", golden_path.display()));
        let golden: Value = serde_json::from_str(&golden_text)
            .unwrap_or_else(|e| panic!("invalid golden JSON {}: {e}", golden_path.display()));

        assert_eq!(
            snapshot,
            golden,
            "snapshot mismatch for {}",
            md_path.display()
        );
    }
}

#[test]
fn fixtures_match_smart_clean_outputs() {
    for md_path in list_fixture_outlines(&fixtures_root()) {
        let text = std::fs::read_to_string(&md_path).expect("fixture");
        let expected_path = md_path.with_extension("smart.md");
        let expected = std::fs::read_to_string(&expected_path)
            .unwrap_or_else(|_| panic!("missing {}", expected_path.display()));

        assert_eq!(
            organize(&text, OrganizeMode::Smart),
            expected.trim_end(),
            "smart clean mismatch for {}",
            md_path.display()
        );
    }
}
