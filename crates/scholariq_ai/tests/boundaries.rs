use std::fs;
use std::path::{Path, PathBuf};

fn collect_rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(p) = stack.pop() {
        let entries = match fs::read_dir(&p) {
            Ok(e) => e,
            Err(_) => continue,
        };
        for ent in entries.flatten() {
            let path = ent.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

#[test]
fn scoring_core_makes_no_network_calls() {
    // The scorer must stay pure: no HTTP client and no generation trait in scholariq_core.
    let core_src = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../scholariq_core/src");
    let files = collect_rs_files(&core_src);
    assert!(!files.is_empty());

    for f in files {
        let text = fs::read_to_string(&f).unwrap_or_default();
        assert!(!text.contains("ureq"), "HTTP client found in {}", f.display());
        assert!(
            !text.contains("scholariq_ai"),
            "generation layer imported in {}",
            f.display()
        );
    }
}

#[test]
fn api_key_never_reaches_logs() {
    let src_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src");
    for f in collect_rs_files(&src_root) {
        let text = fs::read_to_string(&f).unwrap_or_default();
        for line in text.lines().filter(|l| l.contains("tracing::")) {
            assert!(
                !line.contains("api_key"),
                "api key logged in {}: {line}",
                f.display()
            );
        }
    }
}
