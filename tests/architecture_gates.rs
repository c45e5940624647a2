use std::fs;
use std::path::{Path, PathBuf};

const ALLOWED_BROADCAST_CALLERS: &[&str] = &["src/adapters/chain_client.rs", "src/adapters/rpc.rs"];

fn collect_rust_files(root: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rust_files(&path, out);
            continue;
        }
        if path.extension().and_then(|s| s.to_str()) == Some("rs") {
            out.push(path);
        }
    }
}

/// (repo-relative path, source up to the first test module)
fn production_sources() -> Vec<(String, String)> {
    let repo_root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut files = Vec::new();
    collect_rust_files(&repo_root.join("src"), &mut files);

    files
        .into_iter()
        .map(|file| {
            let rel = file
                .strip_prefix(repo_root)
                .unwrap_or(&file)
                .to_string_lossy()
                .replace('\\', "/");
            let content = fs::read_to_string(&file).unwrap_or_default();
            let production = match content.find("#[cfg(test)]") {
                Some(idx) => content[..idx].to_string(),
                None => content,
            };
            (rel, production)
        })
        .collect()
}

#[test]
fn raw_broadcasts_only_go_through_the_chain_client() {
    let mut offenders = Vec::new();
    for (rel, content) in production_sources() {
        if ALLOWED_BROADCAST_CALLERS.iter().any(|allowed| *allowed == rel) {
            continue;
        }
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.contains(".send_raw_transaction(") {
                offenders.push(format!("{rel}:{}: {}", idx + 1, trimmed));
            }
        }
    }

    assert!(
        offenders.is_empty(),
        "raw transaction broadcast outside the chain client:\n{}",
        offenders.join("\n")
    );
}

#[test]
fn production_code_does_not_unwrap() {
    let mut offenders = Vec::new();
    for (rel, content) in production_sources() {
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("//") {
                continue;
            }
            if trimmed.contains(".unwrap()") || trimmed.contains(".expect(") {
                offenders.push(format!("{rel}:{}: {}", idx + 1, trimmed));
            }
        }
    }

    assert!(
        offenders.is_empty(),
        "unwrap/expect in production code:\n{}",
        offenders.join("\n")
    );
}
