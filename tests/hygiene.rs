//! Hygiene: coding standards enforced at test time.
//!
//! Scans `src/` (test files excluded) for patterns the project does not allow
//! in production code. Each pattern has a budget, ideally zero. The budget
//! never grows: fix an existing hit before adding a new one.
#![allow(clippy::absurd_extreme_comparisons)]

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics: a canvas handler must never take the host down.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or handle the error" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or handle the error" },
    Budget { pattern: "panic!(", max: 0, why: "no fatal paths in the engine" },
    Budget { pattern: "unreachable!(", max: 0, why: "model the state so it cannot happen" },
    Budget { pattern: "todo!(", max: 0, why: "stubs are not shipped" },
    Budget { pattern: "unimplemented!(", max: 0, why: "stubs are not shipped" },
    // Silent loss.
    Budget { pattern: "let _ =", max: 0, why: "inspect what you discard" },
    Budget { pattern: ".ok()", max: 0, why: "inspect what you discard" },
    // Handlers run to completion on one thread and must not block.
    Budget { pattern: "std::thread::sleep", max: 0, why: "schedule a timer instead" },
    // Style / structure.
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" },
];

/// Library files that may write to stdout.
const STDOUT_ALLOWED: &[&str] = &["main.rs"];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
        } else if path.extension().is_some_and(|e| e == "rs") {
            let path_str = path.to_string_lossy().to_string();
            if path_str.ends_with("_test.rs") {
                continue;
            }
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path: path_str, content });
            }
        }
    }
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file.content.lines().filter(|line| line.contains(pattern)).count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

fn format_hits(hits: &[(String, usize)]) -> String {
    hits.iter()
        .map(|(path, count)| format!("  {path}: {count}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn sources_are_found() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("engine.rs")), "run from the crate root");
}

#[test]
fn pattern_budgets() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            failures.push(format!(
                "`{}` budget exceeded: found {count}, max {} ({}).\n{}",
                budget.pattern,
                budget.max,
                budget.why,
                format_hits(&found)
            ));
        }
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn library_logs_through_tracing() {
    let files: Vec<SourceFile> = source_files()
        .into_iter()
        .filter(|f| !STDOUT_ALLOWED.iter().any(|allowed| f.path.ends_with(allowed)))
        .collect();
    let mut found = hits(&files, "println!(");
    found.extend(hits(&files, "eprintln!("));
    assert!(found.is_empty(), "use tracing instead of printing:\n{}", format_hits(&found));
}
