//! End-to-end tests for the searchdex binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn searchdex() -> Command {
    Command::cargo_bin("searchdex").expect("binary builds")
}

const MANIFEST: &str = r#"[
  {"label": "GNode", "page": "classGNode.html"},
  {"label": "lineOfSight", "page": "classGNode.html", "anchor": "a4a93c75", "context": "GNode"},
  {"label": "log", "page": "classLog.html", "anchor": "ad8c3a34", "context": "Log::log(const PathStatistics &amp;stats)"},
  {"label": "Log", "page": "classLog.html"}
]"#;

#[test]
fn build_writes_a_loadable_index() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("symbols.json");
    std::fs::write(&manifest, MANIFEST).unwrap();
    let out = dir.path().join("search");

    searchdex()
        .arg("build")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Index Built"));

    let data = std::fs::read_to_string(out.join("searchdata.js")).unwrap();
    assert!(data.starts_with("var searchData="));
    assert!(data.contains("['gnode_0',['GNode',['../classGNode.html',1,'']]]"));
    // duplicate base `log`: lowercase label first, then the class
    assert!(data.contains("'log_2'"));
    assert!(data.contains("'log_3'"));
}

#[test]
fn build_split_emits_buckets() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("symbols.json");
    std::fs::write(&manifest, MANIFEST).unwrap();
    let out = dir.path().join("search");

    searchdex()
        .arg("build")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .arg("--split")
        .assert()
        .success();

    // distinct first chars g, l -> all_0.js, all_1.js
    assert!(out.join("all_0.js").exists());
    assert!(out.join("all_1.js").exists());
    assert!(!out.join("searchdata.js").exists());
}

#[test]
fn search_finds_prefix_matches() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("symbols.json");
    std::fs::write(&manifest, MANIFEST).unwrap();
    let out = dir.path().join("search");

    searchdex()
        .arg("build")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    searchdex()
        .arg("search")
        .arg("line")
        .arg("-i")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("lineOfSight"))
        .stdout(predicate::str::contains("classGNode.html#a4a93c75"));

    searchdex()
        .arg("search")
        .arg("zzz")
        .arg("-i")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found"));
}

#[test]
fn validate_flags_malformed_tokens() {
    let dir = tempfile::tempdir().unwrap();
    let index = dir.path().join("searchdata.js");
    std::fs::write(
        &index,
        "var searchData=\n[\n  ['Log_0',['Log',['../classLog.html',1,'']]]\n];\n",
    )
    .unwrap();

    searchdex()
        .arg("validate")
        .arg(&index)
        .assert()
        .failure()
        .stdout(predicate::str::contains("characters outside [a-z0-9_]"));
}

#[test]
fn validate_accepts_generated_output() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("symbols.json");
    std::fs::write(&manifest, MANIFEST).unwrap();
    let out = dir.path().join("search");

    searchdex()
        .arg("build")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    searchdex()
        .arg("validate")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("well-formed"));
}

#[test]
fn validate_reports_broken_links() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("html");
    std::fs::create_dir_all(&docs).unwrap();
    std::fs::write(docs.join("classLog.html"), "<html></html>").unwrap();

    let index = dir.path().join("searchdata.js");
    std::fs::write(
        &index,
        "var searchData=\n[\n  ['log_0',['Log',['../classLog.html',1,'']]],\n  ['gnode_1',['GNode',['../classGNode.html',1,'']]]\n];\n",
    )
    .unwrap();

    searchdex()
        .arg("validate")
        .arg(&index)
        .arg("--docs-root")
        .arg(&docs)
        .assert()
        .failure()
        .stdout(predicate::str::contains("classGNode.html"));
}

#[test]
fn list_json_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("symbols.json");
    std::fs::write(&manifest, MANIFEST).unwrap();
    let out = dir.path().join("search");

    searchdex()
        .arg("build")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let output = searchdex()
        .arg("list")
        .arg(&out)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 4);
}

#[test]
fn info_reports_index_stats() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("symbols.json");
    std::fs::write(&manifest, MANIFEST).unwrap();
    let out = dir.path().join("search");

    searchdex()
        .arg("build")
        .arg(&manifest)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    searchdex()
        .arg("info")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Entries:          4"))
        .stdout(predicate::str::contains("Duplicate bases:  1"));
}
