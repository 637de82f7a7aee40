use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn family_workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("family.bayan"),
        r#"
fact parent("Ahmed", "Ali");
fact parent("Ahmed", "Sara");
fact parent("Ali", "Zain");
fact parent("Sara", "Omar");
rule grandparent(?X, ?Z) :- parent(?X, ?Y), parent(?Y, ?Z);
"#,
    )
    .unwrap();
    temp_dir
}

#[test]
fn test_cli_query_prints_solution_table() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("query")
        .arg("grandparent(\"Ahmed\", ?Who)")
        .arg("--dir")
        .arg(workspace.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("?Who"))
        .stdout(predicate::str::contains("\"Zain\""))
        .stdout(predicate::str::contains("\"Omar\""))
        .stdout(predicate::str::contains("2 solution(s)"));
}

#[test]
fn test_cli_query_accepts_arabic_keyword() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("query")
        .arg("استعلام parent(\"Ahmed\", ?C)")
        .arg("--dir")
        .arg(workspace.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2 solution(s)"));
}

#[test]
fn test_cli_query_limit() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("query")
        .arg("parent(?X, ?Y)")
        .arg("--dir")
        .arg(workspace.path())
        .arg("--limit")
        .arg("1");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 solution(s)"));
}

#[test]
fn test_cli_query_json() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("query")
        .arg("parent(\"Ali\", ?C)")
        .arg("--dir")
        .arg(workspace.path())
        .arg("--json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json, serde_json::json!([{ "C": "Zain" }]));
}

#[test]
fn test_cli_query_without_solutions_prints_false() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("query")
        .arg("parent(\"Zain\", ?C)")
        .arg("--dir")
        .arg(workspace.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("false\n"));
}

#[test]
fn test_cli_query_inference_limit_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("nat.bayan"),
        "fact nat(0);\nrule nat(?N) :- nat(?M), ?N is ?M + 1;",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("query")
        .arg("nat(?N), ?N < 0")
        .arg("--dir")
        .arg(temp_dir.path())
        .arg("--max-inferences")
        .arg("1000");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Resource limit exceeded"));
}

#[test]
fn test_cli_list_predicates() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("list").arg("--dir").arg(workspace.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 files, 2 predicates"))
        .stdout(predicate::str::contains("grandparent"));
}

#[test]
fn test_cli_show_in_arabic() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("show")
        .arg("grandparent")
        .arg("--dir")
        .arg(workspace.path())
        .arg("--arabic");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("قاعدة grandparent(?X, ?Z) :-"));
}

#[test]
fn test_cli_show_unknown_predicate() {
    let workspace = family_workspace();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("show")
        .arg("cousin")
        .arg("--dir")
        .arg(workspace.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Predicate 'cousin' not found"));
}

#[test]
fn test_cli_keywords() {
    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("keywords");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("findall"))
        .stdout(predicate::str::contains("اجمع_كل"));
}
