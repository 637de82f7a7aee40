use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FAMILY: &str = r#"
fact parent("Ahmed", "Ali");
fact parent("Ahmed", "Sara");
fact parent("Ali", "Zain");
rule grandparent(?X, ?Z) :- parent(?X, ?Y), parent(?Y, ?Z);
query grandparent("Ahmed", ?Who);
"#;

#[test]
fn test_cli_run_single_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("family.bayan");
    fs::write(&file, FAMILY).unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(&file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("query grandparent(\"Ahmed\", ?Who)"))
        .stdout(predicate::str::contains("\"Zain\""))
        .stdout(predicate::str::contains("1 solution(s)"));
}

#[test]
fn test_cli_run_directory_loads_files_in_order() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("a_facts.bayan"),
        "fact parent(\"Ahmed\", \"Ali\");\nfact parent(\"Ali\", \"Zain\");",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("b_rules.bayan"),
        "rule grandparent(?X, ?Z) :- parent(?X, ?Y), parent(?Y, ?Z);\nquery grandparent(?G, \"Zain\");",
    )
    .unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a program").unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"Ahmed\""));
}

#[test]
fn test_cli_run_arabic_program() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("عائلة.bayan"),
        r#"
حقيقة والد("أحمد", "علي");
حقيقة والد("علي", "زين");
قاعدة جد(?س, ?ص) :- والد(?س, ?ع), والد(?ع, ?ص);
استعلام جد("أحمد", ?حفيد);
"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"زين\""));
}

#[test]
fn test_cli_run_json_output() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("family.bayan"), FAMILY).unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(temp_dir.path()).arg("--json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(
        json[0]["results"][0]["solutions"],
        serde_json::json!([{ "Who": "Zain" }])
    );
}

#[test]
fn test_cli_run_reports_directives() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("counter.bayan"),
        "fact counter(0);\nretract counter(0);\nassert counter(1);\nquery counter(?N);",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(temp_dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("✓ retract counter(0)"))
        .stdout(predicate::str::contains("✓ assert counter(1)"));
}

#[test]
fn test_cli_run_parse_error() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("broken.bayan"),
        "fact parent(\"Ahmed\" \"Ali\");",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"))
        .stderr(predicate::str::contains("broken.bayan"));
}

#[test]
fn test_cli_run_builtin_redefinition_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("bad.bayan"), "fact length(1, 2);").unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Semantic error"))
        .stderr(predicate::str::contains("length/2"));
}

#[test]
fn test_cli_run_empty_directory() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No .bayan files found"));
}

#[test]
fn test_cli_run_inference_limit() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("loop.bayan"),
        "rule forever :- forever;\nquery forever;",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("run")
        .arg(temp_dir.path())
        .arg("--max-inferences")
        .arg("500");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("stopped: Resource limit exceeded"));
}
