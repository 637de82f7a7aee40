use assert_cmd::Command;

#[test]
fn test_server_command_available() {
    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("server"));
}

#[test]
fn test_server_rejects_broken_workspace() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("broken.bayan"), "fact (;").unwrap();

    let mut cmd = Command::cargo_bin("bayan").unwrap();
    cmd.arg("server").arg("--dir").arg(temp_dir.path());

    cmd.assert()
        .failure()
        .stderr(predicates::str::contains("Parse error"));
}
