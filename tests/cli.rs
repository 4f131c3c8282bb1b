//! Integration tests for top-level CLI behavior.

use std::process::Command;

fn run_deploy_complexity(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_deploy-complexity");
    Command::new(bin)
        .args(args)
        .env_remove("DEPLOY_COMPLEXITY_RECORD")
        .output()
        .expect("failed to run deploy-complexity binary")
}

#[test]
fn help_lists_subcommands() {
    let output = run_deploy_complexity(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("diff"));
    assert!(stdout.contains("history"));
    assert!(stdout.contains("promote"));
}

#[test]
fn diff_help_shows_global_flags() {
    let output = run_deploy_complexity(&["diff", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("--dirstat"));
    assert!(stdout.contains("--slack"));
    assert!(stdout.contains("--gh-url"));
}

#[test]
fn unknown_subcommand_fails() {
    let output = run_deploy_complexity(&["deploy"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn diff_requires_a_ref() {
    let output = run_deploy_complexity(&["diff"]);
    assert!(!output.status.success());
}

#[test]
fn unknown_format_is_rejected() {
    let output = run_deploy_complexity(&["promote", "--format", "html"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("html"));
}

#[test]
fn outside_a_repository_fails_cleanly() {
    let dir = std::env::temp_dir().join("deploy_complexity_cli_no_repo");
    std::fs::create_dir_all(&dir).unwrap();
    let output = run_deploy_complexity(&[
        "diff",
        "base",
        "to",
        "--gh-url",
        "https://github.com/org/app",
        "--git-dir",
        dir.to_str().unwrap(),
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("Failed to resolve revision to"));
    let _ = std::fs::remove_dir_all(&dir);
}
