mod support;

use std::process::Command;

use support::TempDir;

fn truman() -> Command {
    Command::new(env!("CARGO_BIN_EXE_truman"))
}

#[test]
fn execute_subcommand_prints_output_and_exits_zero() {
    let dome = TempDir::new();

    let output = truman()
        .args(["-d", dome.path().to_str().unwrap(), "execute", "echo hi"])
        .output()
        .expect("failed to run truman binary");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
}

#[test]
fn execute_subcommand_exits_one_on_unknown_command() {
    let dome = TempDir::new();

    let output = truman()
        .args(["-d", dome.path().to_str().unwrap(), "execute", "frobnicate"])
        .output()
        .expect("failed to run truman binary");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "bash: frobnicate: command not found\n"
    );
}

#[test]
fn validate_path_subcommand_prints_resolved_path() {
    let dome = TempDir::new();

    let output = truman()
        .args([
            "validate-path",
            "a.txt",
            dome.path().to_str().unwrap(),
        ])
        .output()
        .expect("failed to run truman binary");

    assert!(output.status.success());
    let printed = String::from_utf8_lossy(&output.stdout);
    assert!(printed.trim_end().ends_with("a.txt"));
}

#[test]
fn parse_subcommand_prints_a_command_tree() {
    let output = truman()
        .args(["parse", "ls -la"])
        .output()
        .expect("failed to run truman binary");

    assert!(output.status.success());
    let printed = String::from_utf8_lossy(&output.stdout);
    assert!(printed.contains("Ls"));
}
