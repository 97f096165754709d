mod support;

use support::TempDir;
use truman_dome::{ExecutionContext, SandboxConfig};

fn ctx_in(dome: &TempDir) -> ExecutionContext {
    let sandbox = SandboxConfig::single_root(dome.path().to_path_buf()).unwrap();
    ExecutionContext::new(sandbox)
}

#[test]
fn redirect_creates_file_with_expected_contents() {
    let dome = TempDir::new();
    let ctx = ctx_in(&dome);

    let (output, _) = truman_dome::execute("echo hello > out.txt", &ctx).unwrap();
    assert_eq!(output, "");
    assert_eq!(
        std::fs::read_to_string(dome.path().join("out.txt")).unwrap(),
        "hello\n"
    );
}

#[test]
fn redirect_outside_the_dome_is_denied_and_leaves_the_target_untouched() {
    let dome = TempDir::new();
    let ctx = ctx_in(&dome);

    let err = truman_dome::execute("echo hello > /etc/passwd", &ctx).unwrap_err();
    assert_eq!(err.to_string(), "bash: /etc/passwd: No such file or directory\n");
    assert_ne!(
        std::fs::read_to_string("/etc/passwd").unwrap_or_default(),
        "hello\n"
    );
}

#[test]
fn cat_piped_into_head_truncates_to_requested_line_count() {
    let dome = TempDir::new();
    let ctx = ctx_in(&dome);
    let lines: Vec<String> = (1..=10).map(|n| format!("line {n}")).collect();
    std::fs::write(dome.path().join("data.txt"), lines.join("\n") + "\n").unwrap();

    let (output, _) = truman_dome::execute("cat data.txt | head -n 5", &ctx).unwrap();
    assert_eq!(output, "line 1\nline 2\nline 3\nline 4\nline 5\n");
}

#[test]
fn two_redirects_fan_out_with_only_the_last_receiving_output() {
    let dome = TempDir::new();
    let ctx = ctx_in(&dome);

    let (output, _) = truman_dome::execute("echo hi > a.txt > b.txt", &ctx).unwrap();
    assert_eq!(output, "");
    assert_eq!(std::fs::read_to_string(dome.path().join("a.txt")).unwrap(), "");
    assert_eq!(std::fs::read_to_string(dome.path().join("b.txt")).unwrap(), "hi\n");
}

#[test]
fn unrecognised_command_reports_bash_style_not_found() {
    let dome = TempDir::new();
    let ctx = ctx_in(&dome);

    let err = truman_dome::execute("unknownthing foo", &ctx).unwrap_err();
    assert_eq!(err.to_string(), "bash: unknownthing: command not found\n");
}

#[cfg(unix)]
#[test]
fn reading_through_a_symlink_that_escapes_the_dome_is_denied() {
    let dome = TempDir::new();
    let outside = std::env::temp_dir().join(format!("truman-dome-it-outside-{}", std::process::id()));
    std::fs::create_dir_all(&outside).unwrap();
    std::fs::write(outside.join("passwd"), "root:x:0:0\n").unwrap();
    std::os::unix::fs::symlink(&outside, dome.path().join("escape")).unwrap();
    let ctx = ctx_in(&dome);

    let err = truman_dome::execute("cat escape/passwd", &ctx).unwrap_err();
    assert_eq!(err.to_string(), "cat: escape/passwd: No such file or directory\n");

    let _ = std::fs::remove_dir_all(&outside);
}

#[test]
fn cd_then_relative_read_resolves_against_the_new_directory() {
    let dome = TempDir::new();
    std::fs::create_dir_all(dome.path().join("sub")).unwrap();
    std::fs::write(dome.path().join("sub/inside.txt"), "found\n").unwrap();
    let ctx = ctx_in(&dome);

    let (_, after_cd) = truman_dome::execute("cd sub", &ctx).unwrap();
    let (output, _) = truman_dome::execute("cat inside.txt", &after_cd).unwrap();
    assert_eq!(output, "found\n");
}
