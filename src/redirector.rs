//! Applies stdout redirects to the executor's final output.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use thiserror::Error;

use crate::command::{Redirect, RedirectKind};
use crate::context::ExecutionContext;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedirectError {
    #[error("bash: {0}: No such file or directory\n")]
    TargetDenied(String),
    #[error("bash: {target}: {message}\n")]
    Write { target: String, message: String },
}

/// Applies every stdout redirect in `redirects` against `output`, bash-style
/// fan-out: all but the last target are truncated (or append-opened) with
/// no content written, and only the last receives `output`.
pub fn redirect(
    redirects: &[Redirect],
    output: &str,
    ctx: &ExecutionContext,
) -> Result<(), RedirectError> {
    let stdout_redirects: Vec<&Redirect> = redirects.iter().filter(|r| r.kind.is_stdout()).collect();
    if stdout_redirects.is_empty() {
        return Ok(());
    }

    let last = stdout_redirects.len() - 1;
    for (i, r) in stdout_redirects.iter().enumerate() {
        let raw = r.target.text();
        let resolved = ctx
            .resolve(raw)
            .map_err(|_| RedirectError::TargetDenied(raw.to_string()))?;
        let content: &[u8] = if i == last { output.as_bytes() } else { b"" };
        write_target(&resolved, r.kind, content, raw)?;
    }
    Ok(())
}

fn write_target(
    resolved: &Path,
    kind: RedirectKind,
    content: &[u8],
    raw: &str,
) -> Result<(), RedirectError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    if kind.is_append() {
        options.append(true);
    } else {
        options.truncate(true);
    }

    let mut file = options.open(resolved).map_err(|err| RedirectError::Write {
        target: raw.to_string(),
        message: posix_message(&err),
    })?;
    file.write_all(content).map_err(|err| RedirectError::Write {
        target: raw.to_string(),
        message: posix_message(&err),
    })?;
    Ok(())
}

fn posix_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "No such file or directory".to_string(),
        io::ErrorKind::PermissionDenied => "Permission denied".to_string(),
        io::ErrorKind::IsADirectory => "Is a directory".to_string(),
        io::ErrorKind::NotADirectory => "Not a directory".to_string(),
        _ => err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::ArgAtom;
    use crate::path_validator::SandboxConfig;
    use tempfile::TempDir;

    fn ctx_in(temp: &TempDir) -> ExecutionContext {
        let sandbox = SandboxConfig::single_root(temp.path().to_path_buf()).unwrap();
        ExecutionContext::new(sandbox)
    }

    fn stdout_redirect(kind: RedirectKind, target: &str) -> Redirect {
        Redirect {
            kind,
            target: ArgAtom::Literal(target.to_string()),
        }
    }

    #[test]
    fn empty_redirect_list_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        assert_eq!(redirect(&[], "hello\n", &ctx), Ok(()));
    }

    #[test]
    fn non_stdout_redirects_are_skipped() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        let redirects = vec![stdout_redirect(RedirectKind::StdinFrom, "in.txt")];
        assert_eq!(redirect(&redirects, "hello\n", &ctx), Ok(()));
        assert!(!temp.path().join("in.txt").exists());
    }

    #[test]
    fn single_truncate_writes_output() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        let redirects = vec![stdout_redirect(RedirectKind::StdoutTruncate, "out.txt")];
        redirect(&redirects, "hello\n", &ctx).unwrap();
        assert_eq!(std::fs::read_to_string(temp.path().join("out.txt")).unwrap(), "hello\n");
    }

    #[test]
    fn fan_out_only_last_target_receives_output() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        let redirects = vec![
            stdout_redirect(RedirectKind::StdoutTruncate, "a.txt"),
            stdout_redirect(RedirectKind::StdoutTruncate, "b.txt"),
        ];
        redirect(&redirects, "hi\n", &ctx).unwrap();
        assert_eq!(std::fs::read_to_string(temp.path().join("a.txt")).unwrap(), "");
        assert_eq!(std::fs::read_to_string(temp.path().join("b.txt")).unwrap(), "hi\n");
    }

    #[test]
    fn target_outside_sandbox_is_denied_with_404_message() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        let redirects = vec![stdout_redirect(RedirectKind::StdoutTruncate, "/etc/passwd")];
        let err = redirect(&redirects, "hello\n", &ctx).unwrap_err();
        assert_eq!(
            err,
            RedirectError::TargetDenied("/etc/passwd".to_string())
        );
        assert_eq!(
            err.to_string(),
            "bash: /etc/passwd: No such file or directory\n"
        );
    }

    #[test]
    fn append_to_nonexistent_parent_fails() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(&temp);
        let redirects = vec![stdout_redirect(RedirectKind::StdoutAppend, "missing_dir/out.txt")];
        let result = redirect(&redirects, "hi\n", &ctx);
        assert!(result.is_err());
    }
}
