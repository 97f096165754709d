//! Per-invocation execution state, threaded explicitly through every stage.
//!
//! There is exactly one shape for this: an owned, instantiable struct
//! passed by reference or moved as needed. No process-wide static, no
//! thread-local fallback — every function that needs the current
//! directory or the sandbox configuration takes an `&ExecutionContext`
//! argument and nothing reaches around it.

use std::path::{Path, PathBuf};

use crate::path_validator::{validate_path, SandboxConfig, ValidationError};

/// The state threaded through one call to [`crate::executor::execute`].
///
/// `cd` does not mutate a shared context in place — it produces a new
/// `ExecutionContext` with an updated `current_dir`, which the executor
/// then threads into whatever runs after it in the same pipeline.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    sandbox: SandboxConfig,
    current_dir: PathBuf,
    stdin: Option<String>,
}

impl ExecutionContext {
    /// Starts a session rooted at the sandbox's configured home, with no
    /// pending stdin.
    pub fn new(sandbox: SandboxConfig) -> Self {
        let current_dir = sandbox.home().to_path_buf();
        Self {
            sandbox,
            current_dir,
            stdin: None,
        }
    }

    pub fn sandbox(&self) -> &SandboxConfig {
        &self.sandbox
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn stdin(&self) -> Option<&str> {
        self.stdin.as_deref()
    }

    /// Validates `path` against this context's current directory as the
    /// base for relative lookups.
    pub fn resolve(&self, path: &str) -> Result<PathBuf, ValidationError> {
        validate_path(path, &self.sandbox, Some(&self.current_dir))
    }

    /// Returns a new context with `current_dir` set to the validated,
    /// resolved form of `path`. Does not check that the target is a
    /// directory — callers (the `cd` handler) do that themselves, since
    /// only they know whether to report "not a directory" distinctly.
    pub fn with_current_dir(&self, resolved: PathBuf) -> Self {
        Self {
            sandbox: self.sandbox.clone(),
            current_dir: resolved,
            stdin: self.stdin.clone(),
        }
    }

    /// Returns a new context carrying `stdin` for the next handler call.
    pub fn with_stdin(&self, stdin: Option<String>) -> Self {
        Self {
            sandbox: self.sandbox.clone(),
            current_dir: self.current_dir.clone(),
            stdin,
        }
    }

    /// Returns a new context with `stdin` cleared, so it never leaks into
    /// a subsequent top-level invocation.
    pub fn without_stdin(&self) -> Self {
        self.with_stdin(None)
    }
}
