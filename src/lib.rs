//! A simulated shell: a bounded filesystem "dome" plus the pipeline that
//! executes a restricted bash-like command grammar inside it.
//!
//! Two invariants hold at every stage: containment (no observable effect
//! resolves outside the configured dome) and the 404 principle (a denied
//! path is reported exactly as a nonexistent one would be — never as
//! "Permission denied"). This crate does not defend against
//! time-of-check/time-of-use races at the operating-system level; it is a
//! user-space lexical and filesystem check, not a kernel sandbox.

pub mod command;
pub mod config;
pub mod context;
pub mod executor;
pub mod expander;
pub mod handlers;
pub mod parser;
pub mod path_validator;
pub mod redirector;
pub mod tokenizer;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use command::CommandNode;
pub use context::ExecutionContext;
pub use path_validator::SandboxConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomeError {
    #[error(transparent)]
    Parse(#[from] parser::ParseError),
    #[error(transparent)]
    Execute(#[from] executor::ExecutorError),
}

/// Runs `input` through tokenize → parse → expand → execute, returning the
/// reported output and the context carried forward (e.g. after a `cd`).
pub fn execute(
    input: &str,
    ctx: &ExecutionContext,
) -> Result<(String, ExecutionContext), DomeError> {
    let mut node = parser::parse(input)?;
    expander::expand(&mut node, ctx);
    let (output, next_ctx) = executor::execute(&node, ctx)?;
    Ok((output, next_ctx))
}

/// Exposes the parser alone, for callers that want the command tree
/// without running it.
pub fn parse(input: &str) -> Result<CommandNode, parser::ParseError> {
    parser::parse(input)
}

/// Exposes the path validator alone, for external sandboxing hooks.
pub fn validate_path(
    path: &str,
    sandbox: &SandboxConfig,
    base_dir: Option<&Path>,
) -> Result<PathBuf, path_validator::ValidationError> {
    path_validator::validate_path(path, sandbox, base_dir)
}
