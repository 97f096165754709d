//! The reference handler set backing the closed command-name allowlist.
//!
//! Every handler goes through the same `(args, context) -> (output,
//! context') | error` contract described in the executor's design, so a
//! richer handler crate could be swapped in without touching the pipeline
//! core. None of these spawn a subprocess — this is a simulated shell, and
//! every effect lands directly on the host filesystem beneath the dome.

mod fs_read;
mod fs_write;
mod listing;
mod shell_builtins;

use std::path::PathBuf;

use crate::command::CommandName;
use crate::context::ExecutionContext;
use crate::path_validator::validate_path;

/// Per-file reads are capped here; a handler reading past this fails with a
/// handler error instead of exhausting memory.
pub const MAX_READ_BYTES: u64 = 10 * 1024 * 1024;

pub struct HandlerOutput {
    pub output: String,
    pub context: ExecutionContext,
}

/// `Err` carries the exact, already-formatted bash-style message — handlers
/// are trusted to produce it themselves; the executor never rewrites it.
pub type HandlerResult = Result<HandlerOutput, String>;

pub type HandlerFn = fn(&[String], &ExecutionContext) -> HandlerResult;

pub fn lookup(name: CommandName) -> HandlerFn {
    match name {
        CommandName::Pwd => shell_builtins::pwd,
        CommandName::Cd => shell_builtins::cd,
        CommandName::Echo => shell_builtins::echo,
        CommandName::True => shell_builtins::run_true,
        CommandName::False => shell_builtins::run_false,
        CommandName::Date => shell_builtins::date,
        CommandName::Cat => fs_read::cat,
        CommandName::Head => fs_read::head,
        CommandName::Tail => fs_read::tail,
        CommandName::Wc => fs_read::wc,
        CommandName::Grep => fs_read::grep,
        CommandName::Mkdir => fs_write::mkdir,
        CommandName::Touch => fs_write::touch,
        CommandName::Rm => fs_write::rm,
        CommandName::Cp => fs_write::cp,
        CommandName::Mv => fs_write::mv,
        CommandName::Ls => listing::ls,
        CommandName::Find => listing::find,
        CommandName::Which => listing::which,
    }
}

fn ok(output: impl Into<String>, ctx: &ExecutionContext) -> HandlerResult {
    Ok(HandlerOutput {
        output: output.into(),
        context: ctx.clone(),
    })
}

fn resolve_or_deny(ctx: &ExecutionContext, cmd: &str, raw: &str) -> Result<PathBuf, String> {
    ctx.resolve(raw)
        .map_err(|_| format!("{cmd}: {raw}: No such file or directory\n"))
}

fn read_capped(path: &std::path::Path, cmd: &str, raw: &str) -> Result<String, String> {
    let metadata = std::fs::metadata(path).map_err(|_| not_found(cmd, raw))?;
    if metadata.len() > MAX_READ_BYTES {
        return Err(format!("{cmd}: {raw}: file too large\n"));
    }
    let bytes = std::fs::read(path).map_err(|_| not_found(cmd, raw))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolves `file` (validated) or falls back to the context's pending
/// stdin when no file argument is given — the shape every reading handler
/// (`cat`, `head`, `tail`, `wc`, `grep`) shares.
fn read_source(file: Option<&str>, ctx: &ExecutionContext, cmd: &str) -> Result<String, String> {
    match file {
        Some(raw) => {
            let resolved = resolve_or_deny(ctx, cmd, raw)?;
            read_capped(&resolved, cmd, raw)
        }
        None => Ok(ctx.stdin().unwrap_or("").to_string()),
    }
}

fn not_found(cmd: &str, raw: &str) -> String {
    format!("{cmd}: {raw}: No such file or directory\n")
}

/// Re-validates an already-resolved path; used when walking a directory
/// tree (`find`) where each entry must independently clear the sandbox.
fn still_contained(path: &std::path::Path, ctx: &ExecutionContext) -> bool {
    validate_path(&path.to_string_lossy(), ctx.sandbox(), None).is_ok()
}
