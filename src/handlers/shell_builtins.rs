//! Handlers with no filesystem payload of their own: shell state and
//! trivial status commands.

use chrono::Utc;

use super::{HandlerResult, not_found, ok, resolve_or_deny};
use crate::context::ExecutionContext;

pub fn pwd(_args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    ok(format!("{}\n", ctx.current_dir().display()), ctx)
}

pub fn cd(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let raw = args.first().map(String::as_str);
    let resolved = match raw {
        Some(path) => resolve_or_deny(ctx, "cd", path)?,
        None => ctx.sandbox().home().to_path_buf(),
    };

    if !resolved.is_dir() {
        return Err(not_found("cd", raw.unwrap_or("~")));
    }

    Ok(super::HandlerOutput {
        output: String::new(),
        context: ctx.with_current_dir(resolved),
    })
}

pub fn echo(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let mut rest = args;
    let mut suppress_newline = false;
    if rest.first().map(String::as_str) == Some("-n") {
        suppress_newline = true;
        rest = &rest[1..];
    }

    let mut output = rest.join(" ");
    if !suppress_newline {
        output.push('\n');
    }
    ok(output, ctx)
}

pub fn run_true(_args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    ok(String::new(), ctx)
}

pub fn run_false(_args: &[String], _ctx: &ExecutionContext) -> HandlerResult {
    // Failure is signalled on the handler-error channel with no message —
    // `false` never writes to stdout or stderr.
    Err(String::new())
}

pub fn date(_args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let formatted = Utc::now().format("%a %b %e %H:%M:%S UTC %Y").to_string();
    ok(format!("{formatted}\n"), ctx)
}
