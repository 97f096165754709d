//! Handlers that mutate the dome: `mkdir`, `touch`, `rm`, `cp`, `mv`.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{HandlerResult, not_found, ok, resolve_or_deny};
use crate::context::ExecutionContext;

pub fn mkdir(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let mut recursive = false;
    let mut rest = args;
    if rest.first().map(String::as_str) == Some("-p") {
        recursive = true;
        rest = &rest[1..];
    }

    let raw = rest
        .first()
        .ok_or_else(|| "usage: mkdir [-p] path\n".to_string())?;
    let resolved = resolve_or_deny(ctx, "mkdir", raw)?;

    let result = if recursive {
        std::fs::create_dir_all(&resolved)
    } else {
        std::fs::create_dir(&resolved)
    };
    result.map_err(|_| not_found("mkdir", raw))?;
    ok(String::new(), ctx)
}

pub fn touch(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let raw = args
        .first()
        .ok_or_else(|| "usage: touch path\n".to_string())?;
    let resolved = resolve_or_deny(ctx, "touch", raw)?;

    if resolved.exists() {
        let file = std::fs::File::open(&resolved).map_err(|_| not_found("touch", raw))?;
        file.set_modified(SystemTime::now())
            .map_err(|_| not_found("touch", raw))?;
    } else {
        std::fs::File::create(&resolved).map_err(|_| not_found("touch", raw))?;
    }
    ok(String::new(), ctx)
}

/// Soft-deletes by moving into a dome-local trash directory rather than
/// unlinking — a handler-side policy, not part of the core contract.
pub fn rm(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let mut recursive = false;
    let mut rest = args;
    if rest.first().map(String::as_str) == Some("-r") {
        recursive = true;
        rest = &rest[1..];
    }

    let raw = rest
        .first()
        .ok_or_else(|| "usage: rm [-r] path\n".to_string())?;
    let resolved = resolve_or_deny(ctx, "rm", raw)?;
    let metadata =
        std::fs::symlink_metadata(&resolved).map_err(|_| not_found("rm", raw))?;
    if metadata.is_dir() && !recursive {
        return Err(format!("rm: {raw}: Is a directory\n"));
    }

    let trash_dir = trash_dir_for(ctx);
    std::fs::create_dir_all(&trash_dir).map_err(|_| not_found("rm", raw))?;
    let destination = unique_trash_destination(&trash_dir, &resolved);
    std::fs::rename(&resolved, &destination).map_err(|_| not_found("rm", raw))?;
    ok(String::new(), ctx)
}

fn trash_dir_for(ctx: &ExecutionContext) -> PathBuf {
    ctx.sandbox().roots()[0].join(".dome_trash")
}

fn unique_trash_destination(trash_dir: &Path, source: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    trash_dir.join(format!("{nanos}-{name}"))
}

pub fn cp(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let (src_raw, dst_raw) = two_paths(args, "cp")?;
    let src = resolve_or_deny(ctx, "cp", src_raw)?;
    let dst = resolve_or_deny(ctx, "cp", dst_raw)?;
    std::fs::copy(&src, &dst).map_err(|_| not_found("cp", src_raw))?;
    ok(String::new(), ctx)
}

pub fn mv(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let (src_raw, dst_raw) = two_paths(args, "mv")?;
    let src = resolve_or_deny(ctx, "mv", src_raw)?;
    let dst = resolve_or_deny(ctx, "mv", dst_raw)?;
    std::fs::rename(&src, &dst).map_err(|_| not_found("mv", src_raw))?;
    ok(String::new(), ctx)
}

fn two_paths<'a>(args: &'a [String], cmd: &str) -> Result<(&'a str, &'a str), String> {
    match (args.first(), args.get(1)) {
        (Some(a), Some(b)) => Ok((a.as_str(), b.as_str())),
        _ => Err(format!("usage: {cmd} src dst\n")),
    }
}
