//! Handlers that enumerate the dome: `ls`, `find`, `which`.

use glob::Pattern;
use walkdir::WalkDir;

use super::{HandlerResult, not_found, ok, resolve_or_deny, still_contained};
use crate::command::CommandName;
use crate::context::ExecutionContext;

pub fn ls(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let mut show_all = false;
    let mut long = false;
    let mut rest = args;
    while let Some(flag) = rest.first() {
        match flag.as_str() {
            "-a" => {
                show_all = true;
                rest = &rest[1..];
            }
            "-l" => {
                long = true;
                rest = &rest[1..];
            }
            _ => break,
        }
    }

    let raw = rest.first().map(String::as_str).unwrap_or(".");
    let resolved = resolve_or_deny(ctx, "ls", raw)?;
    let mut entries: Vec<std::fs::DirEntry> = std::fs::read_dir(&resolved)
        .map_err(|_| not_found("ls", raw))?
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut lines = Vec::new();
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_all && name.starts_with('.') {
            continue;
        }
        if long {
            let metadata = entry.metadata().map_err(|_| not_found("ls", raw))?;
            let kind = if metadata.is_dir() { 'd' } else { '-' };
            let perms = if metadata.is_dir() {
                "rwxr-xr-x"
            } else {
                "rw-r--r--"
            };
            lines.push(format!(
                "{kind}{perms} 1 dome dome {:>8} {name}",
                metadata.len()
            ));
        } else {
            lines.push(name);
        }
    }

    let mut output = lines.join("\n");
    if !lines.is_empty() {
        output.push('\n');
    }
    ok(output, ctx)
}

pub fn find(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let path_raw = args
        .first()
        .ok_or_else(|| "usage: find path [-name PATTERN]\n".to_string())?;

    let mut name_pattern = None;
    let mut idx = 1;
    while idx < args.len() {
        if args[idx] == "-name" {
            name_pattern = args.get(idx + 1).cloned();
            idx += 2;
        } else {
            idx += 1;
        }
    }
    let compiled_pattern = match &name_pattern {
        Some(pattern) => {
            Some(Pattern::new(pattern).map_err(|_| format!("find: invalid pattern: {pattern}\n"))?)
        }
        None => None,
    };

    let root = resolve_or_deny(ctx, "find", path_raw)?;
    let mut results = Vec::new();
    for entry in WalkDir::new(&root).into_iter().filter_map(Result::ok) {
        let path = entry.path();
        if !still_contained(path, ctx) {
            continue;
        }
        if let Some(pattern) = &compiled_pattern {
            let file_name = entry.file_name().to_string_lossy();
            if !pattern.matches(&file_name) {
                continue;
            }
        }
        results.push(path.to_string_lossy().into_owned());
    }
    results.sort();

    let mut output = results.join("\n");
    if !results.is_empty() {
        output.push('\n');
    }
    ok(output, ctx)
}

pub fn which(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let name = args
        .first()
        .ok_or_else(|| "usage: which name\n".to_string())?;
    let output = match CommandName::lookup(name) {
        Some(_) => format!("{name}\n"),
        None => String::new(),
    };
    ok(output, ctx)
}
