//! Tilde and glob expansion over the parsed command tree.
//!
//! Runs once, after parsing and before execution, and never touches the
//! filesystem except to list directories for glob matches — every match it
//! produces is re-validated through the path validator before it reaches a
//! handler.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, glob_with};

use crate::command::{ArgAtom, CommandNode};
use crate::context::ExecutionContext;
use crate::path_validator::validate_path;

/// `**` recursion is bounded this many levels below a glob's fixed base.
const MAX_GLOB_DEPTH: usize = 100;

/// Expands every argument atom and redirect target of `node` and its pipe
/// successors, in place.
pub fn expand(node: &mut CommandNode, ctx: &ExecutionContext) {
    let home = ctx.sandbox().home();

    for atom in node.args.iter_mut() {
        let expanded = expand_tilde(atom.text(), home);
        *atom = atom.with_text(expanded);
    }
    for redirect in node.redirects.iter_mut() {
        let expanded = expand_tilde(redirect.target.text(), home);
        redirect.target = redirect.target.with_text(expanded);
    }

    node.args = expand_globs(&node.args, ctx);

    for successor in node.pipes.iter_mut() {
        expand(successor, ctx);
    }
}

fn expand_tilde(text: &str, home: &Path) -> String {
    if text == "~" {
        return home.to_string_lossy().into_owned();
    }
    if let Some(rest) = text.strip_prefix("~/") {
        let trimmed = rest.trim_start_matches('/');
        if trimmed.is_empty() {
            return home.to_string_lossy().into_owned();
        }
        return home.join(trimmed).to_string_lossy().into_owned();
    }
    text.to_string()
}

fn expand_globs(args: &[ArgAtom], ctx: &ExecutionContext) -> Vec<ArgAtom> {
    let mut expanded = Vec::with_capacity(args.len());
    for atom in args {
        match atom {
            ArgAtom::Literal(_) => expanded.push(atom.clone()),
            ArgAtom::Glob(pattern) => expanded.extend(expand_one_glob(pattern, ctx)),
        }
    }
    expanded
}

fn expand_one_glob(pattern: &str, ctx: &ExecutionContext) -> Vec<ArgAtom> {
    let original = ArgAtom::Glob(pattern.to_string());
    let is_absolute = Path::new(pattern).is_absolute();
    let (base_dir, had_leading_dot_slash) = if is_absolute {
        (PathBuf::new(), false)
    } else {
        (
            ctx.current_dir().to_path_buf(),
            pattern.starts_with("./"),
        )
    };

    let absolute_pattern = if is_absolute {
        PathBuf::from(pattern)
    } else {
        ctx.current_dir().join(pattern.trim_start_matches("./"))
    };

    let fixed_base = wildcard_free_prefix(&absolute_pattern);
    if validate_path(
        fixed_base.to_string_lossy().as_ref(),
        ctx.sandbox(),
        None,
    )
    .is_err()
    {
        return vec![original];
    }

    let basename_has_leading_dot = absolute_pattern
        .file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false);

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: !basename_has_leading_dot,
    };

    let entries = match glob_with(&absolute_pattern.to_string_lossy(), options) {
        Ok(paths) => paths,
        Err(_) => return vec![original],
    };

    let base_depth = fixed_base.components().count();
    let mut matches: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|path| path.components().count().saturating_sub(base_depth) <= MAX_GLOB_DEPTH)
        .filter(|path| validate_path(path.to_string_lossy().as_ref(), ctx.sandbox(), None).is_ok())
        .collect();

    if matches.is_empty() {
        return vec![original];
    }

    matches.sort_by(|a, b| a.as_os_str().as_encoded_bytes().cmp(b.as_os_str().as_encoded_bytes()));

    matches
        .into_iter()
        .map(|path| {
            let rendered = if is_absolute {
                path.to_string_lossy().into_owned()
            } else {
                let relative = path
                    .strip_prefix(ctx.current_dir())
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .into_owned();
                if had_leading_dot_slash {
                    format!("./{relative}")
                } else {
                    relative
                }
            };
            ArgAtom::Literal(rendered)
        })
        .collect()
}

/// The longest prefix of `path` containing no wildcard characters, i.e. the
/// directory the validator must clear before any listing is attempted.
fn wildcard_free_prefix(path: &Path) -> PathBuf {
    let mut base = PathBuf::new();
    for component in path.components() {
        let text = component.as_os_str().to_string_lossy();
        if text.chars().any(|c| matches!(c, '*' | '?' | '[' | ']')) {
            break;
        }
        base.push(component);
    }
    base
}
