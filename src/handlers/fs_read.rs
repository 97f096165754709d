//! Handlers that read file content: `cat`, `head`, `tail`, `wc`, `grep`.

use regex::Regex;

use super::{HandlerResult, ok, read_source};
use crate::context::ExecutionContext;

pub fn cat(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    if args.is_empty() {
        return ok(ctx.stdin().unwrap_or("").to_string(), ctx);
    }

    let mut output = String::new();
    for raw in args {
        if raw == "-" {
            output.push_str(ctx.stdin().unwrap_or(""));
            continue;
        }
        output.push_str(&read_source(Some(raw.as_str()), ctx, "cat")?);
    }
    ok(output, ctx)
}

pub fn head(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    head_or_tail(args, ctx, "head", true)
}

pub fn tail(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    head_or_tail(args, ctx, "tail", false)
}

fn head_or_tail(
    args: &[String],
    ctx: &ExecutionContext,
    cmd: &'static str,
    from_start: bool,
) -> HandlerResult {
    let mut count = 10usize;
    let mut rest = args;
    if rest.first().map(String::as_str) == Some("-n") {
        let value = rest
            .get(1)
            .ok_or_else(|| format!("{cmd}: option requires an argument -- 'n'\n"))?;
        count = value
            .parse()
            .map_err(|_| format!("{cmd}: invalid number of lines: '{value}'\n"))?;
        rest = &rest[2..];
    }

    let content = read_source(rest.first().map(String::as_str), ctx, cmd)?;
    let lines: Vec<&str> = content.lines().collect();
    let selected: Vec<&str> = if from_start {
        lines.iter().take(count).copied().collect()
    } else {
        let start = lines.len().saturating_sub(count);
        lines[start..].to_vec()
    };

    let mut output = selected.join("\n");
    if !selected.is_empty() {
        output.push('\n');
    }
    ok(output, ctx)
}

enum WcMode {
    All,
    Lines,
    Words,
    Bytes,
}

pub fn wc(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let mut mode = WcMode::All;
    let mut rest = args;
    match rest.first().map(String::as_str) {
        Some("-l") => {
            mode = WcMode::Lines;
            rest = &rest[1..];
        }
        Some("-w") => {
            mode = WcMode::Words;
            rest = &rest[1..];
        }
        Some("-c") => {
            mode = WcMode::Bytes;
            rest = &rest[1..];
        }
        _ => {}
    }

    let content = read_source(rest.first().map(String::as_str), ctx, "wc")?;
    let lines = content.lines().count();
    let words = content.split_whitespace().count();
    let bytes = content.len();

    let output = match mode {
        WcMode::Lines => format!("{lines}\n"),
        WcMode::Words => format!("{words}\n"),
        WcMode::Bytes => format!("{bytes}\n"),
        WcMode::All => format!("{lines} {words} {bytes}\n"),
    };
    ok(output, ctx)
}

pub fn grep(args: &[String], ctx: &ExecutionContext) -> HandlerResult {
    let mut case_insensitive = false;
    let mut invert = false;
    let mut show_line_numbers = false;
    let mut idx = 0;
    while let Some(flag) = args.get(idx) {
        match flag.as_str() {
            "-i" => case_insensitive = true,
            "-v" => invert = true,
            "-n" => show_line_numbers = true,
            _ => break,
        }
        idx += 1;
    }

    let pattern_text = args
        .get(idx)
        .ok_or_else(|| "usage: grep [-i] [-v] [-n] PATTERN [file]\n".to_string())?;
    let file = args.get(idx + 1).map(String::as_str);

    let pattern_source = if case_insensitive {
        format!("(?i){pattern_text}")
    } else {
        pattern_text.clone()
    };
    let pattern = Regex::new(&pattern_source)
        .map_err(|_| format!("grep: invalid pattern: {pattern_text}\n"))?;

    let content = read_source(file, ctx, "grep")?;
    let mut output = String::new();
    for (i, line) in content.lines().enumerate() {
        if pattern.is_match(line) == invert {
            continue;
        }
        if show_line_numbers {
            output.push_str(&format!("{}:{}\n", i + 1, line));
        } else {
            output.push_str(line);
            output.push('\n');
        }
    }
    ok(output, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_validator::SandboxConfig;
    use tempfile::TempDir;

    fn ctx_with_data(temp: &TempDir) -> ExecutionContext {
        let lines: Vec<String> = (1..=10).map(|n| format!("line {n}")).collect();
        std::fs::write(temp.path().join("data.txt"), lines.join("\n") + "\n").unwrap();
        let sandbox = SandboxConfig::single_root(temp.path().to_path_buf()).unwrap();
        ExecutionContext::new(sandbox)
    }

    #[test]
    fn cat_concatenates_files_in_order() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.txt"), "a\n").unwrap();
        std::fs::write(temp.path().join("b.txt"), "b\n").unwrap();
        let sandbox = SandboxConfig::single_root(temp.path().to_path_buf()).unwrap();
        let ctx = ExecutionContext::new(sandbox);
        let out = cat(&["a.txt".into(), "b.txt".into()], &ctx).unwrap();
        assert_eq!(out.output, "a\nb\n");
    }

    #[test]
    fn cat_missing_file_reports_404() {
        let temp = TempDir::new().unwrap();
        let sandbox = SandboxConfig::single_root(temp.path().to_path_buf()).unwrap();
        let ctx = ExecutionContext::new(sandbox);
        let err = cat(&["missing.txt".into()], &ctx).unwrap_err();
        assert_eq!(err, "cat: missing.txt: No such file or directory\n");
    }

    #[test]
    fn head_default_is_first_ten_lines() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_data(&temp);
        let out = head(&["data.txt".into()], &ctx).unwrap();
        assert_eq!(out.output.lines().count(), 10);
    }

    #[test]
    fn head_dash_n_limits_output() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_data(&temp);
        let out = head(&["-n".into(), "5".into(), "data.txt".into()], &ctx).unwrap();
        assert_eq!(out.output, "line 1\nline 2\nline 3\nline 4\nline 5\n");
    }

    #[test]
    fn tail_dash_n_takes_last_lines() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_data(&temp);
        let out = tail(&["-n".into(), "3".into(), "data.txt".into()], &ctx).unwrap();
        assert_eq!(out.output, "line 8\nline 9\nline 10\n");
    }

    #[test]
    fn wc_dash_l_counts_lines() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_data(&temp);
        let out = wc(&["-l".into(), "data.txt".into()], &ctx).unwrap();
        assert_eq!(out.output, "10\n");
    }

    #[test]
    fn grep_matches_regex_pattern() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_with_data(&temp);
        let out = grep(&["line 1".into(), "data.txt".into()], &ctx).unwrap();
        assert_eq!(out.output, "line 1\nline 10\n");
    }

    #[test]
    fn grep_dash_v_inverts_match() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("f.txt"), "keep\nskip\nkeep\n").unwrap();
        let sandbox = SandboxConfig::single_root(temp.path().to_path_buf()).unwrap();
        let ctx = ExecutionContext::new(sandbox);
        let out = grep(&["-v".into(), "skip".into(), "f.txt".into()], &ctx).unwrap();
        assert_eq!(out.output, "keep\nkeep\n");
    }

    #[test]
    fn cat_reads_stdin_when_no_files_given() {
        let temp = TempDir::new().unwrap();
        let sandbox = SandboxConfig::single_root(temp.path().to_path_buf()).unwrap();
        let ctx = ExecutionContext::new(sandbox).with_stdin(Some("piped\n".to_string()));
        let out = cat(&[], &ctx).unwrap();
        assert_eq!(out.output, "piped\n");
    }
}
