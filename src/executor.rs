//! Drives one pipeline: dispatches each stage to its handler, threads
//! stdin and the running context between stages, and hands the final
//! stage's output to the redirector.

use thiserror::Error;

use crate::command::{CommandIdentity, CommandNode};
use crate::context::ExecutionContext;
use crate::handlers;
use crate::redirector;

/// The number of commands in a pipeline, successors plus head, may not
/// exceed this.
const MAX_PIPELINE_DEPTH: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("pipeline too deep: {0} commands (max 10)\n")]
    PipelineTooDeep(usize),
    #[error("bash: {0}: command not found\n")]
    UnknownCommand(String),
    #[error("{0}")]
    Handler(String),
    #[error("{0}")]
    Redirect(String),
}

/// Runs `node` (already expanded) against `ctx`, returning the pipeline's
/// reported output and the context carried forward — `stdin` cleared so it
/// never leaks into a later top-level call.
pub fn execute(
    node: &CommandNode,
    ctx: &ExecutionContext,
) -> Result<(String, ExecutionContext), ExecutorError> {
    let depth = node.pipeline_len();
    if depth > MAX_PIPELINE_DEPTH {
        tracing::warn!(depth, "pipeline exceeded max depth, rejecting");
        return Err(ExecutorError::PipelineTooDeep(depth));
    }

    let (mut last_output, mut running_ctx) = run_stage(node, ctx)?;
    for successor in &node.pipes {
        let fed_ctx = running_ctx.with_stdin(Some(last_output));
        let (stage_output, next_ctx) = run_stage(successor, &fed_ctx)?;
        last_output = stage_output;
        running_ctx = next_ctx;
    }

    let redirect_target = node.redirect_target();
    redirector::redirect(&redirect_target.redirects, &last_output, &running_ctx)
        .map_err(|err| ExecutorError::Redirect(err.to_string()))?;

    let redirected_to_stdout = redirect_target.redirects.iter().any(|r| r.kind.is_stdout());
    let reported_output = if redirected_to_stdout {
        String::new()
    } else {
        last_output
    };

    Ok((reported_output, running_ctx.without_stdin()))
}

fn run_stage(
    node: &CommandNode,
    ctx: &ExecutionContext,
) -> Result<(String, ExecutionContext), ExecutorError> {
    match &node.identity {
        CommandIdentity::Unknown(name) => Err(ExecutorError::UnknownCommand(name.clone())),
        CommandIdentity::Known(name) => {
            let handler = handlers::lookup(*name);
            let args: Vec<String> = node.args.iter().map(|atom| atom.text().to_string()).collect();
            match handler(&args, ctx) {
                Ok(output) => Ok((output.output, output.context)),
                Err(message) => Err(ExecutorError::Handler(message)),
            }
        }
    }
}
