//! Turns a token stream into the flat-pipe command tree.

use crate::command::{ArgAtom, CommandIdentity, CommandName, CommandNode, Redirect};
use crate::tokenizer::{Token, TokenizeError, tokenize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    EmptyCommand,
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error("redirect operator at end of input with no target")]
    DanglingRedirect,
    #[error("pipe with no command following it")]
    DanglingPipe,
}

/// Parses a full command line into its head node. `tokenize ∘ parse` runs in
/// `O(n)` in the token count, via one forward pass with an explicit
/// accumulator — never unbounded recursion.
pub fn parse(input: &str) -> Result<CommandNode, ParseError> {
    let tokens = tokenize(input)?;
    parse_tokens(&tokens)
}

fn parse_tokens(tokens: &[Token]) -> Result<CommandNode, ParseError> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyCommand);
    }

    // Split on top-level pipes first. Chain tokens (&&, ||, ;) are left
    // untouched inside each segment; downstream stages don't consume them
    // yet, so the parser's only obligation is not to choke on them.
    let segments = split_on_pipe(tokens)?;

    let mut nodes = Vec::with_capacity(segments.len());
    for segment in &segments {
        nodes.push(parse_segment(segment)?);
    }

    let mut head = nodes.remove(0);
    head.pipes = nodes;
    Ok(head)
}

fn split_on_pipe(tokens: &[Token]) -> Result<Vec<&[Token]>, ParseError> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        if *token == Token::Pipe {
            if i == start {
                return Err(ParseError::DanglingPipe);
            }
            segments.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    if start >= tokens.len() {
        return Err(ParseError::DanglingPipe);
    }
    segments.push(&tokens[start..]);
    Ok(segments)
}

fn parse_segment(tokens: &[Token]) -> Result<CommandNode, ParseError> {
    let mut iter = tokens.iter();
    let head_word = match iter.next() {
        Some(Token::Word(word)) => word.clone(),
        Some(Token::Glob(word)) => word.clone(),
        _ => return Err(ParseError::EmptyCommand),
    };

    let identity = match CommandName::lookup(&head_word) {
        Some(name) => CommandIdentity::Known(name),
        None => CommandIdentity::Unknown(head_word),
    };

    let mut node = CommandNode::new(identity);

    while let Some(token) = iter.next() {
        match token {
            Token::Word(text) => node.args.push(ArgAtom::Literal(text.clone())),
            Token::Glob(text) => node.args.push(ArgAtom::Glob(text.clone())),
            Token::Redirect(kind) => {
                let target = match iter.next() {
                    Some(Token::Word(text)) => ArgAtom::Literal(text.clone()),
                    Some(Token::Glob(text)) => ArgAtom::Glob(text.clone()),
                    _ => return Err(ParseError::DanglingRedirect),
                };
                node.redirects.push(Redirect { kind: *kind, target });
            }
            Token::Chain(_) => {
                // Not consumed by this executor; parsing must not crash.
            }
            Token::Pipe => unreachable!("pipes are split out before parse_segment runs"),
        }
    }

    Ok(node)
}
