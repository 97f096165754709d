//! The command tree produced by the parser and consumed by the executor.

use std::fmt;

/// The closed set of command names the dome recognises. Anything else comes
/// back from the parser as [`CommandName::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Cat,
    Cd,
    Cp,
    Date,
    Echo,
    False,
    Find,
    Grep,
    Head,
    Ls,
    Mkdir,
    Mv,
    Pwd,
    Rm,
    Tail,
    Touch,
    True,
    Wc,
    Which,
}

impl CommandName {
    /// All recognised names, newest-last. Kept in one place so the parser's
    /// lookup and the executor's handler registry can never drift apart.
    pub const ALL: &'static [(&'static str, CommandName)] = &[
        ("cat", CommandName::Cat),
        ("cd", CommandName::Cd),
        ("cp", CommandName::Cp),
        ("date", CommandName::Date),
        ("echo", CommandName::Echo),
        ("false", CommandName::False),
        ("find", CommandName::Find),
        ("grep", CommandName::Grep),
        ("head", CommandName::Head),
        ("ls", CommandName::Ls),
        ("mkdir", CommandName::Mkdir),
        ("mv", CommandName::Mv),
        ("pwd", CommandName::Pwd),
        ("rm", CommandName::Rm),
        ("tail", CommandName::Tail),
        ("touch", CommandName::Touch),
        ("true", CommandName::True),
        ("wc", CommandName::Wc),
        ("which", CommandName::Which),
    ];

    pub fn lookup(word: &str) -> Option<CommandName> {
        CommandName::ALL
            .iter()
            .find(|(name, _)| *name == word)
            .map(|(_, command)| *command)
    }

    pub fn as_str(self) -> &'static str {
        CommandName::ALL
            .iter()
            .find(|(_, command)| *command == self)
            .map(|(name, _)| *name)
            .expect("every CommandName variant has an ALL entry")
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command's identity: either one of the allowlisted names, or the
/// original text of a name the dome doesn't recognise. `Unknown` never
/// interns the string into a runtime symbol table, so hostile input can't
/// grow one without bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandIdentity {
    Known(CommandName),
    Unknown(String),
}

/// A single parsed argument. The parser preserves whether the source text
/// looked like a glob so the expander can tell `"*.txt"` (literal) apart
/// from `*.txt` (pattern) the way bash does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgAtom {
    Literal(String),
    Glob(String),
}

impl ArgAtom {
    /// The atom's text regardless of its kind, e.g. for building a new atom
    /// after tilde expansion without losing the glob tag.
    pub fn text(&self) -> &str {
        match self {
            ArgAtom::Literal(text) | ArgAtom::Glob(text) => text,
        }
    }

    pub fn with_text(&self, text: String) -> ArgAtom {
        match self {
            ArgAtom::Literal(_) => ArgAtom::Literal(text),
            ArgAtom::Glob(_) => ArgAtom::Glob(text),
        }
    }

    pub fn is_glob(&self) -> bool {
        matches!(self, ArgAtom::Glob(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectKind {
    StdoutTruncate,
    StdoutAppend,
    StderrTruncate,
    StderrAppend,
    StdinFrom,
}

impl RedirectKind {
    pub fn is_stdout(self) -> bool {
        matches!(self, RedirectKind::StdoutTruncate | RedirectKind::StdoutAppend)
    }

    pub fn is_append(self) -> bool {
        matches!(self, RedirectKind::StdoutAppend | RedirectKind::StderrAppend)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub kind: RedirectKind,
    pub target: ArgAtom,
}

/// One node of the flat pipe list. A pipe-successor node always has an empty
/// `pipes` field — only the head expresses the pipeline's depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandNode {
    pub identity: CommandIdentity,
    pub args: Vec<ArgAtom>,
    pub redirects: Vec<Redirect>,
    pub pipes: Vec<CommandNode>,
}

impl CommandNode {
    pub fn new(identity: CommandIdentity) -> Self {
        Self {
            identity,
            args: Vec::new(),
            redirects: Vec::new(),
            pipes: Vec::new(),
        }
    }

    /// Number of commands in the pipeline, including this head.
    pub fn pipeline_len(&self) -> usize {
        1 + self.pipes.len()
    }

    /// The command whose redirects actually take effect: the last pipe
    /// successor, or this node itself if there are no successors.
    pub fn redirect_target(&self) -> &CommandNode {
        self.pipes.last().unwrap_or(self)
    }
}
