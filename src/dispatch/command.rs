//! Chat command parsing

/// Prefix that marks a chat message as a command.
pub const COMMAND_PREFIX: char = '!';

/// A `!name args...` message split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Command word including the prefix, e.g. `!hunt`.
    pub name: String,
    /// Remaining words joined by single spaces.
    pub args: String,
}

impl Invocation {
    /// Split a raw message. Returns `None` for messages without the prefix.
    pub fn parse(content: &str) -> Option<Self> {
        if !content.starts_with(COMMAND_PREFIX) {
            return None;
        }
        let mut words = content.split_whitespace();
        let name = words.next()?.to_string();
        let args = words.collect::<Vec<_>>().join(" ");
        Some(Self { name, args })
    }
}

/// A recognised command with its required arguments present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Hunt { topic: String },
    Graph { topic: String },
    Analyze { text: String },
    Ping,
    Help,
}

impl Command {
    /// Resolve an invocation. Unknown commands and argument-taking commands
    /// invoked without arguments yield `None`.
    pub fn from_invocation(invocation: &Invocation) -> Option<Self> {
        let args = invocation.args.clone();
        match (invocation.name.as_str(), args.is_empty()) {
            ("!hunt", false) => Some(Command::Hunt { topic: args }),
            ("!graph", false) => Some(Command::Graph { topic: args }),
            ("!analyze", false) => Some(Command::Analyze { text: args }),
            ("!ping", _) => Some(Command::Ping),
            ("!help", _) => Some(Command::Help),
            _ => None,
        }
    }

    /// Metric label for this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Hunt { .. } => "hunt",
            Command::Graph { .. } => "graph",
            Command::Analyze { .. } => "analyze",
            Command::Ping => "ping",
            Command::Help => "help",
        }
    }
}
