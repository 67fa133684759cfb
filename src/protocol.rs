//! Line protocol spoken over the inbox.
//!
//! A line is either one of three control words or free-form data. Matching
//! is exact equality on the whole line after its terminator is removed.

use std::fmt;

/// Terminator written to the mirror sink on `quit`.
pub const QUIT_MARKER: &str = "BYE";

/// Control word recognized on an inbox line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Command {
    Build,
    Test,
    Quit,
}

impl Command {
    /// The literal that must appear alone on a line.
    pub fn literal(self) -> &'static str {
        match self {
            Command::Build => "build",
            Command::Test => "test",
            Command::Quit => "quit",
        }
    }

    pub fn from_literal(line: &str) -> Option<Self> {
        match line {
            "build" => Some(Command::Build),
            "test" => Some(Command::Test),
            "quit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// The commands that hand the buffered prompt to the sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Build,
    Test,
}

impl PromptKind {
    /// Header line written before the prompt lines.
    pub fn header(self) -> &'static str {
        match self {
            PromptKind::Build => "Received build prompt",
            PromptKind::Test => "Received test prompt",
        }
    }

    pub fn command(self) -> Command {
        match self {
            PromptKind::Build => Command::Build,
            PromptKind::Test => Command::Test,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// A decoded inbox line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxLine {
    Prompt(PromptKind),
    Quit,
    Data(String),
}

impl InboxLine {
    /// Decodes a raw line, stripping one trailing `\n` or `\r\n`.
    pub fn decode(raw: &str) -> Self {
        let line = strip_terminator(raw);
        match Command::from_literal(line) {
            Some(Command::Build) => InboxLine::Prompt(PromptKind::Build),
            Some(Command::Test) => InboxLine::Prompt(PromptKind::Test),
            Some(Command::Quit) => InboxLine::Quit,
            None => InboxLine::Data(line.to_string()),
        }
    }
}

/// Removes a single trailing line terminator, if present.
pub fn strip_terminator(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

/// True when `line` would be read back as something other than one data line.
pub fn is_reserved(line: &str) -> bool {
    Command::from_literal(line).is_some() || line.contains(['\n', '\r'])
}
