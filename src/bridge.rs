//! The polling loop: read inbox lines, buffer data, dispatch on commands.

use std::io::Write;
use std::time::Duration;

use crate::config::Config;
use crate::error::BridgeError;
use crate::inbox::InboxReader;
use crate::prompt::PromptBuffer;
use crate::protocol::{strip_terminator, InboxLine, PromptKind};
use crate::shutdown::ShutdownHandle;
use crate::sink::Sinks;

/// Result of a single polling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// All available lines were handled; poll again later.
    Continue { lines: usize, dispatched: usize },
    /// A `quit` line was seen. Lines after it were not processed.
    Quit,
}

/// Why [`Bridge::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    Cancelled,
}

/// Owns the inbox reader, the pending prompt and both sinks.
pub struct Bridge {
    reader: InboxReader,
    prompt: PromptBuffer,
    sinks: Sinks,
    interval: Duration,
    separator: char,
    echo: bool,
}

impl Bridge {
    /// Opens the inbox, then creates the sinks.
    ///
    /// The inbox is opened first so a missing inbox does not truncate
    /// existing sink files.
    pub fn open(config: &Config) -> Result<Self, BridgeError> {
        let reader = InboxReader::open(&config.inbox.path, config.inbox.cursor)?;
        let sinks = Sinks::open(&config.sinks.outbox, &config.sinks.mirror)?;
        tracing::info!(
            inbox = %config.inbox.path.display(),
            outbox = %config.sinks.outbox.display(),
            mirror = %config.sinks.mirror.display(),
            cursor = ?config.inbox.cursor,
            "Bridge opened"
        );
        Ok(Self {
            reader,
            prompt: PromptBuffer::new(),
            sinks,
            interval: Duration::from_millis(config.polling.interval_ms),
            separator: config.polling.separator,
            echo: config.echo,
        })
    }

    pub fn prompt(&self) -> &PromptBuffer {
        &self.prompt
    }

    /// Reads and handles every line currently available in the inbox.
    pub fn poll_once(&mut self) -> Result<PassOutcome, BridgeError> {
        let raw_lines = self.reader.read_available()?;
        let mut dispatched = 0;

        for (index, raw) in raw_lines.iter().enumerate() {
            if self.echo {
                echo_line(strip_terminator(raw))?;
            }

            match InboxLine::decode(raw) {
                InboxLine::Quit => {
                    self.quit(raw_lines.len() - index - 1)?;
                    return Ok(PassOutcome::Quit);
                }
                InboxLine::Prompt(kind) => {
                    self.dispatch(kind)?;
                    dispatched += 1;
                }
                InboxLine::Data(line) => {
                    tracing::debug!(line = %line, "Buffered prompt line");
                    self.prompt.push(line);
                }
            }
        }

        Ok(PassOutcome::Continue {
            lines: raw_lines.len(),
            dispatched,
        })
    }

    /// Polls until `quit` arrives or `shutdown` is signaled.
    ///
    /// The first error ends the loop and is returned to the caller.
    pub async fn run(&mut self, shutdown: &ShutdownHandle) -> Result<ExitReason, BridgeError> {
        loop {
            if shutdown.is_shutting_down() {
                return Ok(ExitReason::Cancelled);
            }

            if self.poll_once()? == PassOutcome::Quit {
                return Ok(ExitReason::Quit);
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.wait() => return Ok(ExitReason::Cancelled),
            }
        }
    }

    fn dispatch(&mut self, kind: PromptKind) -> Result<(), BridgeError> {
        tracing::info!(
            command = %kind.command(),
            lines = self.prompt.len(),
            prompt = ?self.prompt.joined(self.separator),
            "Dispatching prompt"
        );
        let lines = self.prompt.take();
        self.sinks.dispatch(kind, &lines)
    }

    fn quit(&mut self, skipped: usize) -> Result<(), BridgeError> {
        if !self.prompt.is_empty() {
            tracing::warn!(
                lines = self.prompt.len(),
                "Discarding pending prompt on quit"
            );
            self.prompt.take();
        }
        if skipped > 0 {
            tracing::warn!(skipped, "Ignoring inbox lines after quit");
        }
        self.sinks.finish()?;
        tracing::info!(inbox = %self.reader.path().display(), "Bridge finished");
        Ok(())
    }
}

fn echo_line(line: &str) -> Result<(), BridgeError> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)
        .and_then(|()| stdout.flush())
        .map_err(|source| BridgeError::Echo { source })
}
