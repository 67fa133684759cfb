//! Peer side of the bridge: writes prompts to the inbox and reads replies
//! from the outbox.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command as ProcessCommand, ExitStatus};
use std::time::{Duration, Instant};

use crate::config::CursorMode;
use crate::error::BridgeError;
use crate::inbox::InboxReader;
use crate::protocol::{is_reserved, strip_terminator, Command};

const WAIT_POLL: Duration = Duration::from_millis(20);

/// Appends prompts to an inbox file.
pub struct InboxWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl InboxWriter {
    /// Opens `path` for appending, creating it if missing.
    pub fn append(path: &Path) -> Result<Self, BridgeError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| BridgeError::OpenSink {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_file(path, file))
    }

    /// Creates or truncates `path`.
    pub fn create(path: &Path) -> Result<Self, BridgeError> {
        let file = File::create(path).map_err(|source| BridgeError::OpenSink {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_file(path, file))
    }

    fn from_file(path: &Path, file: File) -> Self {
        Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        }
    }

    /// Writes each data line followed by the command line, then flushes once.
    ///
    /// Lines are validated before anything is written.
    pub fn send_prompt(&mut self, command: Command, lines: &[String]) -> Result<(), BridgeError> {
        if let Some(line) = lines.iter().find(|line| is_reserved(line)) {
            return Err(BridgeError::InvalidPromptLine { line: line.clone() });
        }

        let mut payload = String::new();
        for line in lines {
            payload.push_str(line);
            payload.push('\n');
        }
        payload.push_str(command.literal());
        payload.push('\n');

        self.writer
            .write_all(payload.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| BridgeError::WriteSink {
                path: self.path.clone(),
                source,
            })
    }
}

/// Drives a bridge through its files, optionally owning the bridge process.
pub struct BridgeClient {
    inbox: InboxWriter,
    replies: InboxReader,
    child: Option<Child>,
}

impl BridgeClient {
    /// Truncates the inbox, creates an empty outbox and starts reading it.
    pub fn create(inbox: &Path, outbox: &Path) -> Result<Self, BridgeError> {
        let inbox = InboxWriter::create(inbox)?;
        File::create(outbox).map_err(|source| BridgeError::OpenSink {
            path: outbox.to_path_buf(),
            source,
        })?;
        let replies = InboxReader::open(outbox, CursorMode::Tail)?;
        Ok(Self {
            inbox,
            replies,
            child: None,
        })
    }

    /// Starts the bridge as a child process.
    pub fn spawn<I, S>(&mut self, program: &Path, args: I) -> Result<(), BridgeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let child = ProcessCommand::new(program)
            .args(args)
            .spawn()
            .map_err(|source| BridgeError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        tracing::info!(program = %program.display(), pid = child.id(), "Bridge process started");
        self.child = Some(child);
        Ok(())
    }

    /// Whether the spawned bridge is still running.
    pub fn is_alive(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Waits up to `timeout` for the spawned bridge to exit.
    ///
    /// Returns `None` if there is no child or it is still running.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<ExitStatus>, BridgeError> {
        let Some(child) = self.child.as_mut() else {
            return Ok(None);
        };
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child
                .try_wait()
                .map_err(|source| BridgeError::ChildWait { source })?
            {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(WAIT_POLL);
        }
    }

    pub fn send_prompt(&mut self, command: Command, lines: &[String]) -> Result<(), BridgeError> {
        self.inbox.send_prompt(command, lines)
    }

    pub fn build(&mut self, lines: &[String]) -> Result<(), BridgeError> {
        self.send_prompt(Command::Build, lines)
    }

    pub fn test(&mut self, lines: &[String]) -> Result<(), BridgeError> {
        self.send_prompt(Command::Test, lines)
    }

    pub fn quit(&mut self) -> Result<(), BridgeError> {
        self.send_prompt(Command::Quit, &[])
    }

    /// Outbox lines written since the previous call, terminators stripped.
    pub fn read_replies(&mut self) -> Result<Vec<String>, BridgeError> {
        Ok(self
            .replies
            .read_available()?
            .iter()
            .map(|raw| strip_terminator(raw).to_string())
            .collect())
    }
}

impl Drop for BridgeClient {
    fn drop(&mut self) {
        if let Some(child) = self.child.as_mut() {
            if matches!(child.try_wait(), Ok(None)) {
                let _ = child.kill();
                let _ = child.wait();
            }
        }
    }
}
