//! Output files that receive dispatched prompts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::BridgeError;
use crate::protocol::{PromptKind, QUIT_MARKER};

/// A file written one flushed line at a time.
pub struct LineSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LineSink {
    /// Creates or truncates the file at `path`.
    pub fn create(path: &Path) -> Result<Self, BridgeError> {
        let file = File::create(path).map_err(|source| BridgeError::OpenSink {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn write_line(&mut self, line: &str) -> Result<(), BridgeError> {
        self.write_raw(line)?;
        self.write_raw("\n")
    }

    /// Writes `text` as-is and flushes.
    pub fn write_raw(&mut self, text: &str) -> Result<(), BridgeError> {
        self.writer
            .write_all(text.as_bytes())
            .and_then(|()| self.writer.flush())
            .map_err(|source| BridgeError::WriteSink {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes a header followed by each line.
    pub fn write_prompt(&mut self, header: &str, lines: &[String]) -> Result<(), BridgeError> {
        self.write_line(header)?;
        for line in lines {
            self.write_line(line)?;
        }
        Ok(())
    }

    fn close(mut self) -> Result<(), BridgeError> {
        self.writer.flush().map_err(|source| BridgeError::WriteSink {
            path: self.path.clone(),
            source,
        })
    }
}

/// The outbox (sink A) and the mirror (sink B).
pub struct Sinks {
    outbox: Option<LineSink>,
    outbox_path: PathBuf,
    mirror: LineSink,
}

impl Sinks {
    pub fn open(outbox: &Path, mirror: &Path) -> Result<Self, BridgeError> {
        Ok(Self {
            outbox: Some(LineSink::create(outbox)?),
            outbox_path: outbox.to_path_buf(),
            mirror: LineSink::create(mirror)?,
        })
    }

    pub fn is_outbox_open(&self) -> bool {
        self.outbox.is_some()
    }

    /// Writes the prompt's header and lines to both sinks, outbox first.
    pub fn dispatch(&mut self, kind: PromptKind, lines: &[String]) -> Result<(), BridgeError> {
        let header = kind.header();
        let outbox = self.outbox.as_mut().ok_or_else(|| BridgeError::SinkClosed {
            path: self.outbox_path.clone(),
        })?;
        outbox.write_prompt(header, lines)?;
        self.mirror.write_prompt(header, lines)
    }

    /// Writes the quit marker to the mirror and closes the outbox.
    pub fn finish(&mut self) -> Result<(), BridgeError> {
        self.mirror.write_raw(QUIT_MARKER)?;
        match self.outbox.take() {
            Some(outbox) => outbox.close(),
            None => Ok(()),
        }
    }
}
