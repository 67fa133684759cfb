//! Line reader over a file that another process appends to.
//!
//! Only complete lines are returned. A trailing fragment without `\n` stays
//! in the file until its terminator arrives and is picked up on a later pass.

use std::fs::{File, Metadata};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::config::CursorMode;
use crate::error::BridgeError;

pub struct InboxReader {
    path: PathBuf,
    file: File,
    mode: CursorMode,
    offset: u64,
}

impl InboxReader {
    pub fn open(path: &Path, mode: CursorMode) -> Result<Self, BridgeError> {
        let file = File::open(path).map_err(|source| BridgeError::OpenInbox {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            mode,
            offset: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset just past the last complete line returned in tail mode.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Returns every complete line currently available, terminators included.
    pub fn read_available(&mut self) -> Result<Vec<String>, BridgeError> {
        self.follow_rotation()?;
        let len = self
            .file
            .metadata()
            .map_err(|source| self.read_error(source))?
            .len();

        let start = match self.mode {
            CursorMode::Rescan => 0,
            CursorMode::Tail if len < self.offset => {
                tracing::warn!(
                    path = %self.path.display(),
                    offset = self.offset,
                    len,
                    "Inbox shrank, restarting from the beginning"
                );
                0
            }
            CursorMode::Tail => self.offset,
        };

        self.file
            .seek(SeekFrom::Start(start))
            .map_err(|source| self.read_error(source))?;
        let mut bytes = Vec::new();
        self.file
            .read_to_end(&mut bytes)
            .map_err(|source| self.read_error(source))?;

        let Some(last_newline) = bytes.iter().rposition(|&b| b == b'\n') else {
            self.offset = start;
            return Ok(Vec::new());
        };
        let complete = &bytes[..=last_newline];
        self.offset = start + complete.len() as u64;

        Ok(complete
            .split_inclusive(|&b| b == b'\n')
            .map(|line| String::from_utf8_lossy(line).into_owned())
            .collect())
    }

    /// Reopens the inbox when the path now names a different file than the
    /// open handle, e.g. after the peer renamed a new file over it.
    ///
    /// A missing path keeps the current handle; the peer may be mid-rename.
    fn follow_rotation(&mut self) -> Result<(), BridgeError> {
        let Ok(on_disk) = std::fs::metadata(&self.path) else {
            return Ok(());
        };
        let open = self
            .file
            .metadata()
            .map_err(|source| self.read_error(source))?;
        if same_file(&on_disk, &open) {
            return Ok(());
        }

        self.file = File::open(&self.path).map_err(|source| self.read_error(source))?;
        tracing::warn!(
            path = %self.path.display(),
            offset = self.offset,
            "Inbox was replaced, restarting from the beginning"
        );
        self.offset = 0;
        Ok(())
    }

    fn read_error(&self, source: std::io::Error) -> BridgeError {
        BridgeError::ReadInbox {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(_a: &Metadata, _b: &Metadata) -> bool {
    true
}
