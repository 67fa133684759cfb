//! Redirection of the process's own standard streams to files.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::config::DiagnosticsConfig;
use crate::error::BridgeError;

/// Applies every configured redirection. Call before logging is set up so
/// that stderr output lands in the redirected file.
pub fn redirect_stdio(config: &DiagnosticsConfig) -> Result<(), BridgeError> {
    if let Some(path) = &config.stdout {
        let file = create(path, "stdout")?;
        redirect(&file, Stream::Stdout, path)?;
    }
    if let Some(path) = &config.stderr {
        let file = create(path, "stderr")?;
        redirect(&file, Stream::Stderr, path)?;
    }
    if let Some(path) = &config.stdin {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|source| redirect_error("stdin", path, source))?;
        redirect(&file, Stream::Stdin, path)?;
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Stdin => "stdin",
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

fn create(path: &Path, stream: &'static str) -> Result<File, BridgeError> {
    File::create(path).map_err(|source| redirect_error(stream, path, source))
}

fn redirect_error(stream: &'static str, path: &Path, source: std::io::Error) -> BridgeError {
    BridgeError::Redirect {
        stream,
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(unix)]
fn redirect(file: &File, stream: Stream, path: &Path) -> Result<(), BridgeError> {
    use std::os::fd::AsRawFd;

    let target = match stream {
        Stream::Stdin => libc::STDIN_FILENO,
        Stream::Stdout => libc::STDOUT_FILENO,
        Stream::Stderr => libc::STDERR_FILENO,
    };
    // dup2 leaves `target` pointing at the file after `file` is dropped.
    let rc = unsafe { libc::dup2(file.as_raw_fd(), target) };
    if rc == -1 {
        return Err(redirect_error(
            stream.name(),
            path,
            std::io::Error::last_os_error(),
        ));
    }
    Ok(())
}

#[cfg(not(unix))]
fn redirect(_file: &File, stream: Stream, path: &Path) -> Result<(), BridgeError> {
    tracing::warn!(
        stream = stream.name(),
        path = %path.display(),
        "Stream redirection is only supported on unix, ignoring"
    );
    Ok(())
}
