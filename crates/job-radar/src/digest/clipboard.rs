use std::io::{self, Write};
use std::process::{Command, Stdio};

use tracing::{info, warn};

use super::{render_plain_text, DailyDigest};

/// Destination for copied digest text. One attempt per call, no retry.
pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("no clipboard command configured")]
    Unconfigured,
    #[error("failed to launch clipboard command '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to hand text to clipboard command: {0}")]
    Write(#[from] io::Error),
    #[error("clipboard command exited with {0}")]
    Exit(std::process::ExitStatus),
}

/// Pipes text to an external command such as `wl-copy`, `pbcopy`, or `xclip -selection clipboard`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Splits a whitespace-separated command line. `None` when it is blank.
    pub fn from_command_line(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ClipboardError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let status = child.wait()?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError::Exit(status))
        }
    }
}

/// Stand-in used when no clipboard command is configured; every write fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unconfigured)
    }
}

/// Copies the plain-text rendering. Failures are logged and reported as `false`.
pub fn copy_digest(digest: &DailyDigest, clipboard: &dyn Clipboard) -> bool {
    match clipboard.write_text(&render_plain_text(digest)) {
        Ok(()) => {
            info!(date = %digest.date, "digest copied to clipboard");
            true
        }
        Err(err) => {
            warn!(date = %digest.date, error = %err, "failed to copy digest to clipboard");
            false
        }
    }
}
