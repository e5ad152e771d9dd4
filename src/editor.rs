//! Edit surfaces for the timesheet edit transaction
//!
//! The transaction only needs something that edits a file in place and
//! returns when it is done. `ExternalEditor` spawns the user's editor,
//! optionally inside a terminal emulator.

use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::config::EditorConfig;
use crate::error::{Error, Result};

/// Something that edits a file and blocks until the edit is finished
pub trait EditSurface {
    fn edit(&self, path: &Path) -> Result<()>;
}

/// Launches an external editor process
#[derive(Debug, Clone, Default)]
pub struct ExternalEditor {
    command: Option<String>,
    terminal: Option<String>,
}

impl ExternalEditor {
    pub fn new(command: Option<String>, terminal: Option<String>) -> Self {
        Self { command, terminal }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.command.clone(), config.terminal.clone())
    }

    /// Editor commands to try, in order
    pub fn candidates(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(command) = self.command.as_ref().filter(|c| !c.trim().is_empty()) {
            out.push(command.clone());
        }
        for var in ["VISUAL", "EDITOR"] {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    out.push(value);
                }
            }
        }
        out.push(default_editor().to_string());
        out
    }

    fn command_for(&self, editor: &str) -> Vec<String> {
        let mut parts = split_command(editor);
        if let Some(term) = self.terminal.as_deref().filter(|t| !t.trim().is_empty()) {
            if !cfg!(windows) {
                let mut wrapped = split_command(term);
                wrapped.push("-e".to_string());
                wrapped.append(&mut parts);
                return wrapped;
            }
        }
        parts
    }

    fn launch(&self, path: &Path) -> Result<ExitStatus> {
        let mut attempted: Vec<String> = Vec::new();
        for candidate in self.candidates() {
            let parts = self.command_for(&candidate);
            if parts.is_empty() {
                continue;
            }
            attempted.push(parts[0].clone());
            let mut command = Command::new(&parts[0]);
            command.args(&parts[1..]).arg(path);
            tracing::debug!(?parts, path = %path.display(), "launching editor");
            match command.status() {
                Ok(status) => return Ok(status),
                Err(err) if err.kind() == io::ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(Error::Editor(format!(
                        "failed to launch editor '{}': {err}",
                        parts[0]
                    )));
                }
            }
        }
        Err(Error::Editor(format!(
            "no editor found (tried {}); set $VISUAL or $EDITOR",
            attempted.join(", ")
        )))
    }
}

impl EditSurface for ExternalEditor {
    fn edit(&self, path: &Path) -> Result<()> {
        let status = self.launch(path)?;
        if status.success() {
            return Ok(());
        }
        let detail = status
            .code()
            .map(|code| format!("exit code {code}"))
            .unwrap_or_else(|| "signal".to_string());
        Err(Error::Editor(format!("editor exited with {detail}")))
    }
}

fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn split_command(value: &str) -> Vec<String> {
    value.split_whitespace().map(|part| part.to_string()).collect()
}
