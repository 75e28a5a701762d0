use std::process::Command;

use tracing::debug;

use crate::error::SpeechError;

/// Runs one command line on behalf of the speaker.
pub trait Shell {
    fn run(&mut self, command: &str) -> Result<(), SpeechError>;
}

impl<S: Shell + ?Sized> Shell for &mut S {
    fn run(&mut self, command: &str) -> Result<(), SpeechError> {
        (**self).run(command)
    }
}

/// Runs commands through `sh -c`, blocking until each one exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl Shell for SystemShell {
    fn run(&mut self, command: &str) -> Result<(), SpeechError> {
        debug!(command, "running");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .status()
            .map_err(|source| SpeechError::Spawn {
                command: command.to_string(),
                source,
            })?;
        if !status.success() {
            return Err(SpeechError::CommandFailed {
                command: command.to_string(),
                status,
            });
        }
        Ok(())
    }
}

/// Collects command lines instead of running them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingShell {
    commands: Vec<String>,
}

impl RecordingShell {
    pub fn new() -> Self {
        RecordingShell::default()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<String> {
        self.commands
    }
}

impl Shell for RecordingShell {
    fn run(&mut self, command: &str) -> Result<(), SpeechError> {
        self.commands.push(command.to_string());
        Ok(())
    }
}

/// Quote `text` as a single POSIX shell word.
pub fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_wraps_and_escapes() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("it's $HOME"), r"'it'\''s $HOME'");
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn system_shell_reports_exit_status() {
        let mut shell = SystemShell;
        assert!(shell.run("true").is_ok());
        match shell.run("exit 3") {
            Err(SpeechError::CommandFailed { command, status }) => {
                assert_eq!(command, "exit 3");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("expected CommandFailed, got {:?}", other),
        }
    }

    #[test]
    fn recording_shell_keeps_order() {
        let mut shell = RecordingShell::new();
        shell.run("a").unwrap();
        shell.run("b").unwrap();
        assert_eq!(shell.into_commands(), vec!["a", "b"]);
    }
}
