use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use speech::shell::quote;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::locator::{self, LocatorError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no fetch command configured")]
    NoCommand,

    #[error("cannot start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("fetching {locator} failed ({status}){}", detail(.stderr))]
    Failed {
        locator: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn detail(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Retrieves the raw text of a remote document.
pub trait Fetcher {
    fn fetch(&self, locator: &Url) -> Result<String, FetchError>;
}

/// Fetches by running a shell command line with the quoted URL appended and
/// taking its standard output as the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFetcher {
    command: String,
}

impl CommandFetcher {
    /// Wrap a command line such as `npx gemini-fetch`. Shell quoting in the
    /// command is honored.
    pub fn from_command_line(command: &str) -> Self {
        CommandFetcher {
            command: command.trim().to_string(),
        }
    }

    fn command_line(&self, locator: &Url) -> String {
        format!("{} {}", self.command, quote(locator.as_str()))
    }
}

impl Fetcher for CommandFetcher {
    fn fetch(&self, locator: &Url) -> Result<String, FetchError> {
        if self.command.is_empty() {
            return Err(FetchError::NoCommand);
        }
        info!(%locator, "fetching");
        let command = self.command_line(locator);
        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .map_err(|source| FetchError::Spawn { command, source })?;
        if !output.status.success() {
            return Err(FetchError::Failed {
                locator: locator.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        debug!(bytes = output.stdout.len(), "fetched");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Where a document comes from: a file on disk or a remote locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Remote(Url),
}

impl Source {
    /// An existing path is read from disk; anything else must be a locator.
    pub fn resolve(raw: &str) -> Result<Self, LocatorError> {
        let path = Path::new(raw);
        if path.is_file() {
            return Ok(Source::File(path.to_path_buf()));
        }
        locator::sanitize(raw).map(Source::Remote)
    }

    pub fn load(&self, fetcher: &dyn Fetcher) -> Result<String, FetchError> {
        match self {
            Source::File(path) => read_file(path),
            Source::Remote(url) => fetcher.fetch(url),
        }
    }
}

pub fn read_file(path: &Path) -> Result<String, FetchError> {
    std::fs::read_to_string(path).map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn locator_is_quoted_onto_the_command() {
        let fetcher = CommandFetcher::from_command_line("  npx  gemini-fetch ");
        assert_eq!(
            fetcher.command_line(&url("gemini://example.org/a b")),
            "npx  gemini-fetch 'gemini://example.org/a%20b'"
        );
    }

    #[test]
    fn stdout_becomes_the_document() {
        let fetcher = CommandFetcher::from_command_line("echo '# Title'");
        let body = fetcher.fetch(&url("gemini://example.org/")).unwrap();
        assert_eq!(body, "# Title gemini://example.org/\n");
    }

    #[test]
    fn quoted_arguments_stay_whole() {
        let fetcher = CommandFetcher::from_command_line("sh -c 'printf hello'");
        let body = fetcher.fetch(&url("gemini://example.org/")).unwrap();
        assert_eq!(body, "hello");
    }

    #[test]
    fn non_zero_exit_is_an_error() {
        let fetcher = CommandFetcher::from_command_line("sh -c 'echo gone >&2; exit 3'");
        let err = fetcher.fetch(&url("gemini://example.org/")).unwrap_err();
        assert!(matches!(err, FetchError::Failed { .. }));
        let message = err.to_string();
        assert!(message.starts_with("fetching gemini://example.org/ failed"));
        assert!(message.ends_with(": gone"));
    }

    #[test]
    fn empty_command_is_rejected() {
        let fetcher = CommandFetcher::from_command_line("   ");
        assert!(matches!(
            fetcher.fetch(&url("gemini://example.org/")),
            Err(FetchError::NoCommand)
        ));
    }

    #[test]
    fn missing_program_is_a_failed_fetch() {
        let fetcher = CommandFetcher::from_command_line("gemspeak-no-such-fetcher --flag");
        assert!(matches!(
            fetcher.fetch(&url("gemini://example.org/")),
            Err(FetchError::Failed { .. })
        ));
    }

    #[test]
    fn existing_file_resolves_locally() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.gmi");
        std::fs::write(&path, "# Local\n").unwrap();
        let source = Source::resolve(path.to_str().unwrap()).unwrap();
        assert_eq!(source, Source::File(path.clone()));
        let fetcher = CommandFetcher::from_command_line("false");
        assert_eq!(source.load(&fetcher).unwrap(), "# Local\n");
    }

    #[test]
    fn other_input_resolves_remotely() {
        assert_eq!(
            Source::resolve("example.org").unwrap(),
            Source::Remote(url("gemini://example.org/"))
        );
        assert!(Source::resolve("https://example.org/").is_err());
    }
}
