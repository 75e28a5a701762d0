use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures while speaking a document. Any of them aborts the remaining nodes.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("cannot start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed ({status})")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("cannot write transcript: {0}")]
    Output(#[from] io::Error),
}
