//! Speech backend for gemtext documents: a sound cue and a text-to-speech
//! utterance per line, driven through external commands.

pub mod config;
pub mod cue;
pub mod error;
pub mod renderer;
pub mod script;
pub mod shell;
pub mod speaker;
pub mod transcript;

use std::io::Write;

use gemtext::Document;
use tracing::debug;

pub use config::SpeechConfig;
pub use cue::{Cue, CueSet};
pub use error::SpeechError;
pub use renderer::SpeechRenderer;
pub use script::{Script, Utterance};
pub use shell::{RecordingShell, Shell, SystemShell};
pub use speaker::Speaker;
pub use transcript::TranscriptRenderer;

/// Speak `document` node by node, echoing each spoken line to `out`.
/// Returns the shell and sink once every node has been spoken.
pub fn speak<S: Shell, W: Write>(
    document: &Document,
    config: &SpeechConfig,
    shell: S,
    out: W,
) -> Result<(S, W), SpeechError> {
    debug!(nodes = document.len(), "speaking document");
    let mut renderer = SpeechRenderer::new(Speaker::new(config, shell, out));
    document.render::<_, Result<(), SpeechError>>(&mut renderer)?;
    Ok(renderer.into_speaker().into_parts())
}

/// The text a spoken rendering of `document` would echo, one line per
/// utterance.
pub fn transcript(document: &Document) -> String {
    document.render(&mut TranscriptRenderer)
}
