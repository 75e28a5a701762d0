use gemtext::Renderer;

use crate::script::{Script, Utterance};

/// Renders the lines a [`crate::SpeechRenderer`] would echo, with no audio.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscriptRenderer;

fn lines(utterances: Vec<Utterance>) -> String {
    utterances
        .into_iter()
        .map(|utterance| utterance.text + "\n")
        .collect()
}

impl Renderer for TranscriptRenderer {
    type Output = String;

    fn text(&mut self, content: &str) -> String {
        lines(Script.text(content))
    }

    fn link(&mut self, target: &str, label: &str) -> String {
        lines(Script.link(target, label))
    }

    fn preformatted(&mut self, content: &[String], alt: &str) -> String {
        lines(Script.preformatted(content, alt))
    }

    fn heading(&mut self, level: usize, text: &str) -> String {
        lines(Script.heading(level, text))
    }

    fn list(&mut self, items: &[String]) -> String {
        lines(Script.list(items))
    }

    fn quote(&mut self, content: &str) -> String {
        lines(Script.quote(content))
    }
}
