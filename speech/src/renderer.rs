use std::io::Write;

use gemtext::Renderer;

use crate::error::SpeechError;
use crate::script::Script;
use crate::shell::Shell;
use crate::speaker::Speaker;

/// Speaks each node as it is visited. The first failing command stops the
/// document.
pub struct SpeechRenderer<S, W> {
    speaker: Speaker<S, W>,
}

impl<S: Shell, W: Write> SpeechRenderer<S, W> {
    pub fn new(speaker: Speaker<S, W>) -> Self {
        SpeechRenderer { speaker }
    }

    pub fn into_speaker(self) -> Speaker<S, W> {
        self.speaker
    }
}

impl<S: Shell, W: Write> Renderer for SpeechRenderer<S, W> {
    type Output = Result<(), SpeechError>;

    fn text(&mut self, content: &str) -> Self::Output {
        self.speaker.say_all(Script.text(content))
    }

    fn link(&mut self, target: &str, label: &str) -> Self::Output {
        self.speaker.say_all(Script.link(target, label))
    }

    fn preformatted(&mut self, lines: &[String], alt: &str) -> Self::Output {
        self.speaker.say_all(Script.preformatted(lines, alt))
    }

    fn heading(&mut self, level: usize, text: &str) -> Self::Output {
        self.speaker.say_all(Script.heading(level, text))
    }

    fn list(&mut self, items: &[String]) -> Self::Output {
        self.speaker.say_all(Script.list(items))
    }

    fn quote(&mut self, content: &str) -> Self::Output {
        self.speaker.say_all(Script.quote(content))
    }
}
