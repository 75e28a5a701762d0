use std::io::Write;

use tracing::warn;

use crate::config::SpeechConfig;
use crate::cue::{Cue, CueSet};
use crate::error::SpeechError;
use crate::script::Utterance;
use crate::shell::{Shell, quote};

/// Plays cues and speaks lines through a [`Shell`], echoing every spoken
/// line to `out`.
pub struct Speaker<S, W> {
    play: String,
    tts: String,
    pause: String,
    cues: CueSet,
    shell: S,
    out: W,
}

impl<S: Shell, W: Write> Speaker<S, W> {
    pub fn new(config: &SpeechConfig, shell: S, out: W) -> Self {
        Speaker {
            play: config.play.clone(),
            tts: config.tts.clone(),
            pause: config.pause.clone(),
            cues: CueSet::new(config.sounds.clone()),
            shell,
            out,
        }
    }

    /// Play the cue's sound twice, then pause. A cue with no configured
    /// sound is skipped with a warning.
    pub fn play(&mut self, cue: Cue) -> Result<(), SpeechError> {
        let Some(file) = self.cues.get(cue) else {
            warn!(cue = cue.index(), "audio file not found");
            return Ok(());
        };
        let command = format!("{} {} > /dev/null", self.play, quote(&file.to_string_lossy()));
        self.shell.run(&command)?;
        self.shell.run(&command)?;
        self.shell.run(&self.pause)
    }

    /// Play `cue`, echo `text`, speak it, then pause.
    pub fn say(&mut self, cue: Cue, text: &str) -> Result<(), SpeechError> {
        self.play(cue)?;
        writeln!(self.out, "{}", text)?;
        self.out.flush()?;
        self.shell.run(&format!("{} {}", self.tts, quote(text)))?;
        self.shell.run(&self.pause)
    }

    pub fn say_all(&mut self, utterances: Vec<Utterance>) -> Result<(), SpeechError> {
        for utterance in utterances {
            self.say(utterance.cue, &utterance.text)?;
        }
        Ok(())
    }

    pub fn into_parts(self) -> (S, W) {
        (self.shell, self.out)
    }
}
