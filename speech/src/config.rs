use std::path::PathBuf;

use serde::Deserialize;

pub const PLAY_VAR: &str = "PLAY";
pub const TTS_VAR: &str = "TTS";
pub const PAUSE_VAR: &str = "PAUSE";

const DEFAULT_PLAY: &str = "play -q";
const DEFAULT_TTS: &str = "espeak -s 180 -l60";
const DEFAULT_PAUSE: &str = "sleep 0.2";

// Reorder to change which sound goes with which kind of line.
const DEFAULT_SOUNDS: [&str; 12] = [
    "./wav/beep-brightpop.aif",
    "./wav/beep-hightone.aif",
    "./wav/beep-holdtone.aif",
    "./wav/beep-horn.aif",
    "./wav/beep-piano.aif",
    "./wav/beep-plucked.aif",
    "./wav/beep-roadblock.aif",
    "./wav/beep-scrapy.aif",
    "./wav/beep-sharpstring.aif",
    "./wav/beep-timber.aif",
    "./wav/beep-warmguitar.aif",
    "./wav/beep-xylo.aif",
];

/// Shell commands and sound files used by the speech backend.
///
/// Deserializes from the `[speech]` table of the config file; any key left
/// out keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Plays one sound file; the file path is appended.
    pub play: String,
    /// Speaks text; the quoted text is appended.
    pub tts: String,
    /// Run after every cue and utterance.
    pub pause: String,
    /// Cue sounds, indexed by [`crate::Cue::index`].
    pub sounds: Vec<PathBuf>,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        SpeechConfig {
            play: DEFAULT_PLAY.to_string(),
            tts: DEFAULT_TTS.to_string(),
            pause: DEFAULT_PAUSE.to_string(),
            sounds: DEFAULT_SOUNDS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl SpeechConfig {
    /// Override commands from the `PLAY`, `TTS` and `PAUSE` environment
    /// variables.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override commands from `lookup`. Unset and empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let set = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(play) = set(PLAY_VAR) {
            self.play = play;
        }
        if let Some(tts) = set(TTS_VAR) {
            self.tts = tts;
        }
        if let Some(pause) = set(PAUSE_VAR) {
            self.pause = pause;
        }
    }
}
