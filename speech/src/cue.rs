use std::path::{Path, PathBuf};

/// The sound played before each utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Text,
    Link,
    Block,
    ListItem,
    Quote,
    Heading(usize),
}

impl Cue {
    /// Position of this cue's sound in the configured list. Headings take one
    /// slot per level after the fixed cues.
    pub fn index(self) -> usize {
        match self {
            Cue::Text => 0,
            Cue::Link => 1,
            Cue::Block => 2,
            Cue::ListItem => 3,
            Cue::Quote => 4,
            Cue::Heading(level) => 5usize.saturating_add(level),
        }
    }
}

/// Ordered list of cue sound files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueSet {
    sounds: Vec<PathBuf>,
}

impl CueSet {
    pub fn new(sounds: Vec<PathBuf>) -> Self {
        CueSet { sounds }
    }

    pub fn get(&self, cue: Cue) -> Option<&Path> {
        self.sounds.get(cue.index()).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
