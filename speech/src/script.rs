use gemtext::Renderer;

use crate::cue::Cue;

/// One cue followed by one spoken line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub cue: Cue,
    pub text: String,
}

impl Utterance {
    pub fn new(cue: Cue, text: impl Into<String>) -> Self {
        Utterance {
            cue,
            text: text.into(),
        }
    }
}

/// Decides what is said for each node. Both the audio and the transcript
/// backends speak from this script.
#[derive(Debug, Clone, Copy, Default)]
pub struct Script;

impl Renderer for Script {
    type Output = Vec<Utterance>;

    // Blank lines are separators, not speech.
    fn text(&mut self, content: &str) -> Self::Output {
        if content.is_empty() {
            return Vec::new();
        }
        vec![Utterance::new(Cue::Text, content)]
    }

    fn link(&mut self, target: &str, label: &str) -> Self::Output {
        let spoken = if label.is_empty() { target } else { label };
        vec![Utterance::new(Cue::Link, spoken)]
    }

    fn preformatted(&mut self, _lines: &[String], alt: &str) -> Self::Output {
        vec![Utterance::new(Cue::Block, format!("Block {}", alt).trim_end())]
    }

    fn heading(&mut self, level: usize, text: &str) -> Self::Output {
        vec![Utterance::new(Cue::Heading(level), text)]
    }

    fn list(&mut self, items: &[String]) -> Self::Output {
        items
            .iter()
            .map(|item| Utterance::new(Cue::ListItem, item.as_str()))
            .collect()
    }

    fn quote(&mut self, content: &str) -> Self::Output {
        vec![Utterance::new(Cue::Quote, content)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_falls_back_to_target() {
        assert_eq!(
            Script.link("gemini://a/", ""),
            vec![Utterance::new(Cue::Link, "gemini://a/")]
        );
        assert_eq!(
            Script.link("gemini://a/", "Home"),
            vec![Utterance::new(Cue::Link, "Home")]
        );
    }

    #[test]
    fn block_names_its_caption() {
        assert_eq!(Script.preformatted(&[], "")[0].text, "Block");
        assert_eq!(Script.preformatted(&[], "diagram")[0].text, "Block diagram");
    }

    #[test]
    fn list_speaks_every_item() {
        let items = vec!["a".to_string(), "b".to_string()];
        let script = Script.list(&items);
        assert_eq!(script.len(), 2);
        assert!(script.iter().all(|u| u.cue == Cue::ListItem));
    }

    #[test]
    fn empty_text_is_silent() {
        assert!(Script.text("").is_empty());
        assert_eq!(Script.text(" ").len(), 1);
    }
}
