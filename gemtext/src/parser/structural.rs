use crate::document::Node;
use crate::parser::{ParseMode, lines};

const LINK_MARKER: &str = "=>";
const QUOTE_MARKER: &str = ">";
const HEADING_MARKER: char = '#';
const FENCE: &str = "```";
const LIST_MARKER: &str = "* ";

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// What a single line means when read outside a preformatted block.
///
/// Borrowed from the line; the parser copies out only what ends up in a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    Link { target: &'a str, label: &'a str },
    Quote(&'a str),
    Heading { level: usize, text: &'a str },
    /// Opening fence with its trimmed caption.
    Fence { alt: &'a str },
    ListItem(&'a str),
    Text,
}

impl<'a> LineClass<'a> {
    /// Classify `line` in priority order: link, quote, heading, fence, list
    /// item, then text.
    pub fn of(line: &'a str, mode: ParseMode) -> Self {
        if let Some(rest) = strip_marker(line, LINK_MARKER, mode) {
            let rest = rest.trim();
            let (target, label) = match rest.split_once(char::is_whitespace) {
                Some((target, label)) => (target, label.trim()),
                None => (rest, ""),
            };
            return LineClass::Link { target, label };
        }

        if let Some(rest) = strip_marker(line, QUOTE_MARKER, mode) {
            return LineClass::Quote(rest.trim());
        }

        if line.starts_with(HEADING_MARKER) {
            let rest = line.trim_start_matches(HEADING_MARKER);
            let level = line.len() - rest.len();
            let separated = rest.chars().next().is_none_or(char::is_whitespace);
            if mode.is_strict() && !separated {
                return LineClass::Text;
            }
            return LineClass::Heading {
                level,
                text: rest.trim(),
            };
        }

        if let Some(alt) = line.strip_prefix(FENCE) {
            return LineClass::Fence { alt: alt.trim() };
        }

        if let Some(item) = line.strip_prefix(LIST_MARKER) {
            return LineClass::ListItem(item.trim());
        }

        LineClass::Text
    }
}

/// Strip a link or quote marker. Strict mode also demands a following space.
fn strip_marker<'a>(line: &'a str, marker: &str, mode: ParseMode) -> Option<&'a str> {
    let rest = line.strip_prefix(marker)?;
    if mode.is_strict() && !rest.starts_with(' ') {
        return None;
    }
    Some(rest)
}

pub(crate) fn is_closing_fence(line: &str) -> bool {
    line.trim() == FENCE
}

pub(crate) fn is_list_item(line: &str) -> bool {
    line.starts_with(LIST_MARKER)
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

pub(crate) fn parse_nodes(source: &str, mode: ParseMode) -> Vec<Node> {
    let mut state = ParseState::new(mode);
    for line in lines(source) {
        state.feed(line.text);
    }
    state.finish()
}

struct ParseState {
    mode: ParseMode,
    nodes: Vec<Node>,
    /// Open preformatted block, if any.
    preformat: Option<PreformatBuilder>,
    /// Items of the list run in progress; empty when no run is open.
    list: Vec<String>,
}

struct PreformatBuilder {
    alt: String,
    lines: Vec<String>,
}

impl PreformatBuilder {
    fn into_node(self) -> Node {
        Node::Preformatted {
            lines: self.lines,
            alt: self.alt,
        }
    }
}

impl ParseState {
    fn new(mode: ParseMode) -> Self {
        ParseState {
            mode,
            nodes: Vec::new(),
            preformat: None,
            list: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        if self.preformat.is_some() {
            if is_closing_fence(line) {
                if let Some(block) = self.preformat.take() {
                    self.nodes.push(block.into_node());
                }
            } else if let Some(block) = self.preformat.as_mut() {
                block.lines.push(line.to_string());
            }
            return;
        }

        // A non-item line ends the run before being classified itself.
        if !self.list.is_empty() && !is_list_item(line) {
            self.flush_list();
        }

        match LineClass::of(line, self.mode) {
            LineClass::Link { target, label } => self.nodes.push(Node::Link {
                target: target.to_string(),
                label: label.to_string(),
            }),
            LineClass::Quote(content) => self.nodes.push(Node::Quote(content.to_string())),
            LineClass::Heading { level, text } => self.nodes.push(Node::Heading {
                level,
                text: text.to_string(),
            }),
            LineClass::Fence { alt } => {
                self.preformat = Some(PreformatBuilder {
                    alt: alt.to_string(),
                    lines: Vec::new(),
                });
            }
            LineClass::ListItem(item) => self.list.push(item.to_string()),
            LineClass::Text => self.nodes.push(Node::Text(line.to_string())),
        }
    }

    fn flush_list(&mut self) {
        let items = std::mem::take(&mut self.list);
        self.nodes.push(Node::List(items));
    }

    /// Close whatever is still open at end of input. An unterminated fence
    /// with no content lines produces nothing.
    fn finish(mut self) -> Vec<Node> {
        if let Some(block) = self.preformat.take() {
            if !block.lines.is_empty() {
                self.nodes.push(block.into_node());
            }
        }
        if !self.list.is_empty() {
            self.flush_list();
        }
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_splits_target_from_label() {
        assert_eq!(
            LineClass::of("=>  gemini://a.b/c   two  words ", ParseMode::Strict),
            LineClass::Link {
                target: "gemini://a.b/c",
                label: "two  words",
            }
        );
        assert_eq!(
            LineClass::of("=>gemini://a.b/", ParseMode::Lenient),
            LineClass::Link {
                target: "gemini://a.b/",
                label: "",
            }
        );
    }

    #[test]
    fn strict_markers_need_a_space() {
        assert_eq!(LineClass::of("=>x", ParseMode::Strict), LineClass::Text);
        assert_eq!(LineClass::of(">x", ParseMode::Strict), LineClass::Text);
        assert_eq!(LineClass::of(">x", ParseMode::Lenient), LineClass::Quote("x"));
    }

    #[test]
    fn heading_marker_run_sets_level() {
        assert_eq!(
            LineClass::of("####### deep", ParseMode::Strict),
            LineClass::Heading {
                level: 7,
                text: "deep",
            }
        );
        assert_eq!(
            LineClass::of("##", ParseMode::Strict),
            LineClass::Heading { level: 2, text: "" }
        );
        assert_eq!(
            LineClass::of("#\ttabbed", ParseMode::Strict),
            LineClass::Heading {
                level: 1,
                text: "tabbed",
            }
        );
    }

    #[test]
    fn fence_and_list_prefixes() {
        assert_eq!(
            LineClass::of("```  rust code ", ParseMode::Strict),
            LineClass::Fence { alt: "rust code" }
        );
        assert_eq!(LineClass::of("*  item ", ParseMode::Strict), LineClass::ListItem("item"));
        assert_eq!(LineClass::of("*item", ParseMode::Lenient), LineClass::Text);
        assert_eq!(LineClass::of("*", ParseMode::Lenient), LineClass::Text);
    }

    #[test]
    fn closing_fence_tolerates_surrounding_whitespace() {
        assert!(is_closing_fence("  ```\t"));
        assert!(!is_closing_fence("```rust"));
    }
}
