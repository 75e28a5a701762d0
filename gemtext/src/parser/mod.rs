mod lines;
mod structural;

pub(crate) use lines::lines;
pub(crate) use structural::is_closing_fence;
pub use structural::LineClass;

use tracing::debug;

use crate::document::Document;

/// How strictly line prefixes are matched.
///
/// `Strict` requires a space after the `=>` and `>` markers and whitespace (or
/// end of line) after a run of `#`; lines failing those checks are plain text.
/// `Lenient` accepts the bare markers. Every other rule is shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParseMode {
    Strict,
    #[default]
    Lenient,
}

impl ParseMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    pub fn is_strict(self) -> bool {
        self == ParseMode::Strict
    }
}

/// Parser entry point.
pub struct Parser {
    source: String,
    mode: ParseMode,
}

impl Parser {
    pub fn new(source: impl Into<String>, mode: ParseMode) -> Self {
        Parser {
            source: source.into(),
            mode,
        }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Parse the whole source in one pass. Never fails: anything unrecognised
    /// becomes a text node.
    pub fn parse(&self) -> Document {
        let nodes = structural::parse_nodes(&self.source, self.mode);
        debug!(
            mode = ?self.mode,
            bytes = self.source.len(),
            nodes = nodes.len(),
            "parsed gemtext"
        );
        Document::from(nodes)
    }
}
