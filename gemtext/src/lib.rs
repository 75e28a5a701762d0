//! Line-oriented gemtext parsing and renderer dispatch.
//!
//! [`parse`] turns a complete document into a [`Document`] of typed
//! [`Node`]s; [`Document::render`] walks those nodes through any
//! [`Renderer`].

pub mod document;
pub mod lint;
pub mod parser;
pub mod render;

pub use document::{Document, Node, NodeKind};
pub use lint::Lint;
pub use parser::{ParseMode, Parser};
pub use render::Renderer;

/// Parse a complete gemtext document.
pub fn parse(source: &str, mode: ParseMode) -> Document {
    Parser::new(source, mode).parse()
}
