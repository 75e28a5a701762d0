use crate::document::{Document, Node};

/// A backend that turns each kind of node into a value.
///
/// One method per node kind, so a renderer that misses a kind does not
/// compile. Methods take `&mut self`; backends may keep state between calls.
pub trait Renderer {
    type Output;

    fn text(&mut self, content: &str) -> Self::Output;
    fn link(&mut self, target: &str, label: &str) -> Self::Output;
    fn preformatted(&mut self, lines: &[String], alt: &str) -> Self::Output;
    fn heading(&mut self, level: usize, text: &str) -> Self::Output;
    fn list(&mut self, items: &[String]) -> Self::Output;
    fn quote(&mut self, content: &str) -> Self::Output;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    type Output = R::Output;

    fn text(&mut self, content: &str) -> Self::Output {
        (**self).text(content)
    }

    fn link(&mut self, target: &str, label: &str) -> Self::Output {
        (**self).link(target, label)
    }

    fn preformatted(&mut self, lines: &[String], alt: &str) -> Self::Output {
        (**self).preformatted(lines, alt)
    }

    fn heading(&mut self, level: usize, text: &str) -> Self::Output {
        (**self).heading(level, text)
    }

    fn list(&mut self, items: &[String]) -> Self::Output {
        (**self).list(items)
    }

    fn quote(&mut self, content: &str) -> Self::Output {
        (**self).quote(content)
    }
}

impl Node {
    /// Call the renderer method matching this node's kind.
    pub fn accept<R: Renderer + ?Sized>(&self, renderer: &mut R) -> R::Output {
        match self {
            Node::Text(content) => renderer.text(content),
            Node::Link { target, label } => renderer.link(target, label),
            Node::Preformatted { lines, alt } => renderer.preformatted(lines, alt),
            Node::Heading { level, text } => renderer.heading(*level, text),
            Node::List(items) => renderer.list(items),
            Node::Quote(content) => renderer.quote(content),
        }
    }
}

impl Document {
    /// Render every node in order and combine the results.
    ///
    /// The combination is whatever `C: FromIterator` means: `String` appends,
    /// `Vec<_>` keeps one entry per node, `()` discards. Collecting into a
    /// `Result` stops at the first `Err`; later nodes are never rendered.
    pub fn render<R, C>(&self, renderer: &mut R) -> C
    where
        R: Renderer + ?Sized,
        C: FromIterator<R::Output>,
    {
        self.iter().map(|node| node.accept(renderer)).collect()
    }
}
