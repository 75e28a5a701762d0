use std::fmt;
use std::str::FromStr;

/// A parsed gemtext document: the ordered sequence of nodes produced by one
/// parse. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn empty() -> Self {
        Document { nodes: Vec::new() }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// The kind of every node, in document order.
    pub fn kinds(&self) -> Vec<NodeKind> {
        self.nodes.iter().map(Node::kind).collect()
    }
}

impl From<Vec<Node>> for Document {
    fn from(nodes: Vec<Node>) -> Self {
        Document { nodes }
    }
}

impl IntoIterator for Document {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// A single structural line (or run of lines) of gemtext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Any line that matched no other rule, verbatim.
    Text(String),
    Link {
        target: String,
        /// Empty when the link line carries no label.
        label: String,
    },
    Preformatted {
        /// Raw lines between the fences, untrimmed.
        lines: Vec<String>,
        /// Caption after the opening fence, empty when absent.
        alt: String,
    },
    Heading {
        /// Number of `#` characters; not capped.
        level: usize,
        text: String,
    },
    /// One maximal run of `* ` lines.
    List(Vec<String>),
    Quote(String),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Text(_) => NodeKind::Text,
            Node::Link { .. } => NodeKind::Link,
            Node::Preformatted { .. } => NodeKind::Preformatted,
            Node::Heading { .. } => NodeKind::Heading,
            Node::List(_) => NodeKind::List,
            Node::Quote(_) => NodeKind::Quote,
        }
    }
}

/// Payload-free tag for each [`Node`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Link,
    Preformatted,
    Heading,
    List,
    Quote,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Text,
        NodeKind::Link,
        NodeKind::Preformatted,
        NodeKind::Heading,
        NodeKind::List,
        NodeKind::Quote,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Text => "text",
            NodeKind::Link => "link",
            NodeKind::Preformatted => "preformatted",
            NodeKind::Heading => "heading",
            NodeKind::List => "list",
            NodeKind::Quote => "quote",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownNodeKind(pub String);

impl fmt::Display for UnknownNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown node kind: {}", self.0)
    }
}

impl std::error::Error for UnknownNodeKind {}

impl FromStr for NodeKind {
    type Err = UnknownNodeKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| UnknownNodeKind(s.to_string()))
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{}", node)?;
        }
        Ok(())
    }
}

// Writes canonical gemtext, one trailing newline per source line.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Text(content) => writeln!(f, "{}", content),
            Node::Link { target, label } => {
                if label.is_empty() {
                    writeln!(f, "=> {}", target)
                } else {
                    writeln!(f, "=> {} {}", target, label)
                }
            }
            Node::Preformatted { lines, alt } => {
                if alt.is_empty() {
                    writeln!(f, "```")?;
                } else {
                    writeln!(f, "```{}", alt)?;
                }
                for line in lines {
                    writeln!(f, "{}", line)?;
                }
                writeln!(f, "```")
            }
            Node::Heading { level, text } => {
                for _ in 0..*level {
                    write!(f, "#")?;
                }
                writeln!(f, " {}", text)
            }
            Node::List(items) => {
                for item in items {
                    writeln!(f, "* {}", item)?;
                }
                Ok(())
            }
            Node::Quote(content) => writeln!(f, "> {}", content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(kind.name().parse::<NodeKind>(), Ok(kind));
        }
        assert_eq!(" Heading ".parse::<NodeKind>(), Ok(NodeKind::Heading));
        assert!("table".parse::<NodeKind>().is_err());
    }

    #[test]
    fn display_writes_canonical_gemtext() {
        let doc = Document::from(vec![
            Node::Heading {
                level: 2,
                text: "Links".into(),
            },
            Node::Link {
                target: "gemini://example.org/".into(),
                label: String::new(),
            },
            Node::List(vec!["a".into(), "b".into()]),
            Node::Preformatted {
                lines: vec!["  raw".into()],
                alt: "ascii".into(),
            },
            Node::Quote("said".into()),
            Node::Text(String::new()),
        ]);
        assert_eq!(
            doc.to_string(),
            "## Links\n=> gemini://example.org/\n* a\n* b\n```ascii\n  raw\n```\n> said\n\n"
        );
    }

    #[test]
    fn kinds_follow_node_order() {
        let doc = Document::from(vec![Node::Quote("q".into()), Node::Text("t".into())]);
        assert_eq!(doc.kinds(), vec![NodeKind::Quote, NodeKind::Text]);
        assert_eq!(doc.len(), 2);
        assert!(!doc.is_empty());
        assert!(Document::empty().is_empty());
    }
}
