use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

use crate::parser::{LineClass, ParseMode, is_closing_fence, lines};

/// A finding about a source line that parses, but perhaps not as intended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lint {
    pub message: String,
    /// Byte range of the offending line.
    pub span: Range<usize>,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl Lint {
    pub fn warning(message: impl Into<String>, span: Range<usize>) -> Self {
        Lint {
            message: message.into(),
            span,
            severity: Severity::Warning,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// 1-based line number of the span start within `source`.
    pub fn line(&self, source: &str) -> usize {
        source[..self.span.start.min(source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

/// Report lines whose meaning depends on the parse mode, links without a
/// target, and a preformatted block left open at end of input. Content of
/// preformatted blocks is never inspected.
pub fn check(source: &str) -> Vec<Lint> {
    let mut lints = Vec::new();
    let mut open_fence: Option<Range<usize>> = None;

    for line in lines(source) {
        if open_fence.is_some() {
            if is_closing_fence(line.text) {
                open_fence = None;
            }
            continue;
        }

        let strict = LineClass::of(line.text, ParseMode::Strict);
        let lenient = LineClass::of(line.text, ParseMode::Lenient);

        if strict == LineClass::Text {
            let message = match lenient {
                LineClass::Link { .. } => Some("link marker `=>` is not followed by a space"),
                LineClass::Quote(_) => Some("quote marker `>` is not followed by a space"),
                LineClass::Heading { .. } => {
                    Some("heading marker `#` is not followed by whitespace")
                }
                _ => None,
            };
            if let Some(message) = message {
                lints.push(
                    Lint::warning(message, line.span.clone())
                        .with_note("strict parsing reads this line as plain text"),
                );
            }
        }

        if let LineClass::Link { target: "", .. } = lenient {
            lints.push(Lint::warning("link has no target", line.span.clone()));
        }

        if let LineClass::Fence { .. } = strict {
            open_fence = Some(line.span);
        }
    }

    if let Some(span) = open_fence {
        lints.push(
            Lint::warning("preformatted block is never closed", span)
                .with_note("the block runs to the end of the document"),
        );
    }

    lints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(source: &str) -> Vec<String> {
        check(source).into_iter().map(|l| l.message).collect()
    }

    #[test]
    fn clean_document_has_no_lints() {
        let source = "# Title\n=> gemini://a/ A\n> q\n* i\n```\n#raw\n```\nplain\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn mode_dependent_lines_are_reported() {
        let lints = check("#tag\n=>gemini://a/\n>quoted\n");
        assert_eq!(lints.len(), 3);
        assert!(lints[0].message.contains("heading"));
        assert!(lints[1].message.contains("link"));
        assert!(lints[2].message.contains("quote"));
        assert!(lints.iter().all(|l| l.severity == Severity::Warning));
        assert_eq!(lints[1].span, 5..18);
    }

    #[test]
    fn empty_link_target() {
        assert_eq!(messages("=>   \n"), vec!["link has no target"]);
    }

    #[test]
    fn unterminated_fence_points_at_opening_line() {
        let source = "intro\n```ascii\n#x\n";
        let lints = check(source);
        assert_eq!(lints.len(), 1);
        assert_eq!(lints[0].message, "preformatted block is never closed");
        assert_eq!(lints[0].line(source), 2);
        assert_eq!(&source[lints[0].span.clone()], "```ascii");
    }

    #[test]
    fn diagnostic_carries_span_and_notes() {
        let lint = Lint::warning("w", 3..7).with_note("n");
        let diagnostic = lint.to_diagnostic(4);
        assert_eq!(diagnostic.message, "w");
        assert_eq!(diagnostic.notes, vec!["n".to_string()]);
        assert_eq!(diagnostic.labels[0].file_id, 4);
        assert_eq!(diagnostic.labels[0].range, 3..7);
    }
}
