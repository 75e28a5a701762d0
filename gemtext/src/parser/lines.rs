use std::ops::Range;

/// One logical source line with its line terminator removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    /// Byte range of `text` within the source.
    pub span: Range<usize>,
}

/// Split `source` on `\n` and `\r\n`. A trailing terminator does not start an
/// extra empty line, so empty input yields nothing.
pub(crate) fn lines(source: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    source.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let text = match raw.strip_suffix('\n') {
            Some(body) => body.strip_suffix('\r').unwrap_or(body),
            None => raw,
        };
        Line {
            text,
            span: start..start + text.len(),
        }
    })
}
