//! Property-based tests for the line parser.

use gemtext::{Node, NodeKind, ParseMode, parse};
use proptest::prelude::*;

const MODES: [ParseMode; 2] = [ParseMode::Strict, ParseMode::Lenient];

/// A line that starts with none of the line-type markers.
fn plain_line() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9][a-zA-Z0-9 ,.!?#>*=`-]{0,30}",
        " [ a-z#>*=]{0,10}",
    ]
}

/// Any gemtext line, markers included.
fn gemtext_line() -> impl Strategy<Value = String> {
    prop_oneof![
        plain_line(),
        "#{1,7}[ \t]?[a-z ]{0,10}",
        "=>[ ]?[a-z:/.]{0,12}( [A-Za-z ]{0,8})?",
        ">[ ]?[a-z ]{0,10}",
        "\\*[ ]?[a-z ]{0,8}",
        "[ ]?```[a-z ]{0,6}",
    ]
}

fn gemtext_source() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(gemtext_line(), 0..25)
}

/// Lines of the four kinds that always occupy exactly one line and one node.
fn single_line_node() -> impl Strategy<Value = (NodeKind, String)> {
    prop_oneof![
        "[a-z]{1,8}".prop_map(|w| (NodeKind::Text, w)),
        "[a-z]{1,8}".prop_map(|w| (NodeKind::Heading, format!("## {}", w))),
        "[a-z]{1,8}".prop_map(|w| (NodeKind::Link, format!("=> gemini://{}/ {}", w, w))),
        "[a-z]{1,8}".prop_map(|w| (NodeKind::Quote, format!("> {}", w))),
    ]
}

proptest! {
    #[test]
    fn parse_is_total(input in any::<String>()) {
        for mode in MODES {
            let doc = parse(&input, mode);
            prop_assert!(doc.len() <= input.lines().count());
        }
    }

    #[test]
    fn parse_is_total_on_marker_soup(input in "[#=>*` \t\r\na-z]{0,120}") {
        for mode in MODES {
            let doc = parse(&input, mode);
            prop_assert!(doc.len() <= input.lines().count());
        }
    }

    #[test]
    fn unmarked_lines_become_text(lines in prop::collection::vec(plain_line(), 0..20)) {
        let source = lines.join("\n");
        let expected: Vec<Node> = source.lines().map(|l| Node::Text(l.to_string())).collect();
        for mode in MODES {
            prop_assert_eq!(parse(&source, mode).into_nodes(), expected.clone());
        }
    }

    #[test]
    fn crlf_parses_like_lf(lines in gemtext_source()) {
        let lf = lines.join("\n");
        let crlf = lines.join("\r\n");
        for mode in MODES {
            prop_assert_eq!(parse(&crlf, mode), parse(&lf, mode));
        }
    }

    #[test]
    fn node_order_follows_line_order(entries in prop::collection::vec(single_line_node(), 0..20)) {
        let source: String = entries.iter().map(|(_, line)| format!("{}\n", line)).collect();
        let expected: Vec<NodeKind> = entries.iter().map(|(kind, _)| *kind).collect();
        for mode in MODES {
            prop_assert_eq!(parse(&source, mode).kinds(), expected.clone());
        }
    }

    #[test]
    fn canonical_output_is_stable(lines in gemtext_source()) {
        let first = parse(&lines.join("\n"), ParseMode::Lenient);
        let second = parse(&first.to_string(), ParseMode::Strict);
        prop_assert_eq!(first, second);
    }
}
