use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use gemtext::lint::{self, Lint};
use gemtext::{NodeKind, ParseMode};
use serde::Deserialize;

const TEST_SUFFIX: &str = ".test.gmi";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Strict,
    Lenient,
}

impl From<Mode> for ParseMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Strict => ParseMode::Strict,
            Mode::Lenient => ParseMode::Lenient,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Parse mode for the document. Defaults to strict.
    #[serde(default)]
    pub mode: Mode,

    /// Expected node kinds, in order (`"heading"`, `"list"`, ...).
    #[serde(default)]
    pub expect_kinds: Option<Vec<String>>,

    /// Expected spoken transcript (trimmed comparison).
    #[serde(default)]
    pub expect_transcript: Option<String>,

    /// Expected lint warnings. If present (even empty), warning count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

/// Parse a `.test.gmi` file into its TOML config and gemtext source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    // 1. Read file
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    // 2. Parse frontmatter
    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let description = config.description.clone();
    let outcome = match check_expectations(&config, source) {
        Some(reason) => TestOutcome::Fail(reason),
        None => TestOutcome::Pass,
    };

    TestResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

/// Run every expectation in `config` against `source`. Returns the first
/// mismatch.
fn check_expectations(config: &TestConfig, source: &str) -> Option<String> {
    let document = gemtext::parse(source, config.mode.into());

    if let Some(expected) = &config.expect_kinds {
        let expected: Result<Vec<NodeKind>, _> =
            expected.iter().map(|k| k.parse::<NodeKind>()).collect();
        let expected = match expected {
            Ok(kinds) => kinds,
            Err(e) => return Some(format!("bad expect_kinds: {}", e)),
        };
        let actual = document.kinds();
        if actual != expected {
            return Some(format!(
                "node kinds mismatch\n  expected: {}\n  actual:   {}",
                join_kinds(&expected),
                join_kinds(&actual)
            ));
        }
    }

    if let Some(expected) = &config.expect_transcript {
        let actual = speech::transcript(&document);
        let actual_trimmed = actual.trim();
        let expected_trimmed = expected.trim();
        if actual_trimmed != expected_trimmed {
            return Some(format!(
                "transcript mismatch\n  expected: {}\n  actual:   {}",
                expected_trimmed.replace('\n', "\\n"),
                actual_trimmed.replace('\n', "\\n")
            ));
        }
    }

    if let Some(expected_warnings) = &config.expect_warnings {
        let lints = lint::check(source);
        if let Some(reason) = check_warnings(source, &lints, expected_warnings) {
            return Some(reason);
        }
    }

    None
}

fn join_kinds(kinds: &[NodeKind]) -> String {
    if kinds.is_empty() {
        return "(none)".to_string();
    }
    kinds
        .iter()
        .map(|kind| kind.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(source: &str, lints: &[Lint], expected: &[ExpectedWarning]) -> Option<String> {
    if lints.len() != expected.len() {
        let actual_msgs: Vec<String> = lints.iter().map(|w| format!("  - {}", w.message)).collect();
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            lints.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in lints.iter().zip(expected.iter()).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual.message
            ));
        }

        if let Some(expected_line) = expected.line {
            let actual_line = actual.line(source);
            if actual_line != expected_line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }

    None
}

/// Discover `.test.gmi` files grouped by category (sub-directory relative to
/// `root`, `""` for files directly inside it). Files are sorted per category.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_tests(&path, root, out);
            continue;
        }
        let is_test = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(TEST_SUFFIX));
        if is_test {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

/// ANSI styling for the report, or none at all.
#[derive(Clone, Copy)]
struct Palette {
    color: bool,
}

impl Palette {
    fn paint(self, code: &str, text: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", code, text)
        } else {
            text.to_string()
        }
    }

    fn pass(self) -> String {
        self.paint("32", "PASS")
    }

    fn fail(self) -> String {
        self.paint("31", "FAIL")
    }

    fn ok(self) -> String {
        self.paint("32", "ok")
    }

    fn failed(self) -> String {
        self.paint("31", "FAILED")
    }

    fn bold(self, text: &str) -> String {
        self.paint("1", text)
    }
}

fn result_label(result: &TestResult) -> &str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .and_then(|s| s.strip_suffix(TEST_SUFFIX))
            .unwrap_or("?")
    })
}

/// Run all `.test.gmi` files under `path` (or a single file). A non-empty
/// `categories` restricts the run to those sub-directories and their children.
/// Returns the process exit code: 0 when everything passes, 1 otherwise.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let palette = Palette { color: !no_color };

    let selected: BTreeMap<String, Vec<PathBuf>> = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        let all = discover_categorized(path);
        if all.is_empty() {
            eprintln!("no {} files found in {}", TEST_SUFFIX, path.display());
            return 1;
        }
        select_categories(all, categories)
    };

    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let single = path.is_file();
    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &selected {
        if !single {
            eprintln!();
            eprintln!("{}", palette.bold(category_label(category)));
        }
        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", palette.pass(), result_label(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", palette.fail(), result_label(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        eprintln!("test result: {}. {} passed, 0 failed", palette.ok(), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            palette.failed(),
            passed,
            failed,
            passed + failed
        );
        1
    }
}

/// Keep only the requested categories; a request also matches nested
/// categories below it. Unknown requests are reported and skipped.
fn select_categories(
    all: BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<String, Vec<PathBuf>> {
    if requested.is_empty() {
        return all;
    }

    let wanted: Vec<&str> = requested.iter().map(|r| r.trim_matches('/')).collect();
    for req in &wanted {
        let found = all
            .keys()
            .any(|cat| cat == req || cat.starts_with(&format!("{}/", req)));
        if !found {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                all.keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }

    all.into_iter()
        .filter(|(cat, _)| {
            wanted
                .iter()
                .any(|req| cat == req || cat.starts_with(&format!("{}/", req)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\ndescription = \"links\"\nexpect_kinds = [\"heading\", \"link\"]\nexpect_transcript = \"\"\"\nTitle\nHome\n\"\"\"\n---\n# Title\n=> gemini://a/ Home\n";

    #[test]
    fn frontmatter_splits_from_source() {
        let (config, source) = parse_test_file(SAMPLE).unwrap();
        assert_eq!(config.description.as_deref(), Some("links"));
        assert_eq!(config.mode, Mode::Strict);
        assert_eq!(source, "# Title\n=> gemini://a/ Home\n");
    }

    #[test]
    fn missing_delimiters_are_reported() {
        assert!(parse_test_file("# no frontmatter").is_err());
        assert!(parse_test_file("---\nmode = \"strict\"\n").is_err());
    }

    #[test]
    fn passing_expectations() {
        let (config, source) = parse_test_file(SAMPLE).unwrap();
        assert_eq!(check_expectations(&config, source), None);
    }

    #[test]
    fn kind_mismatch_is_described() {
        let (config, _) = parse_test_file(SAMPLE).unwrap();
        let reason = check_expectations(&config, "#Title\n=> gemini://a/ Home\n").unwrap();
        assert!(reason.starts_with("node kinds mismatch"));
        assert!(reason.contains("text, link"));
    }

    #[test]
    fn kinds_are_listed_by_name() {
        assert_eq!(join_kinds(&[]), "(none)");
        assert_eq!(
            join_kinds(&[NodeKind::Heading, NodeKind::List, NodeKind::Preformatted]),
            "heading, list, preformatted"
        );
    }

    #[test]
    fn lenient_mode_and_warnings() {
        let content = "---\nmode = \"lenient\"\nexpect_kinds = [\"heading\"]\n[[expect_warnings]]\ncontains = \"heading marker\"\nline = 1\n---\n#Title\n";
        let (config, source) = parse_test_file(content).unwrap();
        assert_eq!(config.mode, Mode::Lenient);
        assert_eq!(check_expectations(&config, source), None);
    }

    #[test]
    fn unknown_kind_is_a_failure() {
        let content = "---\nexpect_kinds = [\"table\"]\n---\nx\n";
        let (config, source) = parse_test_file(content).unwrap();
        let reason = check_expectations(&config, source).unwrap();
        assert!(reason.contains("unknown node kind: table"));
    }

    #[test]
    fn categories_follow_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("lists").join("runs");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("top.test.gmi"), SAMPLE).unwrap();
        std::fs::write(nested.join("a.test.gmi"), SAMPLE).unwrap();
        std::fs::write(nested.join("notes.gmi"), "ignored").unwrap();

        let all = discover_categorized(dir.path());
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["", "lists/runs"]);

        let only = select_categories(all, &["lists".to_string()]);
        assert_eq!(only.keys().collect::<Vec<_>>(), vec!["lists/runs"]);
        assert_eq!(run_tests(dir.path(), true, &[]), 0);
    }
}
