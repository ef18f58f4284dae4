//! Runs the html5lib tree-construction fixtures in `tests/data`.
//!
//! Each `.dat` file holds tests separated by blank lines. A test has a
//! `#data` section with the input, an `#errors` section (only counted
//! here), optional `#document-fragment` and `#script-off` / `#script-on`
//! sections, and the expected `#document` dump.

use std::fs;
use std::path::{Path, PathBuf};

use lark_dom::Namespace;
use lark_html::{FragmentContext, HTMLParser, ParserOptions, parse_fragment};

/// One test case from a `.dat` file
#[derive(Debug, Default)]
struct Fixture {
    file: String,
    line: usize,
    data: String,
    fragment: Option<String>,
    scripting: bool,
    document: String,
}

/// Helper to split a `.dat` file into fixtures
fn parse_dat(file: &str, text: &str) -> Vec<Fixture> {
    let mut fixtures = Vec::new();
    let mut current: Option<Fixture> = None;
    let mut section = "";

    for (index, line) in text.lines().enumerate() {
        if line == "#data" {
            if let Some(done) = current.take() {
                fixtures.push(done);
            }
            current = Some(Fixture {
                file: file.to_string(),
                line: index + 1,
                scripting: true,
                ..Fixture::default()
            });
            section = "#data";
            continue;
        }
        let Some(fixture) = current.as_mut() else {
            continue;
        };
        match line {
            "#errors" | "#new-errors" | "#document" | "#document-fragment" => {
                section = if line == "#new-errors" { "#errors" } else { line };
            }
            "#script-off" => fixture.scripting = false,
            "#script-on" => fixture.scripting = true,
            _ => match section {
                "#data" => {
                    if !fixture.data.is_empty() {
                        fixture.data.push('\n');
                    }
                    fixture.data.push_str(line);
                }
                "#document-fragment" => fixture.fragment = Some(line.to_string()),
                "#document" if !line.is_empty() => {
                    fixture.document.push_str(line);
                    fixture.document.push('\n');
                }
                _ => {}
            },
        }
    }
    if let Some(done) = current {
        fixtures.push(done);
    }
    fixtures
}

/// Helper to turn a `#document-fragment` line into a context element
fn context_for(spec: &str) -> FragmentContext {
    match spec.split_once(' ') {
        Some(("svg", name)) => FragmentContext::new(name, Namespace::Svg),
        Some(("math", name)) => FragmentContext::new(name, Namespace::MathMl),
        _ => FragmentContext::html(spec),
    }
}

/// Helper to run one fixture and return its dump
fn run(fixture: &Fixture) -> String {
    let options = ParserOptions {
        scripting_enabled: fixture.scripting,
        ..ParserOptions::default()
    };
    match &fixture.fragment {
        Some(context) if fixture.scripting => {
            let parsed = parse_fragment(&fixture.data, &context_for(context)).expect("valid context");
            parsed.tree.to_test_format(parsed.fragment)
        }
        Some(context) => {
            let (tree, fragment, _) = HTMLParser::new(&fixture.data)
                .with_options(options)
                .into_fragment(&context_for(context))
                .expect("valid context")
                .run_fragment();
            tree.to_test_format(fragment)
        }
        None => {
            let tree = HTMLParser::new(&fixture.data).with_options(options).run();
            tree.to_test_format(tree.root())
        }
    }
}

/// Helper to list the fixture files
fn fixture_files() -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data");
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .expect("tests/data exists")
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "dat"))
        .collect();
    files.sort();
    files
}

#[test]
fn test_html5lib_tree_construction() {
    let mut ran = 0usize;
    let mut failures = Vec::new();

    for path in fixture_files() {
        let text = fs::read_to_string(&path).expect("readable fixture");
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        for fixture in parse_dat(&name, &text) {
            ran += 1;
            let actual = run(&fixture);
            if actual != fixture.document {
                failures.push(format!(
                    "{}:{}\n#data\n{}\n--- expected\n{}--- actual\n{}",
                    fixture.file, fixture.line, fixture.data, fixture.document, actual
                ));
            }
        }
    }

    assert!(ran > 0, "no fixtures found");
    assert!(
        failures.is_empty(),
        "{} of {ran} fixtures failed:\n\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn test_dat_parser_reads_sections() {
    let text = "#data\n<p>\n#errors\n(1,3): expected-doctype-but-got-start-tag\n\
                #document-fragment\nsvg path\n#script-off\n#document\n| <p>\n\n\
                #data\nx\n#errors\n#document\n| \"x\"\n";
    let fixtures = parse_dat("inline.dat", text);
    assert_eq!(fixtures.len(), 2);
    assert_eq!(fixtures[0].data, "<p>");
    assert_eq!(fixtures[0].fragment.as_deref(), Some("svg path"));
    assert!(!fixtures[0].scripting);
    assert_eq!(fixtures[0].document, "| <p>\n");
    assert_eq!(fixtures[1].line, 11);
    assert!(fixtures[1].scripting);
    assert_eq!(context_for("svg path").namespace, Namespace::Svg);
}
