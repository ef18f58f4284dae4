//! Lark CLI - HTML parsing and debugging tool
//!
//! Usage:
//!   lark <file>                     Print the tree in html5lib test format
//!   lark <file> --json              Output the tree and errors as JSON
//!   lark <file> --tokens            Show tokenizer output first
//!   lark --html '<p>x' --errors     Parse a string and list parse errors
//!   lark --html '<td>x' --fragment tr

mod snapshot;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use lark_common::warning::clear_warnings;
use lark_dom::Namespace;
use lark_html::{FragmentContext, HTMLParser, HTMLTokenizer, ParserOptions};
use owo_colors::OwoColorize;

use snapshot::Report;

/// Lark: a WHATWG HTML parser
#[derive(Parser, Debug)]
#[command(name = "lark")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Dump a file as an html5lib tree
    lark page.html

    # Parse inline HTML and show the parse errors
    lark --html '<b>1<p>2</b>3' --errors

    # Parse a fragment in a table body
    lark --html '<tr><td>x' --fragment tbody

    # Parse a fragment inside an SVG element
    lark --html '<circle/>' --fragment 'svg svg'
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse this HTML string instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parse as a fragment in this context element (`svg name` and
    /// `math name` select a foreign namespace)
    #[arg(short, long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Parse as if scripting were disabled
    #[arg(long)]
    no_scripting: bool,

    /// Show the tokenizer output before the tree
    #[arg(short, long)]
    tokens: bool,

    /// List parse errors after the tree
    #[arg(short, long)]
    errors: bool,

    /// Output the tree and errors as JSON
    #[arg(short, long)]
    json: bool,

    /// Show tokens and errors, and log each error as it is found
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let html = load_input(&cli)?;
    clear_warnings();

    if cli.tokens || cli.verbose {
        let tokens: Vec<_> = HTMLTokenizer::new(&html).collect();
        println!("{}", format!("=== HTML Tokens ({}) ===", tokens.len()).bold());
        for (i, token) in tokens.iter().enumerate() {
            println!("  {i:3}: {token:?}");
        }
        println!();
    }

    let options = ParserOptions {
        scripting_enabled: !cli.no_scripting,
        log_issues: cli.verbose,
    };
    let parser = HTMLParser::new(&html).with_options(options);

    let (tree, root, issues) = match &cli.fragment {
        Some(context) => parser.into_fragment(&context_from_arg(context))?.run_fragment(),
        None => {
            let (tree, issues) = parser.run_with_issues();
            let root = tree.root();
            (tree, root, issues)
        }
    };

    if cli.json {
        let report = Report::new(&tree, root, &issues);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", tree.to_test_format(root));

    if cli.errors || cli.verbose {
        println!();
        if issues.is_empty() {
            println!("{}", "No parse errors".green());
        } else {
            println!("{}", format!("=== Parse Errors ({}) ===", issues.len()).bold());
            for issue in &issues {
                println!("  {}", issue.red());
            }
        }
    }
    Ok(())
}

fn load_input(cli: &Cli) -> Result<String> {
    if let Some(html) = &cli.html {
        return Ok(html.clone());
    }
    let Some(path) = &cli.path else {
        bail!("no input file or --html provided");
    };
    fs::read_to_string(path).with_context(|| format!("reading '{}'", path.display()))
}

/// `tbody`, `svg path` or `math mi`, as html5lib writes contexts.
fn context_from_arg(arg: &str) -> FragmentContext {
    match arg.split_once(' ') {
        Some(("svg", name)) => FragmentContext::new(name, Namespace::Svg),
        Some(("math", name)) => FragmentContext::new(name, Namespace::MathMl),
        _ => FragmentContext::html(arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_from_arg() {
        assert_eq!(context_from_arg("tbody"), FragmentContext::html("tbody"));
        assert_eq!(
            context_from_arg("svg foreignObject"),
            FragmentContext::new("foreignObject", Namespace::Svg)
        );
        assert_eq!(context_from_arg("math mi").namespace, Namespace::MathMl);
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::parse_from(["lark", "--html", "<p>", "--fragment", "div", "-e"]);
        assert_eq!(cli.html.as_deref(), Some("<p>"));
        assert_eq!(cli.fragment.as_deref(), Some("div"));
        assert!(cli.errors);
        assert!(!cli.no_scripting);
    }
}
