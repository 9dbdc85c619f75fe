//! Sprig CLI
//!
//! Compile CSS selectors and inspect the result, or match them against a
//! document described as JSON.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use sprig_common::warning::clear_warnings;
use sprig_css::{CompiledSelector, Matcher, NamespaceMap, compile_selector_list, query_all};
use sprig_dom::{DocumentOptions, DomTree, Element, ElementRef};

/// Sprig: static CSS selector compilation and matching
#[derive(Parser, Debug)]
#[command(name = "sprig")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Show what a selector list compiles to
    sprig compile 'ul > li:nth-child(2n+1), a:hover'

    # Resolve namespace prefixes
    sprig compile 'svg|rect' --ns svg=http://www.w3.org/2000/svg

    # Match against an HTML-style JSON document
    sprig match 'p.intro, :lang(fr)' --document page.json --html --lang en
"#)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile selectors and print specificity, pseudo-element and hints
    Compile {
        /// Comma-separated selector list
        #[arg(value_name = "SELECTORS")]
        selectors: String,

        #[command(flatten)]
        namespaces: NamespaceArgs,
    },
    /// Print the path of every element matched by the selectors
    Match {
        /// Comma-separated selector list
        #[arg(value_name = "SELECTORS")]
        selectors: String,

        /// JSON document to match against
        #[arg(short, long, value_name = "FILE")]
        document: PathBuf,

        /// Treat the document as HTML (default namespace, `lang` attribute)
        #[arg(long)]
        html: bool,

        /// Transport-level language used when no element declares one
        #[arg(long, value_name = "TAG")]
        lang: Option<String>,

        #[command(flatten)]
        namespaces: NamespaceArgs,
    },
}

#[derive(Args, Debug)]
struct NamespaceArgs {
    /// Namespace prefix binding, may be repeated
    #[arg(long = "ns", value_name = "PREFIX=URL", value_parser = parse_prefix)]
    prefixes: Vec<(String, String)>,

    /// Default namespace for type selectors
    #[arg(long, value_name = "URL")]
    default_ns: Option<String>,
}

impl NamespaceArgs {
    fn to_map(&self) -> NamespaceMap {
        let mut namespaces = NamespaceMap::new();
        namespaces.default.clone_from(&self.default_ns);
        for (prefix, url) in &self.prefixes {
            namespaces = namespaces.with_prefix(prefix, url);
        }
        namespaces
    }
}

fn parse_prefix(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .filter(|(prefix, _)| !prefix.is_empty())
        .map(|(prefix, url)| (prefix.to_string(), url.to_string()))
        .ok_or_else(|| format!("expected PREFIX=URL, got '{value}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    clear_warnings();

    match cli.command {
        Command::Compile {
            selectors,
            namespaces,
        } => {
            let compiled = compile_selector_list(&selectors, &namespaces.to_map())
                .with_context(|| format!("failed to compile '{selectors}'"))?;
            for selector in &compiled {
                print_selector(selector);
            }
        }
        Command::Match {
            selectors,
            document,
            html,
            lang,
            namespaces,
        } => {
            let compiled = compile_selector_list(&selectors, &namespaces.to_map())
                .with_context(|| format!("failed to compile '{selectors}'"))?;
            let source = fs::read_to_string(&document)
                .with_context(|| format!("failed to read {}", document.display()))?;
            let options = DocumentOptions {
                html,
                default_lang: lang,
            };
            let tree = DomTree::from_json(&source, &options)
                .with_context(|| format!("failed to load {}", document.display()))?;
            print_matches(&tree, &compiled);
        }
    }

    Ok(())
}

/// Print one compiled selector (compile mode)
fn print_selector(selector: &CompiledSelector) {
    let kind = match selector.matcher {
        Matcher::Always => "always".green().to_string(),
        Matcher::Never => "never".red().to_string(),
        Matcher::Predicate(_) => "predicate".cyan().to_string(),
    };
    println!("{} {kind}", selector.specificity.bold());

    if let Some(pseudo) = &selector.pseudo_element {
        println!("  pseudo-element: ::{pseudo}");
    }
    let hints = [
        ("id", &selector.id),
        ("class", &selector.class_name),
        ("local name", &selector.local_name),
        ("namespace", &selector.namespace),
    ];
    for (label, hint) in hints {
        if let Some(value) = hint {
            println!("  {label}: {}", value.dimmed());
        }
    }
}

/// Print every element any selector matches (match mode)
fn print_matches(tree: &DomTree, selectors: &[CompiledSelector]) {
    let Some(root) = tree.document_element().and_then(|id| tree.element(id)) else {
        println!("{}", "document has no root element".yellow());
        return;
    };

    let matched: Vec<_> = query_all(root, selectors).collect();
    for element in &matched {
        println!("{}", element_path(element));
    }
    println!("{}", format!("{} matching elements", matched.len()).dimmed());
}

/// `html > body > p:nth-child(2)` style path from the root element
fn element_path(element: &ElementRef<'_>) -> String {
    let mut steps: Vec<String> = element
        .ancestors()
        .map(|ancestor| path_step(&ancestor))
        .collect();
    steps.reverse();
    steps.push(path_step(element).bold().to_string());
    steps.join(" > ")
}

fn path_step(element: &ElementRef<'_>) -> String {
    let mut step = element.local_name().to_string();
    if let Some(id) = element.id() {
        step.push('#');
        step.push_str(id);
    }
    if element.parent().is_some() {
        let _ = write!(step, ":nth-child({})", element.sibling_index() + 1);
    }
    step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefix() {
        assert_eq!(
            parse_prefix("svg=http://www.w3.org/2000/svg"),
            Ok(("svg".to_string(), "http://www.w3.org/2000/svg".to_string()))
        );
        assert_eq!(parse_prefix("empty="), Ok(("empty".to_string(), String::new())));
        assert!(parse_prefix("=urn:x").is_err());
        assert!(parse_prefix("svg").is_err());
    }

    #[test]
    fn test_namespace_args_to_map() {
        let args = NamespaceArgs {
            prefixes: vec![("svg".to_string(), "urn:svg".to_string())],
            default_ns: Some("urn:default".to_string()),
        };
        let map = args.to_map();
        assert_eq!(map.resolve("svg"), Some("urn:svg"));
        assert_eq!(map.default.as_deref(), Some("urn:default"));
    }

    #[test]
    fn test_cli_parses_match_command() {
        let cli = Cli::try_parse_from([
            "sprig", "match", "p", "--document", "page.json", "--html", "--ns", "x=urn:x",
        ])
        .unwrap();
        let Command::Match { html, namespaces, .. } = cli.command else {
            panic!("expected the match command");
        };
        assert!(html);
        assert_eq!(namespaces.prefixes.len(), 1);
    }
}
