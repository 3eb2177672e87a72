use super::render::{find_documents, relative_to, resolve_input};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_editor::{Editor, EditorConfig};
use std::fs;
use tracing::info;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Document or directory to normalize (defaults to the configured srcDir)
    pub path: Option<String>,

    /// Report documents that are not in canonical form without rewriting them
    #[arg(long)]
    pub check: bool,
}

pub fn normalize(args: NormalizeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let root = resolve_input(args.path.as_deref(), &config, cwd)?;

    let documents = find_documents(&root);
    if documents.is_empty() {
        println!("{}", "⚠️  No .json documents found".yellow());
        return Ok(());
    }
    info!(count = documents.len(), check = args.check, "Normalizing documents");

    let mut changed = 0;
    for document in &documents {
        let relative_path = relative_to(document, &root);
        let source = fs::read_to_string(document)?;
        let Some(normalized) = normalized_form(&source, &config.editor) else {
            continue;
        };
        changed += 1;

        if args.check {
            println!("  {} {}", "✗".red(), relative_path.display());
        } else {
            fs::write(document, &normalized)?;
            println!("  {} {}", "✓".green(), relative_path.display());
        }
    }

    println!();
    match (changed, args.check) {
        (0, _) => {
            println!(
                "{} {} documents already canonical",
                "✅".green(),
                documents.len()
            );
            Ok(())
        }
        (n, true) => Err(anyhow!("{} of {} documents need normalizing", n, documents.len())),
        (n, false) => {
            println!("{} Normalized {} documents", "✅".green(), n);
            Ok(())
        }
    }
}

/// Canonical export of `source`, or `None` when it is already canonical
fn normalized_form(source: &str, config: &EditorConfig) -> Option<String> {
    let mut editor = Editor::new(config.clone());
    editor.load(source);
    let normalized = editor.export();
    (normalized != source.trim_end()).then_some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: &str = r#"{"root":{"children":[{"type":"paragraph","version":1,"children":[{"type":"text","version":1,"text":"Hi","format":0}]}]}}"#;

    fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        for (name, content) in files {
            fs::write(dir.path().join("content").join(name), content).unwrap();
        }
        dir
    }

    #[test]
    fn test_canonical_documents_are_left_alone() {
        assert_eq!(normalized_form(CANONICAL, &EditorConfig::default()), None);
        assert_eq!(
            normalized_form(&format!("{}\n", CANONICAL), &EditorConfig::default()),
            None
        );
    }

    #[test]
    fn test_rewrites_legacy_and_pretty_documents() {
        let pretty = serde_json::to_string_pretty(
            &serde_json::from_str::<serde_json::Value>(CANONICAL).unwrap(),
        )
        .unwrap();
        let dir = project(&[("pretty.json", &pretty), ("legacy.json", "Hi")]);
        let cwd = dir.path().to_str().unwrap();

        normalize(
            NormalizeArgs {
                path: None,
                check: false,
            },
            cwd,
        )
        .unwrap();

        for name in ["pretty.json", "legacy.json"] {
            let written = fs::read_to_string(dir.path().join("content").join(name)).unwrap();
            assert_eq!(written, CANONICAL, "{name}");
        }
    }

    #[test]
    fn test_check_reports_without_writing() {
        let dir = project(&[("ok.json", CANONICAL), ("legacy.json", "Hi")]);
        let cwd = dir.path().to_str().unwrap();

        let result = normalize(
            NormalizeArgs {
                path: None,
                check: true,
            },
            cwd,
        );

        assert!(result.is_err());
        let untouched = fs::read_to_string(dir.path().join("content/legacy.json")).unwrap();
        assert_eq!(untouched, "Hi");
    }
}
