use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_renderer::{render_with_options, RenderOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Document or directory to render (defaults to the configured srcDir)
    pub path: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Put block elements on their own indented lines
    #[arg(long)]
    pub pretty: bool,
}

pub fn render(args: RenderArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let root = resolve_input(args.path.as_deref(), &config, cwd)?;

    let mut options = config.render.clone();
    options.pretty |= args.pretty;
    let out_dir = match &args.out_dir {
        Some(out) => PathBuf::from(cwd).join(out),
        None => config.get_out_dir(cwd),
    };

    if !args.stdout {
        println!("{}", "🖨  Rendering documents...".bright_blue().bold());
    }

    let documents = find_documents(&root);
    if documents.is_empty() {
        println!("{}", "⚠️  No .json documents found".yellow());
        return Ok(());
    }
    info!(count = documents.len(), root = %root.display(), "Rendering documents");

    let mut success_count = 0;
    let mut error_count = 0;

    for document in &documents {
        let relative_path = relative_to(document, &root);
        let result = if args.stdout {
            render_to_stdout(document, &options)
        } else {
            render_file(document, relative_path, &out_dir, &options)
                .map(|output| output.display().to_string())
        };

        match result {
            Ok(output_path) => {
                success_count += 1;
                if !args.stdout {
                    println!(
                        "  {} {} → {}",
                        "✓".green(),
                        relative_path.display(),
                        output_path
                    );
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} documents failed to render", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Rendered {} documents successfully",
            "✅".green(),
            success_count
        );
        Ok(())
    } else {
        Err(anyhow!(
            "Rendered {} documents, {} errors",
            success_count,
            error_count
        ))
    }
}

/// Resolve the file or directory a command works on
pub(crate) fn resolve_input(path: Option<&str>, config: &Config, cwd: &str) -> Result<PathBuf> {
    let root = match path {
        Some(path) => PathBuf::from(cwd).join(path),
        None => config.get_src_dir(cwd),
    };
    if !root.exists() {
        return Err(anyhow!("Path does not exist: {}", root.display()));
    }
    Ok(root)
}

/// Every stored document under `root`, sorted by path
///
/// A file `root` is returned as-is. The project config file is skipped.
pub(crate) fn find_documents(root: &Path) -> Vec<PathBuf> {
    if root.is_file() {
        return vec![root.to_path_buf()];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|s| s.to_str()) == Some("json")
                && path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_CONFIG_NAME)
        })
        .collect();
    files.sort();
    files
}

pub(crate) fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    if path == root {
        return path.file_name().map(Path::new).unwrap_or(path);
    }
    path.strip_prefix(root).unwrap_or(path)
}

fn render_to_stdout(document: &Path, options: &RenderOptions) -> Result<String> {
    let source = fs::read_to_string(document)?;
    println!("{}", render_with_options(&source, options));
    Ok("stdout".to_string())
}

fn render_file(
    document: &Path,
    relative_path: &Path,
    out_dir: &Path,
    options: &RenderOptions,
) -> Result<PathBuf> {
    let source = fs::read_to_string(document)?;
    let markup = render_with_options(&source, options);

    let output_file = out_dir.join(relative_path).with_extension("html");
    if let Some(parent) = output_file.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_file, markup)?;

    Ok(output_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> (TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_str().unwrap().to_string();
        fs::create_dir_all(dir.path().join("content/posts")).unwrap();
        (dir, cwd)
    }

    fn args() -> RenderArgs {
        RenderArgs {
            path: None,
            stdout: false,
            out_dir: None,
            pretty: false,
        }
    }

    #[test]
    fn test_renders_nested_documents() {
        let (dir, cwd) = project();
        fs::write(
            dir.path().join("content/posts/hello.json"),
            r#"{"root":{"children":[{"type":"paragraph","version":1,"children":[{"type":"text","version":1,"text":"Hi","format":1}]}]}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("content/broken.json"), "{ not json").unwrap();
        fs::write(dir.path().join("content/notes.txt"), "ignored").unwrap();

        render(args(), &cwd).unwrap();

        let hello = fs::read_to_string(dir.path().join("dist/posts/hello.html")).unwrap();
        assert_eq!(hello, "<p><strong>Hi</strong></p>");
        let broken = fs::read_to_string(dir.path().join("dist/broken.html")).unwrap();
        assert_eq!(broken, "<p><br /></p>");
        assert!(!dir.path().join("dist/notes.html").exists());
    }

    #[test]
    fn test_out_dir_override_and_single_file() {
        let (dir, cwd) = project();
        fs::write(dir.path().join("content/a.json"), "").unwrap();

        render(
            RenderArgs {
                path: Some("content/a.json".to_string()),
                out_dir: Some("public".to_string()),
                ..args()
            },
            &cwd,
        )
        .unwrap();

        assert!(dir.path().join("public/a.html").exists());
        assert!(!dir.path().join("dist").exists());
    }

    #[test]
    fn test_missing_source_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = render(args(), dir.path().to_str().unwrap());
        assert!(result.is_err());
    }

    #[test]
    fn test_find_documents_skips_config() {
        let (dir, _) = project();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{}").unwrap();
        fs::write(dir.path().join("content/b.json"), "{}").unwrap();
        fs::write(dir.path().join("content/posts/a.json"), "{}").unwrap();

        let found = find_documents(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|path| relative_to(path, dir.path()).to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("content/b.json"), PathBuf::from("content/posts/a.json")]
        );
    }
}
