use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

const WELCOME_DOCUMENT: &str = r#"{"root":{"children":[{"type":"heading","version":1,"tag":"h1","children":[{"type":"text","version":1,"text":"Welcome to Folio","format":0}]},{"type":"paragraph","version":1,"children":[{"type":"text","version":1,"text":"Edit this document, then run ","format":0},{"type":"text","version":1,"text":"folio render","format":16}]}]}}"#;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Source directory
    #[arg(short, long, default_value = "content")]
    pub src_dir: String,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Folio project...".bright_blue().bold());

    let config = Config {
        src_dir: args.src_dir.clone(),
        ..Config::default()
    };

    let src_dir = config.get_src_dir(cwd);
    if !src_dir.exists() {
        fs::create_dir_all(&src_dir)?;
        println!("  {} Created {}/", "✓".green(), args.src_dir);
    }

    let welcome = src_dir.join("welcome.json");
    if !welcome.exists() {
        fs::write(&welcome, WELCOME_DOCUMENT)?;
        println!("  {} Created welcome.json", "✓".green());
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Add documents to {}/", args.src_dir);
    println!("  2. Run: folio render");
    println!("  3. Check output in {}/", config.out_dir);

    Ok(())
}
