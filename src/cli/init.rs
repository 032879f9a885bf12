//! Initialize a new project with an `ipub.json` manifest.
//!
//! Creates a starter manifest in the target directory:
//!
//! ```bash
//! ipub init
//! ipub init --path ./my-site
//! ipub init --force          # overwrite an existing manifest
//! ```
//!
//! The command fails if a manifest already exists and `--force` is not
//! given.

use anyhow::{Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::constants::MANIFEST_NAME;

const MANIFEST_TEMPLATE: &str = r#"{
    "sources": {
        "index.html": {
            "type": "replace",
            "replace": {
                "<<STYLE>>": "style.css"
            }
        }
    },
    "targets": ["index.html"]
}
"#;

/// Command to scaffold a new manifest file.
#[derive(Args)]
pub struct InitCommand {
    /// Directory to create the manifest in (defaults to the current directory)
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Overwrite an existing manifest
    #[arg(short, long)]
    force: bool,
}

impl InitCommand {
    /// Write the starter manifest and print next steps.
    pub async fn execute(self) -> Result<()> {
        let target_dir = self.path.unwrap_or_else(|| PathBuf::from("."));
        let manifest_path = target_dir.join(MANIFEST_NAME);

        if manifest_path.exists() && !self.force {
            return Err(anyhow!(
                "manifest already exists at {}. Use --force to overwrite",
                manifest_path.display()
            ));
        }

        std::fs::create_dir_all(&target_dir)?;
        std::fs::write(&manifest_path, MANIFEST_TEMPLATE)?;

        println!("{} created {}", "ok:".green().bold(), manifest_path.display());
        println!("\nNext steps:");
        println!("  1. Declare your sources in {MANIFEST_NAME}");
        println!("  2. Run {} to check the graph", "ipub validate --resolve".cyan());
        println!("  3. Run {} to publish", "ipub build".cyan());
        Ok(())
    }
}
