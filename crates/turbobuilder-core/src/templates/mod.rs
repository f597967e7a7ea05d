//! Project templates used by `--generate`
//!
//! - Template manifest types (RootManifest, TemplateManifest)
//! - Template fetching from the embedded set, a local directory or a remote URL
//! - Template copying
//! - Version compatibility checking

pub mod copier;
pub mod fetcher;
pub mod manifest;
pub mod version;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub use copier::copy_template;
pub use fetcher::{TemplateFetcher, TemplateSource};
pub use manifest::{RootManifest, SharedFile, TemplateManifest};
pub use version::check_compatibility;

/// Build zip files for all templates in a directory, ready to be served from
/// the URL in `TURBOBUILDER_TEMPLATE_URL`
pub async fn build_zips(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        anyhow::bail!("Template directory not found: {}", dir.display());
    }

    let root_manifest = fetcher::read_local_root_manifest(dir).await?;

    println!("{}", "Building turbobuilder template zips...".cyan().bold());
    println!();

    let mut built = 0;
    for template_name in &root_manifest.templates {
        let template_path = dir.join(template_name);
        if !template_path.exists() {
            eprintln!(
                "{} Template directory not found: {}",
                "Warning:".yellow(),
                template_path.display()
            );
            continue;
        }

        print!("  {} {}...", "->".blue(), template_name);

        match TemplateFetcher::build_local_zip(dir, template_name, &root_manifest.shared_files) {
            Ok(zip_bytes) => {
                let zip_path = dir.join(format!("{}.zip", template_name));
                std::fs::write(&zip_path, &zip_bytes)
                    .with_context(|| format!("Failed to write {}", zip_path.display()))?;
                println!(" {} ({} bytes)", "done".green(), zip_bytes.len());
                built += 1;
            }
            Err(e) => {
                println!(" {}", "failed".red());
                eprintln!("    Error: {}", e);
            }
        }
    }

    println!();
    println!(
        "{} {} template zip(s) in {}",
        "Built".green().bold(),
        built,
        dir.display()
    );

    Ok(built)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_zips_writes_one_zip_per_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("template.yaml"),
            "templates: [lib_php, absent]\n",
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("lib_php")).unwrap();
        std::fs::write(
            dir.path().join("lib_php/template.yaml"),
            "name: lib_php\ndescription: test\nversion: 0.1.0\nfiles: []\n",
        )
        .unwrap();

        let built = build_zips(dir.path()).await.unwrap();

        assert_eq!(built, 1);
        assert!(dir.path().join("lib_php.zip").is_file());
        assert!(!dir.path().join("absent.zip").exists());
    }

    #[tokio::test]
    async fn test_build_zips_missing_dir() {
        assert!(build_zips(Path::new("/nonexistent/templates")).await.is_err());
    }
}
