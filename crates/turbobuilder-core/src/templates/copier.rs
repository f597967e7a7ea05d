//! Template file copying

use crate::templates::fetcher::TemplateFetcher;
use crate::templates::manifest::TemplateManifest;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// Copy every file listed by a template manifest into the target directory
pub async fn copy_template(
    fetcher: &mut TemplateFetcher,
    template_name: &str,
    manifest: &TemplateManifest,
    target_dir: &Path,
) -> Result<Vec<String>> {
    fs::create_dir_all(target_dir)
        .await
        .context("Failed to create target directory")?;

    let mut copied_files = Vec::new();

    for file_path in &manifest.files {
        let target_path = target_dir.join(file_path);
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = fetcher.fetch_file_bytes(template_name, file_path).await?;
        fs::write(&target_path, &content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        tracing::debug!(file = %file_path, "copied template file");
        copied_files.push(file_path.clone());
    }

    Ok(copied_files)
}
