//! Template fetching from the embedded set, a local directory or a remote URL
//!
//! All sources go through zip files for consistency:
//! - Embedded: templates compiled into the binary are packed into a zip on first use
//! - Local: zips are built from template folders on disk
//! - Remote: pre-built zips are downloaded (see `build_zips`)
//!
//! This keeps generation identical between development and production.

use super::manifest::{RootManifest, SharedFile, TemplateManifest};
use crate::config::{TEMPLATE_URL_ENV, USER_AGENT};
use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use tokio::fs;
use url::Url;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

static EMBEDDED_TEMPLATES: Dir = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Where project templates are read from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded,
    Local(PathBuf),
    Remote(Url),
}

impl TemplateSource {
    /// Resolve the source from the environment: a remote URL when
    /// `TURBOBUILDER_TEMPLATE_URL` is set, the embedded templates otherwise
    pub fn from_env() -> Result<Self> {
        match std::env::var(TEMPLATE_URL_ENV) {
            Ok(url_str) if !url_str.trim().is_empty() => {
                let url = Url::parse(url_str.trim())
                    .with_context(|| format!("Invalid template URL: {}", url_str))?;
                Ok(Self::Remote(url))
            }
            _ => Ok(Self::Embedded),
        }
    }

    pub fn local(path: PathBuf) -> Self {
        Self::Local(path)
    }

    /// Read a file relative to the templates root. `None` when it does not exist
    fn read_file(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Embedded => Ok(EMBEDDED_TEMPLATES
                .get_file(relative_path)
                .map(|file| file.contents().to_vec())),
            Self::Local(root) => {
                let path = root.join(relative_path);
                if !path.is_file() {
                    return Ok(None);
                }
                std::fs::read(&path)
                    .map(Some)
                    .with_context(|| format!("Failed to read {}", path.display()))
            }
            Self::Remote(_) => Ok(None),
        }
    }
}

/// Cached template data extracted from zip
#[derive(Debug, Clone)]
struct TemplateCache {
    manifest: TemplateManifest,
    files: HashMap<String, Vec<u8>>,
}

/// Template fetcher - retrieves and caches templates from any source
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
    template_cache: HashMap<String, TemplateCache>,
}

impl TemplateFetcher {
    pub fn new(source: TemplateSource) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            template_cache: HashMap::new(),
        }
    }

    /// Create a fetcher using the environment to pick the source
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(TemplateSource::from_env()?))
    }

    /// Create a fetcher for templates in a local directory
    pub fn from_local(path: PathBuf) -> Self {
        Self::new(TemplateSource::local(path))
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn download(&self, url: Url) -> Result<Vec<u8>> {
        tracing::debug!(%url, "downloading template resource");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        if !response.status().is_success() {
            anyhow::bail!("Failed to fetch {}: HTTP {}", url, response.status());
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch the root manifest listing available templates
    pub async fn fetch_root_manifest(&self) -> Result<RootManifest> {
        let content = match &self.source {
            TemplateSource::Remote(base_url) => {
                self.download(Self::build_url(base_url, "template.yaml")?)
                    .await?
            }
            source => source
                .read_file("template.yaml")?
                .ok_or_else(|| anyhow::anyhow!("Root template.yaml not found"))?,
        };
        serde_yaml::from_slice(&content).context("Failed to parse root manifest")
    }

    /// Build a zip file for a template folder (reads the files list from its template.yaml)
    /// Includes shared files from the templates root with optional renaming
    pub fn build_local_zip(
        template_dir: &Path,
        template_name: &str,
        shared_files: &[SharedFile],
    ) -> Result<Vec<u8>> {
        Self::build_zip(
            &TemplateSource::local(template_dir.to_path_buf()),
            template_name,
            shared_files,
        )
    }

    fn build_zip(
        source: &TemplateSource,
        template_name: &str,
        shared_files: &[SharedFile],
    ) -> Result<Vec<u8>> {
        let manifest_path = format!("{}/template.yaml", template_name);
        let manifest_content = source
            .read_file(&manifest_path)?
            .ok_or_else(|| anyhow::anyhow!("Template '{}' not found", template_name))?;
        let mut manifest: TemplateManifest = serde_yaml::from_slice(&manifest_content)
            .with_context(|| format!("Failed to parse template '{}' manifest", template_name))?;

        let template_files = manifest.files.clone();
        for shared in shared_files {
            let dest = shared.destination().to_string();
            if !manifest.files.contains(&dest) {
                manifest.files.push(dest);
            }
        }

        let manifest_content =
            serde_yaml::to_string(&manifest).context("Failed to serialize updated manifest")?;

        let mut zip_buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut zip_buffer));
            let options =
                SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

            zip.start_file(&manifest_path, options)?;
            zip.write_all(manifest_content.as_bytes())?;

            for shared in shared_files {
                match source.read_file(&shared.source)? {
                    Some(content) => {
                        zip.start_file(format!("{}/{}", template_name, shared.destination()), options)?;
                        zip.write_all(&content)?;
                    }
                    None => tracing::warn!(file = %shared.source, "shared template file not found"),
                }
            }

            let shared_dests: HashSet<_> = shared_files.iter().map(|s| s.destination()).collect();
            for file_path in template_files
                .iter()
                .filter(|f| !shared_dests.contains(f.as_str()))
            {
                let zip_path = format!("{}/{}", template_name, file_path);
                match source.read_file(&zip_path)? {
                    Some(content) => {
                        zip.start_file(&zip_path, options)?;
                        zip.write_all(&content)?;
                    }
                    None => tracing::warn!(
                        file = %file_path,
                        template = template_name,
                        "file listed in template manifest not found"
                    ),
                }
            }

            zip.finish()?;
        }

        Ok(zip_buffer)
    }

    /// Extract a zip into the template cache
    fn extract_zip_to_cache(zip_bytes: &[u8], template_name: &str) -> Result<TemplateCache> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes)).with_context(|| {
            format!("Failed to read zip archive for template '{}'", template_name)
        })?;

        let mut files: HashMap<String, Vec<u8>> = HashMap::new();
        let mut manifest: Option<TemplateManifest> = None;

        // Entries are stored as {template_name}/path
        let prefix = format!("{}/", template_name);

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }

            let full_path = file.name().to_string();
            let relative_path = full_path
                .strip_prefix(&prefix)
                .unwrap_or(&full_path)
                .to_string();

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;

            if relative_path == "template.yaml" {
                manifest = Some(serde_yaml::from_slice(&contents).with_context(|| {
                    format!("Failed to parse template '{}' manifest", template_name)
                })?);
            }

            files.insert(relative_path, contents);
        }

        let manifest = manifest.ok_or_else(|| {
            anyhow::anyhow!("Template '{}' zip missing template.yaml", template_name)
        })?;

        Ok(TemplateCache { manifest, files })
    }

    async fn fetch_and_cache_template(&mut self, template_name: &str) -> Result<()> {
        if self.template_cache.contains_key(template_name) {
            return Ok(());
        }

        let zip_bytes = match &self.source {
            TemplateSource::Remote(base_url) => {
                let zip_url = Self::build_url(base_url, &format!("{}.zip", template_name))?;
                self.download(zip_url)
                    .await
                    .with_context(|| format!("Failed to fetch template '{}'", template_name))?
            }
            source => {
                let root_manifest = self.fetch_root_manifest().await?;
                if !root_manifest.contains(template_name) {
                    anyhow::bail!("Template '{}' not found", template_name);
                }
                Self::build_zip(source, template_name, &root_manifest.shared_files)?
            }
        };

        let cache = Self::extract_zip_to_cache(&zip_bytes, template_name)?;
        self.template_cache.insert(template_name.to_string(), cache);

        Ok(())
    }

    /// Fetch a specific template's manifest
    pub async fn fetch_template_manifest(
        &mut self,
        template_name: &str,
    ) -> Result<TemplateManifest> {
        self.fetch_and_cache_template(template_name).await?;
        let cache = self
            .template_cache
            .get(template_name)
            .ok_or_else(|| anyhow::anyhow!("Template '{}' not found in cache", template_name))?;
        Ok(cache.manifest.clone())
    }

    /// Fetch a file from a template as bytes
    pub async fn fetch_file_bytes(
        &mut self,
        template_name: &str,
        file_path: &str,
    ) -> Result<Vec<u8>> {
        self.fetch_and_cache_template(template_name).await?;
        let cache = self
            .template_cache
            .get(template_name)
            .ok_or_else(|| anyhow::anyhow!("Template '{}' not found in cache", template_name))?;
        cache.files.get(file_path).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "File '{}' not found in template '{}'",
                file_path,
                template_name
            )
        })
    }
}

/// Read the root manifest of a templates directory on disk
pub(crate) async fn read_local_root_manifest(dir: &Path) -> Result<RootManifest> {
    let manifest_path = dir.join("template.yaml");
    let content = fs::read_to_string(&manifest_path)
        .await
        .with_context(|| format!("Root template.yaml not found in {}", dir.display()))?;
    serde_yaml::from_str(&content).context("Failed to parse root template.yaml")
}
