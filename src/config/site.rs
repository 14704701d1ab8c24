//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::ContentKind;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public base URL, used for sitemap links
    pub url: String,

    // Directory
    pub content_dir: String,
    pub project_dir: String,
    pub update_dir: String,

    /// Markdown extensions, without the dot. The first is tried first when
    /// resolving a slug; the rest are fallbacks in order.
    pub markdown_extensions: Vec<String>,

    /// Skip documents with broken front-matter instead of failing the listing
    pub skip_invalid: bool,

    #[serde(default)]
    pub sitemap: SitemapConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://yoursite.com".to_string(),

            content_dir: "content".to_string(),
            project_dir: "projects".to_string(),
            update_dir: "updates".to_string(),
            markdown_extensions: vec!["md".to_string(), "mdx".to_string()],
            skip_invalid: false,

            sitemap: SitemapConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Directory name (under `content_dir`) holding one kind of document
    pub fn dir_name(&self, kind: ContentKind) -> &str {
        match kind {
            ContentKind::Project => &self.project_dir,
            ContentKind::Update => &self.update_dir,
        }
    }
}

/// Sitemap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Output file, relative to the base directory
    pub path: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            path: "sitemap.xml".to_string(),
        }
    }
}
