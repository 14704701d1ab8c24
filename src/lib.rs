//! folio: content loading for a markdown-driven portfolio site
//!
//! Projects and updates are markdown/MDX files with YAML front-matter, one
//! directory per kind. This crate turns them into typed records, newest
//! first, for whatever renders the pages, and builds the site's sitemap.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod sitemap;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{
    ContentError, ContentKind, ContentRepository, Project, ProjectWithContent, Update,
    UpdateWithContent,
};

/// A portfolio site on disk
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
}

impl Folio {
    /// Open a site, reading `_config.yml` from `base_dir` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        Self {
            config,
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Content access for this site
    pub fn repository(&self) -> ContentRepository {
        ContentRepository::from_config(&self.base_dir, &self.config)
    }

    /// Default sitemap output path
    pub fn sitemap_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.sitemap.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_new_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(
            folio.repository().dir(ContentKind::Update),
            dir.path().join("content/updates")
        );
        assert_eq!(folio.sitemap_path(), dir.path().join("sitemap.xml"));
    }

    #[test]
    fn test_new_with_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "content_dir: pages\nproject_dir: work\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("pages/work")).unwrap();
        fs::write(
            dir.path().join("pages/work/site.md"),
            "---\ntitle: Site\n---\n",
        )
        .unwrap();

        let folio = Folio::new(dir.path()).unwrap();
        assert_eq!(
            folio.repository().dir(ContentKind::Project),
            dir.path().join("pages/work")
        );

        let projects = folio.repository().all_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].slug, "site");
    }

    #[test]
    fn test_new_with_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("_config.yml"), "skip_invalid: [not a bool\n").unwrap();
        assert!(Folio::new(dir.path()).is_err());
    }
}
