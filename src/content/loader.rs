//! Content loader - reads projects and updates from the content directory

use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::frontmatter;
use super::{
    ContentError, ContentKind, Project, ProjectWithContent, Record, Update, UpdateWithContent,
    WithContent,
};
use crate::config::SiteConfig;
use crate::helpers::parse_date;

/// Read-only access to the markdown documents under a content directory.
///
/// Every call goes back to the file system; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    root: PathBuf,
    config: SiteConfig,
    extensions: Vec<String>,
}

impl ContentRepository {
    /// Repository rooted at `root` with the default layout
    /// (`projects/`, `updates/`, `.md` then `.mdx`)
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_config(root.as_ref().to_path_buf(), &SiteConfig::default())
    }

    /// Repository for a site: `<base_dir>/<content_dir>` laid out as configured
    pub fn from_config<P: AsRef<Path>>(base_dir: P, config: &SiteConfig) -> Self {
        Self::with_config(base_dir.as_ref().join(&config.content_dir), config)
    }

    fn with_config(root: PathBuf, config: &SiteConfig) -> Self {
        let extensions = config
            .markdown_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();

        Self {
            root,
            config: config.clone(),
            extensions,
        }
    }

    /// Log and skip documents that fail to load instead of failing the listing
    pub fn skip_invalid(mut self, skip: bool) -> Self {
        self.config.skip_invalid = skip;
        self
    }

    /// Directory holding one kind of document
    pub fn dir(&self, kind: ContentKind) -> PathBuf {
        self.root.join(self.config.dir_name(kind))
    }

    /// Load the summaries of every document of kind `T::KIND`, newest first.
    ///
    /// A missing directory is an empty site, not an error. Documents whose
    /// date cannot be parsed are listed after all dated ones; equal dates
    /// keep slug order.
    pub fn list<T: Record>(&self) -> Result<Vec<T>, ContentError> {
        let dir = self.dir(T::KIND);
        if !dir.exists() {
            tracing::debug!("No {} directory at {:?}", T::KIND, dir);
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for (slug, path) in self.markdown_files(&dir)? {
            match load::<T>(&path) {
                Ok((mut record, _)) => {
                    record.set_slug(slug);
                    records.push(record);
                }
                Err(e) if self.config.skip_invalid => {
                    tracing::warn!("Skipping {} {:?}: {}", T::KIND, path, e);
                }
                Err(e) => return Err(e),
            }
        }

        sort_newest_first(&mut records);
        tracing::debug!("Loaded {} {}(s) from {:?}", records.len(), T::KIND, dir);

        Ok(records)
    }

    /// Load one document with its body.
    ///
    /// Extensions are tried in configured order (`.md` before `.mdx` by
    /// default); the first existing file wins.
    pub fn get<T: Record>(&self, slug: &str) -> Result<WithContent<T>, ContentError> {
        let not_found = || ContentError::NotFound {
            kind: T::KIND,
            slug: slug.to_string(),
        };

        if !is_valid_slug(slug) {
            tracing::debug!("Rejecting {} slug {:?}", T::KIND, slug);
            return Err(not_found());
        }

        let dir = self.dir(T::KIND);
        let path = self
            .extensions
            .iter()
            .map(|ext| dir.join(format!("{}.{}", slug, ext)))
            .find(|path| path.is_file())
            .ok_or_else(not_found)?;

        let (mut meta, content) = load::<T>(&path)?;
        meta.set_slug(slug.to_string());
        tracing::debug!("Loaded {} {:?}", T::KIND, path);

        Ok(WithContent { meta, content })
    }

    /// Slugs of one kind of document, newest first
    pub fn slugs(&self, kind: ContentKind) -> Result<Vec<String>, ContentError> {
        match kind {
            ContentKind::Project => self.slugs_of::<Project>(),
            ContentKind::Update => self.slugs_of::<Update>(),
        }
    }

    fn slugs_of<T: Record>(&self) -> Result<Vec<String>, ContentError> {
        Ok(self
            .list::<T>()?
            .iter()
            .map(|record| record.slug().to_string())
            .collect())
    }

    pub fn all_projects(&self) -> Result<Vec<Project>, ContentError> {
        self.list()
    }

    pub fn project(&self, slug: &str) -> Result<ProjectWithContent, ContentError> {
        self.get(slug)
    }

    pub fn all_updates(&self) -> Result<Vec<Update>, ContentError> {
        self.list()
    }

    pub fn update(&self, slug: &str) -> Result<UpdateWithContent, ContentError> {
        self.get(slug)
    }

    /// Markdown files directly inside `dir`, keyed and ordered by slug.
    ///
    /// When one slug exists with several extensions, the file `get` would
    /// pick is kept.
    fn markdown_files(&self, dir: &Path) -> Result<Vec<(String, PathBuf)>, ContentError> {
        let mut files: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir).to_path_buf();
                ContentError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(rank) = self.extension_rank(path) else {
                continue;
            };
            let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!("Skipping non UTF-8 file name {:?}", path);
                continue;
            };

            if let Some((existing_rank, existing)) = files.get(slug) {
                let replace = rank < *existing_rank;
                let (kept, dropped) = if replace {
                    (path, existing.as_path())
                } else {
                    (existing.as_path(), path)
                };
                tracing::warn!(
                    "Duplicate slug `{}`: using {:?}, ignoring {:?}",
                    slug,
                    kept,
                    dropped
                );
                if !replace {
                    continue;
                }
            }
            files.insert(slug.to_string(), (rank, path.to_path_buf()));
        }

        Ok(files
            .into_iter()
            .map(|(slug, (_, path))| (slug, path))
            .collect())
    }

    /// Position of the file's extension in the configured list
    fn extension_rank(&self, path: &Path) -> Option<usize> {
        let ext = path.extension()?.to_str()?;
        self.extensions.iter().position(|e| e == ext)
    }
}

/// Keys the loader itself fills in; front-matter values for them are dropped
const RESERVED_KEYS: [&str; 2] = ["slug", "content"];

/// Read a document and split it into its record and raw body
fn load<T: Record>(path: &Path) -> Result<(T, String), ContentError> {
    let raw = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
    let (mut record, body) =
        frontmatter::parse::<T>(&raw).map_err(|source| ContentError::FrontMatter {
            path: path.to_path_buf(),
            source,
        })?;

    let extra = record.extra_mut();
    for key in RESERVED_KEYS {
        if extra.shift_remove(key).is_some() {
            tracing::debug!("Ignoring front-matter key `{}` in {:?}", key, path);
        }
    }

    Ok((record, body.to_string()))
}

/// Stable sort by parsed date, newest first, undated last
fn sort_newest_first<T: Record>(records: &mut Vec<T>) {
    let mut keyed: Vec<(Option<DateTime<Utc>>, T)> = records
        .drain(..)
        .map(|record| (parse_date(record.date()), record))
        .collect();
    keyed.sort_by_key(|(date, _)| Reverse(*date));
    records.extend(keyed.into_iter().map(|(_, record)| record));
}

/// A slug must name a file directly inside the kind's directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn project_file(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n\n# {}\n", title, date, title)
    }

    fn site() -> (TempDir, ContentRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = ContentRepository::new(dir.path());
        (dir, repo)
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let (_dir, repo) = site();
        assert!(repo.all_projects().unwrap().is_empty());
        assert!(repo.all_updates().unwrap().is_empty());
        assert!(repo.slugs(ContentKind::Update).unwrap().is_empty());
    }

    #[test]
    fn test_list_recognized_files_only() {
        let (dir, repo) = site();
        write(dir.path(), "projects/alpha.md", &project_file("Alpha", "2024-01-01"));
        write(dir.path(), "projects/beta.mdx", &project_file("Beta", "2024-02-01"));
        write(dir.path(), "projects/notes.txt", "not content");
        write(dir.path(), "projects/nested/gamma.md", &project_file("Gamma", "2024-03-01"));

        let projects = repo.all_projects().unwrap();
        let slugs: Vec<_> = projects.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["beta", "alpha"]);
        assert_eq!(projects[0].title, "Beta");
    }

    #[test]
    fn test_list_sorted_newest_first() {
        let (dir, repo) = site();
        write(dir.path(), "updates/a.md", "---\ntitle: A\ndate: 2023-06-01\n---\n");
        write(dir.path(), "updates/b.md", "---\ntitle: B\ndate: 2024-06-01\n---\n");
        write(dir.path(), "updates/c.md", "---\ntitle: C\n---\n");
        write(dir.path(), "updates/d.md", "---\ntitle: D\ndate: 2024-06-01T12:00:00Z\n---\n");
        write(dir.path(), "updates/e.md", "---\ntitle: E\ndate: someday\n---\n");

        let updates = repo.all_updates().unwrap();
        let slugs: Vec<_> = updates.iter().map(|u| u.slug.as_str()).collect();
        assert_eq!(slugs, vec!["d", "b", "a", "c", "e"]);

        for pair in updates.windows(2) {
            if let (Some(a), Some(b)) = (parse_date(&pair[0].date), parse_date(&pair[1].date)) {
                assert!(a >= b);
            }
        }
    }

    #[test]
    fn test_equal_dates_keep_stable_order() {
        let (dir, repo) = site();
        for name in ["zeta", "alpha", "mid"] {
            write(
                dir.path(),
                &format!("projects/{}.md", name),
                &project_file(name, "2024-05-05"),
            );
        }

        let first: Vec<_> = repo.slugs(ContentKind::Project).unwrap();
        assert_eq!(first, vec!["alpha", "mid", "zeta"]);
        for _ in 0..3 {
            assert_eq!(repo.slugs(ContentKind::Project).unwrap(), first);
        }
    }

    #[test]
    fn test_get_matches_listing() {
        let (dir, repo) = site();
        write(
            dir.path(),
            "projects/agent.md",
            r#"---
title: Agent Platform
date: 2024-04-10
description: Multi-agent orchestration
tech:
  - Python
  - LangGraph
image: /images/agent.png
github: https://github.com/me/agent
demo: https://agent.example.com
---

## Overview

Body text.
"#,
        );

        let listed = repo.all_projects().unwrap().remove(0);
        let full = repo.project("agent").unwrap();

        assert_eq!(full.meta, listed);
        assert_eq!(full.slug, "agent");
        assert_eq!(full.tech, vec!["Python", "LangGraph"]);
        assert_eq!(full.demo.as_deref(), Some("https://agent.example.com"));
        assert_eq!(full.content, "\n## Overview\n\nBody text.\n");
    }

    #[test]
    fn test_get_falls_back_to_mdx() {
        let (dir, repo) = site();
        write(dir.path(), "updates/launch.mdx", "---\ntitle: Launch\n---\nWe shipped.\n");

        let update = repo.update("launch").unwrap();
        assert_eq!(update.title, "Launch");
        assert_eq!(update.content, "We shipped.\n");
    }

    #[test]
    fn test_get_missing_slug() {
        let (dir, repo) = site();
        write(dir.path(), "updates/real.md", "---\ntitle: Real\n---\n");

        let err = repo.update("missing").unwrap_err();
        assert!(err.is_not_found());

        let err = repo.project("real").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_get_rejects_path_slugs() {
        let (dir, repo) = site();
        write(dir.path(), "secret.md", "---\ntitle: Secret\n---\n");
        write(dir.path(), "updates/ok.md", "---\ntitle: Ok\n---\n");

        assert!(repo.update("../secret").unwrap_err().is_not_found());
        assert!(repo.update("").unwrap_err().is_not_found());
        assert!(repo.update("..").unwrap_err().is_not_found());
    }

    #[test]
    fn test_malformed_frontmatter_fails_listing() {
        let (dir, repo) = site();
        write(dir.path(), "projects/good.md", &project_file("Good", "2024-01-01"));
        write(dir.path(), "projects/bad.md", "---\ntitle: [oops\n---\n");

        let err = repo.all_projects().unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
        assert!(err.to_string().contains("bad.md"));

        let err = repo.project("bad").unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }

    #[test]
    fn test_unreadable_file_is_io_error() {
        let (dir, repo) = site();
        write(dir.path(), "updates/good.md", "---\ntitle: Good\n---\n");
        let path = dir.path().join("updates/binary.md");
        fs::write(&path, b"---\ntitle: \xff\xfe\n---\n").unwrap();

        let err = repo.all_updates().unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
        assert!(err.to_string().contains("binary.md"));

        let err = repo.update("binary").unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_reserved_keys_do_not_leak_into_extra() {
        let (dir, repo) = site();
        write(
            dir.path(),
            "updates/real-file.md",
            "---\ntitle: Real\nslug: custom\ncontent: meta\nmood: happy\n---\nThe body.\n",
        );

        let updates = repo.all_updates().unwrap();
        assert!(!updates[0].extra.contains_key("slug"));
        assert!(!updates[0].extra.contains_key("content"));
        assert_eq!(updates[0].extra.len(), 1);

        let listed = serde_json::to_value(&updates).unwrap();
        assert_eq!(listed[0]["slug"], "real-file");
        assert_eq!(listed[0]["mood"], "happy");

        let full = serde_json::to_value(repo.update("real-file").unwrap()).unwrap();
        assert_eq!(full["slug"], "real-file");
        assert_eq!(full["content"], "The body.\n");
    }

    #[test]
    fn test_non_string_keys_are_kept() {
        let (dir, repo) = site();
        write(
            dir.path(),
            "projects/a.md",
            "---\ntitle: A\n2023: shipped v1\ntrue: yes\n---\n",
        );

        let project = repo.all_projects().unwrap().remove(0);
        assert_eq!(project.title, "A");
        assert_eq!(
            project.extra.get("2023"),
            Some(&serde_yaml::Value::String("shipped v1".to_string()))
        );
        assert!(project.extra.contains_key("true"));
    }

    #[test]
    fn test_skip_invalid_isolates_bad_files() {
        let (dir, repo) = site();
        write(dir.path(), "projects/good.md", &project_file("Good", "2024-01-01"));
        write(dir.path(), "projects/bad.md", "---\ntitle: [oops\n---\n");

        let projects = repo.skip_invalid(true).all_projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].slug, "good");
    }

    #[test]
    fn test_duplicate_slug_prefers_primary_extension() {
        let (dir, repo) = site();
        write(dir.path(), "updates/post.md", "---\ntitle: Markdown\n---\n");
        write(dir.path(), "updates/post.mdx", "---\ntitle: MDX\n---\n");

        let updates = repo.all_updates().unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].title, "Markdown");
        assert_eq!(repo.update("post").unwrap().title, "Markdown");
    }

    #[test]
    fn test_missing_fields_default() {
        let (dir, repo) = site();
        write(
            dir.path(),
            "projects/x.md",
            "---\ntitle: X\ndate: 2024-01-01\ntech: [A, B]\n---\n",
        );
        write(dir.path(), "updates/plain.md", "No front-matter at all.\n");

        let project = repo.all_projects().unwrap().remove(0);
        assert_eq!(project.title, "X");
        assert_eq!(project.date, "2024-01-01");
        assert_eq!(project.tech, vec!["A", "B"]);
        assert_eq!(project.description, "");
        assert!(project.image.is_none());
        assert!(project.github.is_none());
        assert!(project.demo.is_none());

        let update = repo.update("plain").unwrap();
        assert_eq!(update.title, "");
        assert!(update.tags.is_empty());
        assert_eq!(update.content, "No front-matter at all.\n");
    }

    #[test]
    fn test_from_config_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig {
            content_dir: "site".to_string(),
            update_dir: "blog".to_string(),
            markdown_extensions: vec!["mdx".to_string(), ".md".to_string()],
            ..Default::default()
        };
        write(dir.path(), "site/blog/post.md", "---\ntitle: Markdown\n---\n");
        write(dir.path(), "site/blog/post.mdx", "---\ntitle: MDX\n---\n");

        let repo = ContentRepository::from_config(dir.path(), &config);
        assert_eq!(repo.dir(ContentKind::Update), dir.path().join("site/blog"));
        assert_eq!(repo.update("post").unwrap().title, "MDX");
        assert_eq!(repo.all_updates().unwrap()[0].title, "MDX");
    }
}
