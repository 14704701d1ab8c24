//! Sitemap generation.
//!
//! Lists the static pages plus one URL per project and update:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/projects/my-app</loc>
//!     <lastmod>2024-01-01T00:00:00.000Z</lastmod>
//!     <changefreq>monthly</changefreq>
//!     <priority>0.8</priority>
//!   </url>
//! </urlset>
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

use crate::content::{ContentError, ContentRepository};
use crate::helpers::{date_xml, document_url, full_url_for, parse_date};

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// URL section for project pages
const PROJECTS_PATH: &str = "projects";
/// URL section for update pages
const UPDATES_PATH: &str = "updates";

/// How often a page is expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
        }
    }
}

/// Single URL entry in the sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    /// Omitted from the XML when unknown
    pub last_modified: Option<DateTime<Utc>>,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Sitemap data structure
#[derive(Debug, Clone, Default)]
pub struct Sitemap {
    pub entries: Vec<SitemapEntry>,
}

impl Sitemap {
    /// Collect every page of the site.
    ///
    /// Static pages are stamped with `now`; documents with their own date.
    pub fn build(
        repo: &ContentRepository,
        base_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, ContentError> {
        let mut entries = vec![
            SitemapEntry {
                loc: full_url_for(base_url, "/"),
                last_modified: Some(now),
                change_frequency: ChangeFrequency::Monthly,
                priority: 1.0,
            },
            SitemapEntry {
                loc: full_url_for(base_url, PROJECTS_PATH),
                last_modified: Some(now),
                change_frequency: ChangeFrequency::Weekly,
                priority: 0.9,
            },
            SitemapEntry {
                loc: full_url_for(base_url, UPDATES_PATH),
                last_modified: Some(now),
                change_frequency: ChangeFrequency::Weekly,
                priority: 0.9,
            },
        ];

        for project in repo.all_projects()? {
            entries.push(SitemapEntry {
                loc: document_url(base_url, PROJECTS_PATH, &project.slug),
                last_modified: parse_date(&project.date),
                change_frequency: ChangeFrequency::Monthly,
                priority: 0.8,
            });
        }

        for update in repo.all_updates()? {
            entries.push(SitemapEntry {
                loc: document_url(base_url, UPDATES_PATH, &update.slug),
                last_modified: parse_date(&update.date),
                change_frequency: ChangeFrequency::Weekly,
                priority: 0.7,
            });
        }

        tracing::debug!("Sitemap has {} entries", entries.len());
        Ok(Self { entries })
    }

    /// Generate sitemap XML string
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{}">"#, SITEMAP_NS));
        xml.push('\n');

        for entry in &self.entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = &entry.last_modified {
                xml.push_str(&format!("    <lastmod>{}</lastmod>\n", date_xml(lastmod)));
            }
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.change_frequency.as_str()
            ));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap XML to `path`, creating parent directories
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(path, self.to_xml())
            .with_context(|| format!("Failed to write sitemap to {:?}", path))?;
        tracing::info!("Wrote sitemap with {} URLs to {:?}", self.entries.len(), path);

        Ok(())
    }
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
