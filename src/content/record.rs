//! Project and update records

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use super::frontmatter::{optional_string, scalar_string, string_or_vec};

/// Front-matter keys that are not mapped onto a record field
pub type Extra = IndexMap<String, serde_yaml::Value>;

/// The kinds of document the site is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Project,
    Update,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Project => "project",
            ContentKind::Update => "update",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" | "projects" => Ok(ContentKind::Project),
            "update" | "updates" => Ok(ContentKind::Update),
            other => Err(format!(
                "Unknown content kind: {}. Available: project, update",
                other
            )),
        }
    }
}

/// Summary form of a document, built from its front-matter.
///
/// The slug is never read from front-matter; the loader assigns it from the
/// file name after deserializing.
pub trait Record: DeserializeOwned + Default {
    /// Which directory this record type is loaded from
    const KIND: ContentKind;

    fn slug(&self) -> &str;

    fn set_slug(&mut self, slug: String);

    /// Publication date exactly as written in the front-matter
    fn date(&self) -> &str;

    fn extra_mut(&mut self) -> &mut Extra;
}

/// A portfolio project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Slug (file name without extension)
    #[serde(skip_deserializing)]
    pub slug: String,

    #[serde(deserialize_with = "scalar_string")]
    pub title: String,

    /// Publication date as authored
    #[serde(deserialize_with = "scalar_string")]
    pub date: String,

    #[serde(deserialize_with = "scalar_string")]
    pub description: String,

    /// Technologies used, in the order listed
    #[serde(deserialize_with = "string_or_vec")]
    pub tech: Vec<String>,

    #[serde(
        deserialize_with = "optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,

    /// Source repository URL
    #[serde(
        deserialize_with = "optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub github: Option<String>,

    /// Live demo URL
    #[serde(
        deserialize_with = "optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub demo: Option<String>,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for Project {
    const KIND: ContentKind = ContentKind::Project;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn extra_mut(&mut self) -> &mut Extra {
        &mut self.extra
    }
}

/// A blog post / progress update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Update {
    #[serde(skip_deserializing)]
    pub slug: String,

    #[serde(deserialize_with = "scalar_string")]
    pub title: String,

    #[serde(deserialize_with = "scalar_string")]
    pub date: String,

    #[serde(deserialize_with = "scalar_string")]
    pub summary: String,

    #[serde(deserialize_with = "string_or_vec", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Record for Update {
    const KIND: ContentKind = ContentKind::Update;

    fn slug(&self) -> &str {
        &self.slug
    }

    fn set_slug(&mut self, slug: String) {
        self.slug = slug;
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn extra_mut(&mut self) -> &mut Extra {
        &mut self.extra
    }
}

/// A record together with its raw markdown body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithContent<T> {
    #[serde(flatten)]
    pub meta: T,

    /// Raw markdown/MDX body, front-matter removed
    pub content: String,
}

impl<T> Deref for WithContent<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.meta
    }
}

pub type ProjectWithContent = WithContent<Project>;
pub type UpdateWithContent = WithContent<Update>;
