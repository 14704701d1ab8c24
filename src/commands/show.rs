//! Show a single document

use anyhow::{Context, Result};
use std::io::Write;

use super::list::write_json;
use crate::content::{ContentKind, Project, Update};
use crate::helpers::{full_date, parse_date};
use crate::Folio;

/// Print one document with its body
pub fn run(folio: &Folio, kind: ContentKind, slug: &str, json: bool) -> Result<()> {
    let repo = folio.repository();
    let mut out = std::io::stdout().lock();

    match kind {
        ContentKind::Project => {
            let project = repo
                .project(slug)
                .with_context(|| format!("Failed to load project `{}`", slug))?;
            if json {
                return write_json(&mut out, &project);
            }
            write_project_header(&mut out, &project)?;
            writeln!(out)?;
            write!(out, "{}", project.content)?;
        }
        ContentKind::Update => {
            let update = repo
                .update(slug)
                .with_context(|| format!("Failed to load update `{}`", slug))?;
            if json {
                return write_json(&mut out, &update);
            }
            write_update_header(&mut out, &update)?;
            writeln!(out)?;
            write!(out, "{}", update.content)?;
        }
    }

    Ok(())
}

fn write_project_header<W: Write>(out: &mut W, project: &Project) -> Result<()> {
    writeln!(out, "{}", project.title)?;
    writeln!(out, "{}", long_date(&project.date))?;
    if !project.description.is_empty() {
        writeln!(out, "{}", project.description)?;
    }
    if !project.tech.is_empty() {
        writeln!(out, "Tech: {}", project.tech.join(", "))?;
    }
    if let Some(github) = &project.github {
        writeln!(out, "Source: {}", github)?;
    }
    if let Some(demo) = &project.demo {
        writeln!(out, "Demo: {}", demo)?;
    }
    Ok(())
}

fn write_update_header<W: Write>(out: &mut W, update: &Update) -> Result<()> {
    writeln!(out, "{}", update.title)?;
    writeln!(out, "{}", long_date(&update.date))?;
    if !update.summary.is_empty() {
        writeln!(out, "{}", update.summary)?;
    }
    if !update.tags.is_empty() {
        writeln!(out, "Tags: {}", update.tags.join(", "))?;
    }
    Ok(())
}

/// "January 5, 2024" when the date parses, the raw value otherwise
fn long_date(date: &str) -> String {
    parse_date(date)
        .map(|d| full_date(&d))
        .unwrap_or_else(|| date.to_string())
}
