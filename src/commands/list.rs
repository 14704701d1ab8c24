//! List site content

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::content::{ContentKind, Record};
use crate::helpers::parse_date;
use crate::Folio;

/// List the summaries of one kind of document, newest first
pub fn run(folio: &Folio, kind: ContentKind, json: bool) -> Result<()> {
    let repo = folio.repository();
    let mut out = std::io::stdout().lock();

    match kind {
        ContentKind::Project => {
            let projects = repo.all_projects()?;
            if json {
                return write_json(&mut out, &projects);
            }
            writeln!(out, "Projects ({}):", projects.len())?;
            for project in &projects {
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    display_date(project),
                    project.title,
                    project.slug
                )?;
                if !project.tech.is_empty() {
                    writeln!(out, "      {}", project.tech.join(", "))?;
                }
            }
        }
        ContentKind::Update => {
            let updates = repo.all_updates()?;
            if json {
                return write_json(&mut out, &updates);
            }
            writeln!(out, "Updates ({}):", updates.len())?;
            for update in &updates {
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    display_date(update),
                    update.title,
                    update.slug
                )?;
            }
        }
    }

    Ok(())
}

/// Print slugs one per line, in listing order
pub fn slugs(folio: &Folio, kind: ContentKind) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for slug in folio.repository().slugs(kind)? {
        writeln!(out, "{}", slug)?;
    }
    Ok(())
}

pub(crate) fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// `YYYY-MM-DD` when the date parses, the raw value otherwise
fn display_date<T: Record>(record: &T) -> String {
    match parse_date(record.date()) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None if record.date().is_empty() => "----------".to_string(),
        None => record.date().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Update;

    #[test]
    fn test_display_date() {
        let mut update = Update {
            date: "2024-01-15 10:30:00".to_string(),
            ..Default::default()
        };
        assert_eq!(display_date(&update), "2024-01-15");

        update.date = "spring".to_string();
        assert_eq!(display_date(&update), "spring");

        update.date.clear();
        assert_eq!(display_date(&update), "----------");
    }

    #[test]
    fn test_write_json() {
        let update = Update {
            slug: "hello".to_string(),
            title: "Hello".to_string(),
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_json(&mut buf, &[update]).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["slug"], "hello");
        assert!(buf.ends_with(b"\n"));
    }
}
