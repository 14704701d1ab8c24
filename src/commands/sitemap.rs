//! Generate the sitemap

use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::sitemap::Sitemap;
use crate::Folio;

/// Build the sitemap and write it to `output`, or to stdout when `output` is `-`
pub fn run(folio: &Folio, output: Option<&Path>) -> Result<()> {
    let sitemap = Sitemap::build(&folio.repository(), &folio.config.url, chrono::Utc::now())?;

    match output {
        Some(path) if path == Path::new("-") => {
            let mut out = std::io::stdout().lock();
            out.write_all(sitemap.to_xml().as_bytes())?;
        }
        Some(path) => sitemap.write(folio.base_dir.join(path))?,
        None => sitemap.write(folio.sitemap_path())?,
    }

    Ok(())
}
