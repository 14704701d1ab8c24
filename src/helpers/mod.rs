//! Helper functions shared by the loader, the sitemap and the CLI

pub mod date;
pub mod url;

pub use date::{date_xml, full_date, parse_date};
pub use url::{document_url, encode_segment, full_url_for};
