//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped inside a single path segment (RFC 3986 unreserved are kept)
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encode a value for use as one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Join a site base URL and an absolute path.
///
/// The bare root path yields the base URL with no trailing slash.
pub fn full_url_for(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

/// Absolute URL of one document page, e.g. `https://site/projects/my-app`
pub fn document_url(base_url: &str, section: &str, slug: &str) -> String {
    full_url_for(base_url, &format!("{}/{}", section, encode_segment(slug)))
}
