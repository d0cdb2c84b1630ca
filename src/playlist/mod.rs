//! M3U playlist generation for the media files in a directory.

use crate::listing;
use crate::net;
use crate::render::{escape_html, URL_PATH};
use percent_encoding::utf8_percent_encode;
use std::path::Path;

/// Generate an M3U playlist for the media files directly inside `dir`.
///
/// Entries are listed hidden-files-included, sorted with the same
/// directory-first rule as the HTML listing, filtered to known media
/// extensions and emitted as absolute URLs other devices on the network can
/// fetch. An unreadable directory or one without media yields an empty
/// string; playlist generation never errors.
pub fn generate(dir: &Path, domain: &str, port: u16, webroot: &Path) -> String {
    let Ok(entries) = listing::list(dir, true) else {
        return String::new();
    };

    let domain = net::effective_domain(domain);
    let mut out = String::new();

    for entry in entries.iter().filter(|e| e.is_media()) {
        let full_path = dir.join(&entry.name);
        let url_path = path_relative_to_webroot(&full_path, webroot);
        let encoded = utf8_percent_encode(&url_path, URL_PATH);

        out.push_str("#EXTINF:1.0,");
        out.push_str(&escape_html(&entry.name));
        out.push('\n');
        out.push_str(&format!("http://{domain}:{port}{encoded}\n"));
    }

    if out.is_empty() {
        return String::new();
    }
    format!("#EXTM3U\n\n{out}")
}

fn path_relative_to_webroot(path: &Path, webroot: &Path) -> String {
    match path.strip_prefix(webroot) {
        Ok(relative) => format!("/{}", relative.display()),
        Err(_) => path.display().to_string(),
    }
}
