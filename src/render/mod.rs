//! HTML rendering collaborator: turns a structured listing into the page
//! served for a directory.
//!
//! The page template is read from the install directory so it can be themed
//! without rebuilding; the copy shipped in `assets/` is compiled in as the
//! fallback. Template markers are `$file_list` and
//! `$custom_url_transformations`; the latter receives the opaque
//! customization payload verbatim.

use crate::config::ServerConfig;
use crate::listing::{pretty_size, DirectoryEntry, FileKind};
use crate::{MEDIALIST_M3U, THUMBNAIL_SELECTOR};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except unreserved characters and `/` gets percent-encoded in
/// link hrefs and playlist URLs.
pub const URL_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'~');

const PAGE_TEMPLATE_FILE: &str = "mediabro.html";
const FALLBACK_TEMPLATE: &str = include_str!("../../assets/mediabro.html");

const ICON_BACK: &str = "&#x21B0;";

/// Render the full directory page for a sorted listing.
pub fn directory_page(config: &ServerConfig, entries: &[DirectoryEntry]) -> String {
    let template = std::fs::read_to_string(config.support_dir.join(PAGE_TEMPLATE_FILE))
        .unwrap_or_else(|_| FALLBACK_TEMPLATE.to_string());

    template
        .replace("$file_list", &listing_fragment(entries, config.show_size))
        .replace(
            "$custom_url_transformations",
            &config.load_customizations(),
        )
}

/// The `<nav>` + `<ul>` fragment substituted into the page template.
fn listing_fragment(entries: &[DirectoryEntry], show_size: bool) -> String {
    let mut out = format!(
        r#"    <nav>
        <div class="inlined btn-back">
            <a title="parent folder" href="..">{ICON_BACK}</a>
        </div>
        <div class="inlined m3u">
            <a target="_blank" href="{MEDIALIST_M3U}">M3U</a>
        </div>
    </nav>
    <div style="clear:both"></div>
<ul>
"#
    );

    for entry in entries {
        out.push_str(&render_entry(entry, show_size));
    }
    out.push_str("</ul>\n");
    out
}

fn render_entry(entry: &DirectoryEntry, show_size: bool) -> String {
    // Trailing markers are cosmetic: `/` for directories, `@` for symlinks.
    // The link target always keeps the `/` form so navigation still works.
    let mut display_name = entry.name.clone();
    let mut link_name = entry.name.clone();
    if entry.is_dir {
        display_name.push('/');
        link_name.push('/');
    }
    if entry.is_symlink {
        display_name = format!("{}@", entry.name);
    }

    let href = utf8_percent_encode(&link_name, URL_PATH).to_string();
    let kind = FileKind::of(entry);
    let label = format!("{}&nbsp;{}", kind.icon(), escape_html(&display_name));

    let (title, size_info) = match entry.size {
        Some(size) => {
            let pretty = pretty_size(size);
            let size_info = if show_size {
                format!(r#"<span class="size">{pretty}</span>"#)
            } else {
                String::new()
            };
            (format!("{label} [{pretty}]"), size_info)
        }
        None => (label.clone(), String::new()),
    };

    let preview = if entry.is_image() {
        format!(r#"<img class="preview" src="{href}?{THUMBNAIL_SELECTOR}">"#)
    } else {
        String::new()
    };

    let type_marker = if entry.is_dir { "dir" } else { "file" };

    format!(
        "<li><a data-type=\"{type_marker}\" title=\"{title}\" href=\"{href}\">{preview}{label}</a>{size_info}\n"
    )
}

/// Minimal HTML escaping for text interpolated into the page.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
