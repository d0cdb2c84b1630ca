//! Directory listing: entry collection, ordering and display helpers.
//!
//! Listings are recomputed from disk on every request; nothing here is
//! cached. The sort order (directories first, then case-insensitive name) is
//! part of the wire contract, not an implementation detail.

use std::path::Path;
use thiserror::Error;

/// Audio/video extensions recognized for playlists and icons.
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "3gp", "3gpp", "aac", "aiff", "avi", "mov", "mp1", "mp2", "mp3", "mp4", "m4a", "vob", "mkv",
    "flac", "m4v", "mpeg", "mpg", "oga", "ogg", "ogv", "ogm", "wav", "webm", "wma", "wmv",
];

/// Image extensions eligible for inline thumbnail previews.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "gif", "jpg", "jpeg", "apng", "png", "tif", "tiff", "bmp", "eps", "pcx", "webp", "ico",
    "icns", "psd", "xpm", "wmf",
];

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Cannot list directory: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// One filesystem entry observed at listing time.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    pub name: String,
    pub is_dir: bool,
    pub is_symlink: bool,
    /// Lowercased extension without the dot, if any.
    pub extension: Option<String>,
    /// Size in bytes; files only.
    pub size: Option<u64>,
}

impl DirectoryEntry {
    pub fn is_media(&self) -> bool {
        self.matches_extension(MEDIA_EXTENSIONS)
    }

    pub fn is_image(&self) -> bool {
        self.matches_extension(IMAGE_EXTENSIONS)
    }

    fn matches_extension(&self, set: &[&str]) -> bool {
        self.extension
            .as_deref()
            .is_some_and(|ext| set.contains(&ext))
    }
}

/// Extension-derived category consumed by the icon/UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Audio,
    Video,
    Image,
    Pdf,
    Html,
    Text,
    Unknown,
}

impl FileKind {
    pub fn of(entry: &DirectoryEntry) -> Self {
        if entry.is_dir {
            return FileKind::Directory;
        }
        match entry.extension.as_deref() {
            Some("mp3" | "m4a" | "aac" | "flac" | "ogg" | "oga" | "wav" | "wma" | "aiff") => {
                FileKind::Audio
            }
            Some(ext) if MEDIA_EXTENSIONS.contains(&ext) => FileKind::Video,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => FileKind::Image,
            Some("pdf") => FileKind::Pdf,
            Some("html" | "htm") => FileKind::Html,
            Some("txt" | "srt" | "ini" | "cfg" | "conf" | "md" | "log") => FileKind::Text,
            _ => FileKind::Unknown,
        }
    }

    /// HTML entity for the category's emoji icon.
    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Directory => "&#128193;",
            FileKind::Audio => "&#x1F3A7;",
            FileKind::Video => "&#x1F3A5;",
            FileKind::Image => "&#x1F305;",
            FileKind::Pdf => "&#128195;",
            FileKind::Html => "&#x1F30D;",
            FileKind::Text => "&#x1F4C3;",
            FileKind::Unknown => "&#x2753;",
        }
    }
}

/// List a directory's entries, sorted directories-first then by
/// case-insensitive name. Dotfiles are filtered out unless `include_hidden`.
pub fn list(path: &Path, include_hidden: bool) -> Result<Vec<DirectoryEntry>, ListingError> {
    let mut entries = Vec::new();

    for dir_entry in std::fs::read_dir(path)? {
        let dir_entry = dir_entry?;
        let name = dir_entry.file_name().to_string_lossy().into_owned();
        if !include_hidden && name.starts_with('.') {
            continue;
        }

        let full_path = dir_entry.path();
        // file_type() does not follow symlinks; is_dir() does, so a link to a
        // directory both lists as a directory and flags as a symlink.
        let is_symlink = dir_entry.file_type().map(|t| t.is_symlink()).unwrap_or(false);
        let is_dir = full_path.is_dir();

        let extension = full_path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        let size = if is_dir {
            None
        } else {
            std::fs::metadata(&full_path).ok().map(|m| m.len())
        };

        entries.push(DirectoryEntry {
            name,
            is_dir,
            is_symlink,
            extension,
            size,
        });
    }

    entries.sort_by(|a, b| {
        (!a.is_dir, a.name.to_lowercase()).cmp(&(!b.is_dir, b.name.to_lowercase()))
    });

    Ok(entries)
}

/// Human-readable file size in binary units, truncating to an integer
/// magnitude in the largest unit where the value is at least 1.
pub fn pretty_size(bytes: u64) -> String {
    const UNITS: &[(u64, &str)] = &[
        (1 << 50, " PB"),
        (1 << 40, " TB"),
        (1 << 30, " GB"),
        (1 << 20, " MB"),
        (1 << 10, " KB"),
    ];

    for &(factor, suffix) in UNITS {
        if bytes >= factor {
            return format!("{}{}", bytes / factor, suffix);
        }
    }
    if bytes == 1 {
        "1 byte".to_string()
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("A")).unwrap();
        std::fs::write(dir.path().join("b.txt"), b"bb").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();
        std::fs::write(dir.path().join(".hidden"), b"x").unwrap();
        dir
    }

    #[test]
    fn directories_sort_before_files_case_insensitively() {
        let dir = fixture();
        let entries = list(dir.path(), false).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "a.txt", "b.txt"]);
    }

    #[test]
    fn hidden_entries_filtered_unless_requested() {
        let dir = fixture();
        assert!(!list(dir.path(), false)
            .unwrap()
            .iter()
            .any(|e| e.name == ".hidden"));
        assert!(list(dir.path(), true)
            .unwrap()
            .iter()
            .any(|e| e.name == ".hidden"));
    }

    #[test]
    fn files_carry_sizes_and_directories_do_not() {
        let dir = fixture();
        let entries = list(dir.path(), false).unwrap();
        let subdir = entries.iter().find(|e| e.name == "A").unwrap();
        let file = entries.iter().find(|e| e.name == "b.txt").unwrap();
        assert_eq!(subdir.size, None);
        assert_eq!(file.size, Some(2));
    }

    #[test]
    fn missing_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list(&dir.path().join("nope"), false).is_err());
    }

    #[test]
    fn not_a_directory_is_unreadable() {
        let dir = fixture();
        assert!(list(&dir.path().join("a.txt"), false).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_flagged() {
        let dir = fixture();
        std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt"))
            .unwrap();
        let entries = list(dir.path(), false).unwrap();
        let link = entries.iter().find(|e| e.name == "link.txt").unwrap();
        assert!(link.is_symlink);
        assert!(!link.is_dir);
    }

    #[test]
    fn pretty_size_truncates_binary_units() {
        assert_eq!(pretty_size(0), "0 bytes");
        assert_eq!(pretty_size(1), "1 byte");
        assert_eq!(pretty_size(512), "512 bytes");
        assert_eq!(pretty_size(2048), "2 KB");
        assert_eq!(pretty_size(2047), "1 KB");
        assert_eq!(pretty_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(pretty_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn media_and_image_classification() {
        let entry = |name: &str, ext: &str| DirectoryEntry {
            name: name.to_string(),
            is_dir: false,
            is_symlink: false,
            extension: Some(ext.to_string()),
            size: Some(0),
        };
        assert!(entry("a.mp3", "mp3").is_media());
        assert!(entry("a.MKV", "mkv").is_media());
        assert!(!entry("a.txt", "txt").is_media());
        assert!(entry("a.jpg", "jpg").is_image());
        assert_eq!(FileKind::of(&entry("a.mp3", "mp3")), FileKind::Audio);
        assert_eq!(FileKind::of(&entry("a.mp4", "mp4")), FileKind::Video);
        assert_eq!(FileKind::of(&entry("a.pdf", "pdf")), FileKind::Pdf);
    }

    #[test]
    fn icons_are_visible_emoji_entities() {
        // A bare variation selector (FE0F) renders as nothing; every kind
        // must map to a real pictograph.
        assert_eq!(FileKind::Image.icon(), "&#x1F305;");
        for kind in [
            FileKind::Directory,
            FileKind::Audio,
            FileKind::Video,
            FileKind::Image,
            FileKind::Pdf,
            FileKind::Html,
            FileKind::Text,
            FileKind::Unknown,
        ] {
            assert_ne!(kind.icon(), "&#xFE0F;");
            assert!(!kind.icon().is_empty());
        }
    }
}
