//! Process-lifetime server configuration.
//!
//! Built once from the command line in `main` and injected into the router
//! and all components; request handlers only ever read it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default payload substituted when no customization file is present.
pub const DEFAULT_CUSTOMIZATIONS: &str = "URL_TRANSFORMATIONS = [];\n";

/// Filename of the optional listing-customization file, looked up next to
/// the binary. Its contents are passed to the page template verbatim.
const CUSTOMIZATIONS_FILE: &str = "config.js";

/// Immutable configuration shared by all request handlers.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Root directory exposed for browsing (absolute).
    pub webroot: PathBuf,
    /// Domain used for the bind address and in M3U playlist URLs.
    pub domain: String,
    /// Port to listen on.
    pub port: u16,
    /// Show per-file size strings in listings.
    pub show_size: bool,
    /// Include dotfiles in listings unless the request says otherwise.
    pub show_hidden: bool,
    /// Directory holding the UI support assets (css/js/ico, page template).
    pub support_dir: PathBuf,
}

impl ServerConfig {
    /// Build a validated config. The webroot is canonicalized so that all
    /// resolved request paths are descendants of a real absolute directory.
    pub fn new(webroot: &Path, domain: String, port: u16, show_size: bool) -> Result<Self> {
        let webroot = webroot
            .canonicalize()
            .with_context(|| format!("Web root does not exist: {}", webroot.display()))?;
        if !webroot.is_dir() {
            anyhow::bail!("Web root is not a directory: {}", webroot.display());
        }
        if port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        Ok(Self {
            webroot,
            domain,
            port,
            show_size,
            show_hidden: false,
            support_dir: install_dir(),
        })
    }

    /// The URL the server is reachable at, for logging and browser launch.
    pub fn serve_url(&self) -> String {
        format!("http://{}:{}", self.domain, self.port)
    }

    /// Read the opaque listing-customization payload from the install
    /// directory, or the documented empty-ruleset default. The contents are
    /// never interpreted here.
    pub fn load_customizations(&self) -> String {
        let path = self.support_dir.join(CUSTOMIZATIONS_FILE);
        std::fs::read_to_string(&path).unwrap_or_else(|_| DEFAULT_CUSTOMIZATIONS.to_string())
    }
}

/// Directory the binary runs from; support assets resolve against it
/// regardless of the configured webroot.
fn install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webroot_must_exist() {
        let err = ServerConfig::new(
            Path::new("/definitely/not/a/real/dir"),
            "0.0.0.0".into(),
            8088,
            true,
        );
        assert!(err.is_err());
    }

    #[test]
    fn webroot_is_canonicalized() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::new(dir.path(), "0.0.0.0".into(), 8088, true).unwrap();
        assert!(cfg.webroot.is_absolute());
    }

    #[test]
    fn port_zero_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::new(dir.path(), "0.0.0.0".into(), 0, true);
        assert!(err.is_err());
    }

    #[test]
    fn missing_customizations_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = ServerConfig::new(dir.path(), "0.0.0.0".into(), 8088, true).unwrap();
        cfg.support_dir = dir.path().to_path_buf();
        assert_eq!(cfg.load_customizations(), DEFAULT_CUSTOMIZATIONS);
    }

    #[test]
    fn customizations_file_passed_through_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.js"), "URL_TRANSFORMATIONS = [[/a/, \"b\"]];").unwrap();
        let mut cfg = ServerConfig::new(dir.path(), "0.0.0.0".into(), 8088, true).unwrap();
        cfg.support_dir = dir.path().to_path_buf();
        assert_eq!(
            cfg.load_customizations(),
            "URL_TRANSFORMATIONS = [[/a/, \"b\"]];"
        );
    }
}
