//! Web app manifest fragment for the generated icons
//!
//! Mirrors the `icons` member of the W3C Web App Manifest so the output can be
//! pasted into `manifest.json` as-is.

use crate::icon_gen::IconSpec;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE_NAME: &str = "manifest-icons.json";

/// Root of the fragment: `{ "icons": [...] }`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct IconManifest {
    pub icons: Vec<ManifestIcon>,
}

/// A single image resource entry
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestIcon {
    /// URL of the image, relative to the site root
    pub src: String,

    /// Space separated "WxH" sizes (one entry per file here)
    pub sizes: String,

    /// MIME type of the image
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ManifestIcon {
    pub fn png(size: u32, url_prefix: &str) -> Self {
        let file_name = IconSpec::file_name(size);
        let src = if url_prefix.is_empty() {
            file_name
        } else {
            format!("{}/{file_name}", url_prefix.trim_end_matches('/'))
        };

        Self {
            src,
            sizes: format!("{size}x{size}"),
            mime_type: "image/png".to_string(),
        }
    }
}

impl IconManifest {
    /// One entry per size, each `src` being `url_prefix` joined with the file name
    pub fn for_sizes(sizes: &[u32], url_prefix: &str) -> Self {
        Self {
            icons: sizes
                .iter()
                .map(|&size| ManifestIcon::png(size, url_prefix))
                .collect(),
        }
    }

    /// Write the fragment next to the icons and return its path
    pub fn write(&self, out_dir: &Path) -> Result<PathBuf> {
        let path = out_dir.join(MANIFEST_FILE_NAME);
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize manifest icons")?;

        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(path)
    }
}

/// URL prefix derived from the output directory when none is given.
///
/// "./icons/" -> "icons", "assets\\icons" -> "assets/icons". An absolute
/// directory is a filesystem location, not a site URL, so only its last
/// component is kept: "/srv/app/icons" -> "icons".
pub fn default_url_prefix(out_dir: &Path) -> String {
    if out_dir.has_root() {
        return out_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
    }

    let prefix = out_dir.to_string_lossy().replace('\\', "/");
    let mut prefix = prefix.as_str();
    while let Some(rest) = prefix.strip_prefix("./") {
        prefix = rest;
    }
    match prefix.trim_end_matches('/') {
        "." => String::new(),
        prefix => prefix.to_string(),
    }
}
