//! Icon section of a browser extension's manifest.json
//!
//! Mirrors the two places a Manifest V3 extension points at its icons: the
//! top-level `icons` map and the toolbar button's `action.default_icon`. The
//! generated fragment is meant to be pasted into the extension manifest.

use anyhow::{Context, Result};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};

/// Icon paths keyed by pixel size
///
/// Integer keys keep the sizes in numeric order; serde_json writes them as
/// strings, which is what the manifest format expects.
pub type IconSet = BTreeMap<u32, String>;

/// Root of the manifest fragment
#[derive(Serialize, Debug, Clone, Default)]
pub struct ManifestIcons {
    /// Icons shown on the extensions page, in the web store and as favicon
    pub icons: IconSet,

    /// Toolbar button configuration
    pub action: Action,
}

/// The `action` key of the manifest
#[derive(Serialize, Debug, Clone, Default)]
pub struct Action {
    /// Icons for the toolbar button
    pub default_icon: IconSet,
}

impl ManifestIcons {
    /// Creates an empty fragment
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an icon for both the extension and its toolbar button
    ///
    /// # Arguments
    /// * `size` - Edge length of the icon in pixels
    /// * `path` - Location of the icon, relative to the extension root
    pub fn add_icon(&mut self, size: u32, path: &Path) {
        let path = manifest_path(path);
        self.icons.insert(size, path.clone());
        self.action.default_icon.insert(size, path);
    }

    /// Serializes the fragment as pretty JSON and writes it to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize manifest icons")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

// Manifest paths always use forward slashes.
fn manifest_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
