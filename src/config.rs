//! Process configuration read from the environment.
//!
//! - `SERP_FONT_PATH` names a font file that replaces the auto-detected
//!   primary font.
//! - `SERP_FONT_COVERS` lists the script categories that file covers
//!   (comma-separated, e.g. `latin,thai`). Defaults to `latin`.

use std::path::PathBuf;

use serp_pixel_fonts::{FontCatalog, FontOverride, ScriptCategory};

use crate::measure::WidthMeasurer;

/// Environment variable holding the override font path.
pub const FONT_PATH_VAR: &str = "SERP_FONT_PATH";
/// Environment variable holding the override font's categories.
pub const FONT_COVERS_VAR: &str = "SERP_FONT_COVERS";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerpConfig {
    /// Font replacing the auto-detected primary for the categories it covers
    pub font_override: Option<FontOverride>,
}

impl SerpConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let font_override = lookup(FONT_PATH_VAR)
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .map(|path| {
                let covers = lookup(FONT_COVERS_VAR)
                    .map(|list| parse_covers(&list))
                    .filter(|covers| !covers.is_empty())
                    .unwrap_or_else(|| vec![ScriptCategory::Latin]);
                log::info!(
                    "Font override from {}: {} ({})",
                    FONT_PATH_VAR,
                    path,
                    covers
                        .iter()
                        .map(|c| c.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                FontOverride::covering(PathBuf::from(path), covers)
            });

        Self { font_override }
    }

    /// Font catalog for the running platform with this configuration.
    pub fn font_catalog(&self) -> FontCatalog {
        FontCatalog::new(self.font_override.clone())
    }

    /// Measurer over `font_catalog`.
    pub fn measurer(&self) -> WidthMeasurer {
        WidthMeasurer::new(self.font_catalog())
    }
}

fn parse_covers(list: &str) -> Vec<ScriptCategory> {
    let mut covers = Vec::new();
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        match name.parse::<ScriptCategory>() {
            Ok(category) if !covers.contains(&category) => covers.push(category),
            Ok(_) => {}
            Err(err) => log::warn!("Ignoring {} entry: {}", FONT_COVERS_VAR, err),
        }
    }
    covers
}
