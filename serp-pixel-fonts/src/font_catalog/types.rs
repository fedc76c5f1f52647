//! Font asset types shared by the catalog and the shaper.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::script::ScriptCategory;

/// Identity of a font face: file path plus face index within the file.
///
/// Two assets with the same key are the same face, whatever categories
/// they were resolved for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontKey {
    /// Path of the font file (TTF/OTF/TTC)
    pub path: PathBuf,
    /// Face index inside a TrueType collection (0 for single-face files)
    pub face_index: u32,
}

/// One resolved font resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontAsset {
    /// Path and face index of the font
    pub key: FontKey,
    /// Human-readable name (family name or file stem)
    pub name: String,
    /// Script categories this asset is the primary font for
    pub covers: Vec<ScriptCategory>,
}

impl FontAsset {
    /// Create an asset for face 0 of `path`, named after the file stem.
    pub fn new(path: impl Into<PathBuf>, covers: Vec<ScriptCategory>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        Self {
            key: FontKey {
                path,
                face_index: 0,
            },
            name,
            covers,
        }
    }

    /// Path of the font file.
    pub fn path(&self) -> &Path {
        &self.key.path
    }

    /// Whether this asset is designated for `category`.
    pub fn covers(&self, category: ScriptCategory) -> bool {
        self.covers.contains(&category)
    }
}

/// Font file configured to replace the auto-detected primary font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontOverride {
    /// Path of the replacement font file
    pub path: PathBuf,
    /// Categories the replacement claims to cover
    pub covers: Vec<ScriptCategory>,
}

impl FontOverride {
    /// Override for the Latin-class category only.
    pub fn latin(path: impl Into<PathBuf>) -> Self {
        Self::covering(path, vec![ScriptCategory::Latin])
    }

    /// Override for an explicit set of categories.
    pub fn covering(path: impl Into<PathBuf>, covers: Vec<ScriptCategory>) -> Self {
        Self {
            path: path.into(),
            covers,
        }
    }
}

/// Result of looking up the font for one category.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    /// The font to shape with
    pub asset: Arc<FontAsset>,
    /// Category that was asked for
    pub requested: ScriptCategory,
    /// True when `asset` belongs to another category because the requested
    /// one had nothing installed
    pub degraded: bool,
}

/// File stem of a font path, used as its display name.
pub(crate) fn display_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
