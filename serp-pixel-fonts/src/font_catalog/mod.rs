//! Script-category font resolution.
//!
//! The catalog picks one primary font per `ScriptCategory`:
//! 1. The override font, for every category it covers
//! 2. The first existing file from the platform candidate list
//! 3. The first open-license family found in the system font database
//!
//! Resolution runs once per catalog and the resulting `FontTable` is reused
//! for the catalog's lifetime. Categories left without a font degrade to the
//! Latin-class font at lookup time, flagged so callers can report low
//! confidence.

mod candidates;
mod loader;
mod types;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::error::FontError;
use crate::script::ScriptCategory;

pub use candidates::{CandidateTable, Platform};
pub use types::{FontAsset, FontKey, FontOverride, ResolvedFont};

/// Source of a font per script category.
///
/// Implemented by `FontCatalog` for real installs and by `FontTable` for
/// fixed tables, so measurement code can run against either.
pub trait FontResolver {
    /// Font to shape `category` text with.
    fn font_for(&self, category: ScriptCategory) -> Result<ResolvedFont, FontError>;
}

/// Resolved script-category → font mapping.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    assets: HashMap<ScriptCategory, Arc<FontAsset>>,
}

impl FontTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `asset` as the primary font for every category it covers.
    ///
    /// A later insert for the same category replaces the earlier one.
    pub fn insert(&mut self, asset: FontAsset) -> Arc<FontAsset> {
        let asset = Arc::new(asset);
        for category in &asset.covers {
            self.assets.insert(*category, Arc::clone(&asset));
        }
        asset
    }

    /// Primary font for `category`, without degradation.
    pub fn asset(&self, category: ScriptCategory) -> Option<&Arc<FontAsset>> {
        self.assets.get(&category)
    }

    /// Number of categories that have a primary font.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether no category has a font.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl FontResolver for FontTable {
    fn font_for(&self, category: ScriptCategory) -> Result<ResolvedFont, FontError> {
        if let Some(asset) = self.assets.get(&category) {
            return Ok(ResolvedFont {
                asset: Arc::clone(asset),
                requested: category,
                degraded: false,
            });
        }

        // Nearest available category: everything renders with the Latin-class font
        if category != ScriptCategory::Latin
            && let Some(asset) = self.assets.get(&ScriptCategory::Latin)
        {
            log::debug!(
                "No {} font, measuring with Latin-class font {}",
                category,
                asset.name
            );
            return Ok(ResolvedFont {
                asset: Arc::clone(asset),
                requested: category,
                degraded: true,
            });
        }

        Err(FontError::FontUnavailable { category })
    }
}

/// Lazily resolved font catalog for the current platform.
#[derive(Debug)]
pub struct FontCatalog {
    candidates: CandidateTable,
    font_override: Option<FontOverride>,
    resolved: OnceLock<FontTable>,
}

impl FontCatalog {
    /// Catalog over the built-in candidates of the running platform.
    pub fn new(font_override: Option<FontOverride>) -> Self {
        Self::with_candidates(CandidateTable::for_platform(Platform::current()), font_override)
    }

    /// Catalog over an explicit candidate table.
    pub fn with_candidates(
        candidates: CandidateTable,
        font_override: Option<FontOverride>,
    ) -> Self {
        Self {
            candidates,
            font_override,
            resolved: OnceLock::new(),
        }
    }

    /// Resolve the font table, once. Later calls return the cached table.
    pub fn resolve(&self) -> &FontTable {
        self.resolved
            .get_or_init(|| build_table(&self.candidates, self.font_override.as_ref()))
    }

    /// Whether `resolve` has already run.
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }
}

impl FontResolver for FontCatalog {
    fn font_for(&self, category: ScriptCategory) -> Result<ResolvedFont, FontError> {
        self.resolve().font_for(category)
    }
}

/// Face picked for a category before assets are grouped.
struct Pick {
    key: FontKey,
    name: String,
}

fn build_table(candidates: &CandidateTable, font_override: Option<&FontOverride>) -> FontTable {
    let mut system_db = None;
    let mut picks: Vec<(ScriptCategory, Pick)> = Vec::new();

    for category in ScriptCategory::ALL {
        if let Some(over) = font_override.filter(|o| o.covers.contains(&category)) {
            if !over.path.is_file() {
                log::warn!(
                    "Override font {} does not exist; shaping {} text will fail",
                    over.path.display(),
                    category
                );
            }
            log::info!(
                "Using override font {} for {} scripts",
                over.path.display(),
                category
            );
            picks.push((category, pick_file(over.path.clone())));
            continue;
        }

        if let Some(path) = candidates.files(category).iter().find(|p| p.is_file()) {
            log::info!("Resolved {} font: {}", category, path.display());
            picks.push((category, pick_file(path.clone())));
            continue;
        }
        log::debug!("No candidate file exists for {} scripts", category);

        if candidates.families(category).is_empty() {
            continue;
        }
        let db = system_db.get_or_insert_with(loader::load_system_database);
        let found = candidates
            .families(category)
            .iter()
            .find_map(|family| loader::find_family(db, family));
        match found {
            Some(face) => {
                log::info!(
                    "Resolved {} font from system family {}: {}",
                    category,
                    face.family,
                    face.path.display()
                );
                picks.push((
                    category,
                    Pick {
                        key: FontKey {
                            path: face.path,
                            face_index: face.face_index,
                        },
                        name: face.family,
                    },
                ));
            }
            None => log::warn!("No font installed for {} scripts", category),
        }
    }

    // One asset per distinct face, covering every category that picked it
    let mut grouped: Vec<FontAsset> = Vec::new();
    for (category, pick) in picks {
        match grouped.iter_mut().find(|asset| asset.key == pick.key) {
            Some(asset) => asset.covers.push(category),
            None => grouped.push(FontAsset {
                key: pick.key,
                name: pick.name,
                covers: vec![category],
            }),
        }
    }

    let mut table = FontTable::new();
    for asset in grouped {
        table.insert(asset);
    }
    table
}

fn pick_file(path: PathBuf) -> Pick {
    let name = types::display_name(&path);
    Pick {
        key: FontKey {
            path,
            face_index: 0,
        },
        name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SANS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fonts/DejaVuSans.ttf");
    const MONO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fonts/DejaVuSansMono.ttf");

    fn files_only(files: &[(ScriptCategory, &str)]) -> CandidateTable {
        let mut table = CandidateTable::empty();
        for (category, path) in files {
            table = table.with_files(*category, vec![PathBuf::from(path)]);
        }
        table
    }

    #[test]
    fn test_first_existing_file_wins() {
        let table = CandidateTable::empty().with_files(
            ScriptCategory::Latin,
            vec![PathBuf::from("/nonexistent/arial.ttf"), PathBuf::from(SANS)],
        );
        let catalog = FontCatalog::with_candidates(table, None);
        let font = catalog.font_for(ScriptCategory::Latin).unwrap();
        assert_eq!(font.asset.path(), PathBuf::from(SANS).as_path());
        assert!(!font.degraded);
    }

    #[test]
    fn test_shared_file_is_one_asset() {
        let catalog = FontCatalog::with_candidates(
            files_only(&[(ScriptCategory::Latin, SANS), (ScriptCategory::Thai, SANS)]),
            None,
        );
        let latin = catalog.font_for(ScriptCategory::Latin).unwrap();
        let thai = catalog.font_for(ScriptCategory::Thai).unwrap();
        assert!(Arc::ptr_eq(&latin.asset, &thai.asset));
        assert_eq!(
            latin.asset.covers,
            vec![ScriptCategory::Latin, ScriptCategory::Thai]
        );
    }

    #[test]
    fn test_missing_category_degrades_to_latin() {
        let catalog =
            FontCatalog::with_candidates(files_only(&[(ScriptCategory::Latin, SANS)]), None);
        let font = catalog.font_for(ScriptCategory::Korean).unwrap();
        assert!(font.degraded);
        assert_eq!(font.requested, ScriptCategory::Korean);
        assert!(font.asset.covers(ScriptCategory::Latin));
    }

    #[test]
    fn test_no_fonts_is_unavailable() {
        let catalog = FontCatalog::with_candidates(CandidateTable::empty(), None);
        let err = catalog.font_for(ScriptCategory::Thai).unwrap_err();
        assert!(matches!(
            err,
            FontError::FontUnavailable {
                category: ScriptCategory::Thai
            }
        ));
        assert!(catalog.font_for(ScriptCategory::Latin).is_err());
    }

    #[test]
    fn test_override_replaces_only_covered_categories() {
        let candidates = files_only(&[
            (ScriptCategory::Latin, SANS),
            (ScriptCategory::Thai, SANS),
            (ScriptCategory::Cjk, SANS),
        ]);
        let catalog = FontCatalog::with_candidates(candidates, Some(FontOverride::latin(MONO)));
        let latin = catalog.font_for(ScriptCategory::Latin).unwrap();
        let thai = catalog.font_for(ScriptCategory::Thai).unwrap();
        let cjk = catalog.font_for(ScriptCategory::Cjk).unwrap();
        assert_eq!(latin.asset.path(), PathBuf::from(MONO).as_path());
        assert_eq!(thai.asset.path(), PathBuf::from(SANS).as_path());
        assert_eq!(cjk.asset.path(), PathBuf::from(SANS).as_path());
    }

    #[test]
    fn test_override_with_explicit_coverage() {
        let candidates = files_only(&[(ScriptCategory::Latin, SANS)]);
        let over = FontOverride::covering(MONO, vec![ScriptCategory::Latin, ScriptCategory::Thai]);
        let catalog = FontCatalog::with_candidates(candidates, Some(over));
        let thai = catalog.font_for(ScriptCategory::Thai).unwrap();
        assert_eq!(thai.asset.path(), PathBuf::from(MONO).as_path());
        assert!(!thai.degraded);
    }

    #[test]
    fn test_resolution_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("latin.ttf");
        std::fs::copy(SANS, &font_path).unwrap();

        let catalog = FontCatalog::with_candidates(
            CandidateTable::empty().with_files(ScriptCategory::Latin, vec![font_path.clone()]),
            None,
        );
        assert!(!catalog.is_resolved());
        let first = Arc::clone(catalog.resolve().asset(ScriptCategory::Latin).unwrap());
        assert!(catalog.is_resolved());

        // Removing the file after resolution does not change the table
        std::fs::remove_file(&font_path).unwrap();
        let second = catalog.font_for(ScriptCategory::Latin).unwrap();
        assert!(Arc::ptr_eq(&first, &second.asset));
    }

    #[test]
    fn test_table_insert_covers_categories() {
        let mut table = FontTable::new();
        assert!(table.is_empty());
        table.insert(FontAsset::new(SANS, vec![ScriptCategory::Latin, ScriptCategory::Cjk]));
        assert_eq!(table.len(), 2);
        assert!(table.asset(ScriptCategory::Cjk).is_some());
        assert!(table.asset(ScriptCategory::Thai).is_none());
    }
}
