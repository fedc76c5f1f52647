//! Shared integration test helpers for serp-pixel.
//!
//! Measurements run against the DejaVu fonts bundled with
//! `serp-pixel-fonts`, so results do not depend on the fonts installed on
//! the test machine.

#![allow(dead_code)]

use std::path::PathBuf;

use serp_pixel::WidthMeasurer;
use serp_pixel::serp_pixel_fonts::{
    CandidateTable, FontAsset, FontCatalog, FontTable, ScriptCategory,
};

pub fn sans_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("serp-pixel-fonts/fonts/DejaVuSans.ttf")
}

pub fn mono_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("serp-pixel-fonts/fonts/DejaVuSansMono.ttf")
}

/// DejaVu Sans with Arial advance widths for printable ASCII and no
/// kerning, so Latin text measures as Arial does.
pub fn arial_metric_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("serp-pixel-fonts/fonts/ArialMetricSans.ttf")
}

/// DejaVu Sans for every category.
pub fn sans_table() -> FontTable {
    let mut table = FontTable::new();
    table.insert(FontAsset::new(sans_path(), ScriptCategory::ALL.to_vec()));
    table
}

/// DejaVu Sans for Latin, DejaVu Sans Mono for Korean. Thai and CJK degrade.
pub fn split_table() -> FontTable {
    let mut table = FontTable::new();
    table.insert(FontAsset::new(sans_path(), vec![ScriptCategory::Latin]));
    table.insert(FontAsset::new(mono_path(), vec![ScriptCategory::Korean]));
    table
}

/// Candidate table listing the bundled fonts as if they were system files.
pub fn bundled_candidates() -> CandidateTable {
    CandidateTable::empty()
        .with_files(ScriptCategory::Latin, vec![sans_path()])
        .with_files(ScriptCategory::Thai, vec![sans_path()])
        .with_files(ScriptCategory::Cjk, vec![mono_path()])
}

pub fn sans_measurer() -> WidthMeasurer<FontTable> {
    WidthMeasurer::new(sans_table())
}

pub fn bundled_catalog() -> FontCatalog {
    FontCatalog::with_candidates(bundled_candidates(), None)
}
