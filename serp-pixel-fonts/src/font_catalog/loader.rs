//! System font database lookups for family-name candidates.

use std::path::PathBuf;

use fontdb::{Database, Family, Query, Source};

/// A face found in the system font database.
#[derive(Debug, Clone)]
pub(crate) struct SystemFace {
    pub path: PathBuf,
    pub face_index: u32,
    pub family: String,
}

/// Load the system font database.
pub(crate) fn load_system_database() -> Database {
    let mut font_db = Database::new();
    font_db.load_system_fonts();
    log::info!("Loaded {} system fonts", font_db.len());
    font_db
}

/// Find the regular face of `family_name` in the font database.
///
/// Only file-backed faces qualify, since the shaper loads fonts by path.
pub(crate) fn find_family(db: &Database, family_name: &str) -> Option<SystemFace> {
    let query = Query {
        families: &[Family::Name(family_name)],
        weight: fontdb::Weight::NORMAL,
        style: fontdb::Style::Normal,
        ..Query::default()
    };

    let id = db.query(&query)?;
    let face = db.face(id)?;

    let path = match &face.source {
        Source::File(path) | Source::SharedFile(path, _) => path.clone(),
        Source::Binary(_) => return None,
    };

    let family = face
        .families
        .first()
        .map(|(name, _)| name.clone())
        .unwrap_or_else(|| family_name.to_string());

    Some(SystemFace {
        path,
        face_index: face.index,
        family,
    })
}
