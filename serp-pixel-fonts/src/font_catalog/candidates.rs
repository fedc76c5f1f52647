//! Per-platform font candidates for each script category.
//!
//! File candidates are checked in order and the first existing file wins.
//! Family candidates are only consulted when no file candidate exists; they
//! name open-license fonts looked up through the system font database.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::script::ScriptCategory;

/// Operating system family that decides where fonts are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Platform of the running process. Unknown Unix flavours use Linux paths.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Linux
        }
    }
}

/// Ordered font candidates per script category.
#[derive(Debug, Clone, Default)]
pub struct CandidateTable {
    files: HashMap<ScriptCategory, Vec<PathBuf>>,
    families: HashMap<ScriptCategory, Vec<String>>,
}

impl CandidateTable {
    /// Table with no candidates at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in candidates for `platform`.
    pub fn for_platform(platform: Platform) -> Self {
        let mut table = Self::empty();
        for category in ScriptCategory::ALL {
            table
                .files
                .insert(category, platform_files(platform, category));
            table.families.insert(
                category,
                open_license_families(category)
                    .iter()
                    .map(|name| name.to_string())
                    .collect(),
            );
        }
        table
    }

    /// Replace the file candidates for `category`.
    pub fn with_files(mut self, category: ScriptCategory, files: Vec<PathBuf>) -> Self {
        self.files.insert(category, files);
        self
    }

    /// Replace the family-name candidates for `category`.
    pub fn with_families(mut self, category: ScriptCategory, families: Vec<String>) -> Self {
        self.families.insert(category, families);
        self
    }

    /// File candidates for `category`, in priority order.
    pub fn files(&self, category: ScriptCategory) -> &[PathBuf] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Family-name candidates for `category`, in priority order.
    pub fn families(&self, category: ScriptCategory) -> &[String] {
        self.families.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn platform_files(platform: Platform, category: ScriptCategory) -> Vec<PathBuf> {
    match platform {
        Platform::Windows => {
            let windir = std::env::var("WINDIR").unwrap_or_else(|_| "C:\\Windows".to_string());
            let fonts = PathBuf::from(windir).join("Fonts");
            let names: &[&str] = match category {
                ScriptCategory::Latin => &["arial.ttf"],
                ScriptCategory::Korean => &["malgun.ttf", "gulim.ttc"],
                ScriptCategory::Thai => &["tahoma.ttf", "leelawui.ttf"],
                ScriptCategory::Cjk => &["msyh.ttc", "meiryo.ttc", "simsun.ttc"],
                ScriptCategory::Unclassified => &["arialuni.ttf", "segoeui.ttf"],
            };
            let mut files: Vec<PathBuf> = names.iter().map(|name| fonts.join(name)).collect();
            if category == ScriptCategory::Latin {
                files.push(PathBuf::from("C:/Windows/Fonts/arial.ttf"));
            }
            files
        }
        Platform::MacOs => {
            let mut files: Vec<PathBuf> = match category {
                ScriptCategory::Latin => vec![
                    "/Library/Fonts/Arial.ttf",
                    "/System/Library/Fonts/Supplemental/Arial.ttf",
                    "/System/Library/Fonts/Arial.ttf",
                ],
                ScriptCategory::Korean => vec![
                    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
                    "/Library/Fonts/AppleGothic.ttf",
                ],
                ScriptCategory::Thai => vec![
                    "/System/Library/Fonts/Supplemental/Thonburi.ttc",
                    "/System/Library/Fonts/Thonburi.ttc",
                ],
                ScriptCategory::Cjk => vec![
                    "/System/Library/Fonts/PingFang.ttc",
                    "/System/Library/Fonts/Hiragino Sans GB.ttc",
                ],
                ScriptCategory::Unclassified => vec![
                    "/Library/Fonts/Arial Unicode.ttf",
                    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
                ],
            }
            .into_iter()
            .map(PathBuf::from)
            .collect();
            if category == ScriptCategory::Latin
                && let Some(home) = dirs::home_dir()
            {
                files.push(home.join("Library/Fonts/Arial.ttf"));
            }
            files
        }
        Platform::Linux => match category {
            ScriptCategory::Latin => vec![
                "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
                "/usr/share/fonts/TTF/LiberationSans-Regular.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            ],
            ScriptCategory::Korean => vec![
                "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
            ],
            ScriptCategory::Thai => vec![
                "/usr/share/fonts/truetype/noto/NotoSansThai-Regular.ttf",
                "/usr/share/fonts/noto/NotoSansThai-Regular.ttf",
                "/usr/share/fonts/truetype/tlwg/Loma.ttf",
            ],
            ScriptCategory::Cjk => vec![
                "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
                "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            ],
            ScriptCategory::Unclassified => vec![
                "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
                "/usr/share/fonts/noto/NotoSans-Regular.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            ],
        }
        .into_iter()
        .map(PathBuf::from)
        .collect(),
    }
}

/// Open-license families tried through the font database, per category.
fn open_license_families(category: ScriptCategory) -> &'static [&'static str] {
    match category {
        // Liberation Sans and Arimo are metric-compatible with Arial
        ScriptCategory::Latin => &["Arial", "Liberation Sans", "Arimo", "DejaVu Sans"],
        ScriptCategory::Korean => &["Noto Sans CJK KR", "Noto Sans KR", "NanumGothic", "UnDotum"],
        ScriptCategory::Thai => &["Noto Sans Thai", "Noto Sans Thai UI", "Loma", "Garuda"],
        ScriptCategory::Cjk => &[
            "Noto Sans CJK SC",
            "Noto Sans SC",
            "WenQuanYi Micro Hei",
            "Droid Sans Fallback",
        ],
        ScriptCategory::Unclassified => &["Noto Sans", "DejaVu Sans", "FreeSans"],
    }
}
