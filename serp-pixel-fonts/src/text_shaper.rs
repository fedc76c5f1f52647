//! Text shaping using HarfBuzz via rustybuzz.
//!
//! Widths come from shaped glyph advances, not from per-character metrics,
//! so kerning, ligatures and complex-script substitution (Arabic joining,
//! Thai mark placement) are reflected in the result. Each Unicode script
//! run is shaped in its own buffer with its own script and direction.
//!
//! # Caching
//!
//! - Font faces are read and parsed once per `FontKey` and kept for the
//!   shaper's lifetime.
//! - A shaping context (face + pixel scale) is built once per
//!   (`FontKey`, pixel size) pair.
//! - Shaped-run results are kept in a bounded LRU cache keyed by text,
//!   font and size.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::sync::Arc;

use lru::LruCache;
use rustybuzz::ttf_parser::Tag;
use rustybuzz::{Face, Feature, UnicodeBuffer};
use unicode_script::Script;

use crate::error::FontError;
use crate::font_catalog::{FontAsset, FontKey};
use crate::script::script_runs;

/// Default number of shaped runs kept in the result cache.
pub const DEFAULT_CACHE_SIZE: usize = 1024;

/// Result of shaping one run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapedRun {
    /// Total horizontal advance in pixels
    pub width_px: f64,
    /// Number of glyphs produced
    pub glyph_count: usize,
    /// Glyphs that fell back to the missing-glyph box (glyph id 0)
    pub missing_glyphs: usize,
}

impl ShapedRun {
    /// Whether any glyph is missing from the font.
    pub fn has_missing_glyphs(&self) -> bool {
        self.missing_glyphs > 0
    }
}

/// OpenType feature toggles. All on by default, as in browsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapingOptions {
    /// Standard and contextual ligatures (liga, clig)
    pub enable_ligatures: bool,

    /// Kerning adjustments (kern)
    pub enable_kerning: bool,

    /// Contextual alternates (calt)
    pub enable_contextual_alternates: bool,
}

impl Default for ShapingOptions {
    fn default() -> Self {
        Self {
            enable_ligatures: true,
            enable_kerning: true,
            enable_contextual_alternates: true,
        }
    }
}

impl ShapingOptions {
    /// Feature list handed to rustybuzz.
    fn features(&self) -> Vec<Feature> {
        let toggle = |tag: &str, on: bool| {
            let name = if on {
                tag.to_string()
            } else {
                format!("-{tag}")
            };
            Feature::from_str(&name).ok()
        };

        [
            toggle("liga", self.enable_ligatures),
            toggle("clig", self.enable_ligatures),
            toggle("kern", self.enable_kerning),
            toggle("calt", self.enable_contextual_alternates),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Parsed font face kept alive together with its bytes.
struct LoadedFace {
    // Declared before `data` so it is dropped first
    face: Face<'static>,
    #[allow(dead_code)]
    data: Arc<Vec<u8>>,
    units_per_em: f64,
}

impl LoadedFace {
    fn load(key: &FontKey) -> Result<Self, FontError> {
        let path = key.path.display().to_string();
        let data = std::fs::read(&key.path).map_err(|source| FontError::FontRead {
            path: path.clone(),
            source,
        })?;
        let data = Arc::new(data);

        // SAFETY: the bytes live in an Arc owned by this struct and are never
        // mutated. The face is dropped before the Arc because of field order,
        // and the heap buffer does not move when the struct moves.
        let face = unsafe {
            let bytes: &'static [u8] = std::mem::transmute(data.as_slice());
            Face::from_slice(bytes, key.face_index)
        }
        .ok_or_else(|| FontError::FontLoad {
            path: path.clone(),
            reason: format!("no usable font face at index {}", key.face_index),
        })?;

        let units_per_em = f64::from(face.units_per_em());
        if units_per_em <= 0.0 {
            return Err(FontError::FontLoad {
                path,
                reason: "font reports zero units per em".to_string(),
            });
        }

        Ok(Self {
            face,
            data,
            units_per_em,
        })
    }
}

/// A face bound to one pixel size.
#[derive(Clone)]
struct ShapingContext {
    face: Arc<LoadedFace>,
    /// Pixels per font design unit
    scale: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ContextKey {
    font: FontKey,
    size_bits: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ShapeCacheKey {
    text: String,
    context: ContextKey,
}

/// HarfBuzz script for a strong Unicode script, by ISO 15924 code.
fn harfbuzz_script(script: Script) -> Option<rustybuzz::Script> {
    if script == Script::Common {
        return None;
    }
    rustybuzz::Script::from_iso15924_tag(Tag::from_bytes_lossy(script.short_name().as_bytes()))
}

/// Text shaper using HarfBuzz via rustybuzz.
pub struct TextShaper {
    faces: HashMap<FontKey, Arc<LoadedFace>>,
    contexts: HashMap<ContextKey, ShapingContext>,
    shape_cache: LruCache<ShapeCacheKey, ShapedRun>,
    features: Vec<Feature>,
}

impl TextShaper {
    /// Create a text shaper with default options and cache size.
    pub fn new() -> Self {
        Self::with_options(ShapingOptions::default(), DEFAULT_CACHE_SIZE)
    }

    /// Create a text shaper with a specific result cache size.
    pub fn with_cache_size(max_cache_size: usize) -> Self {
        Self::with_options(ShapingOptions::default(), max_cache_size)
    }

    /// Create a text shaper with explicit feature toggles and cache size.
    pub fn with_options(options: ShapingOptions, max_cache_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            faces: HashMap::new(),
            contexts: HashMap::new(),
            shape_cache: LruCache::new(capacity),
            features: options.features(),
        }
    }

    /// Shape `text` with `font` at `pixel_size` and return its advance.
    ///
    /// # Errors
    /// `FontRead` or `FontLoad` when the font file cannot be used. The
    /// shaper never substitutes another font or size.
    pub fn shape(
        &mut self,
        text: &str,
        font: &FontAsset,
        pixel_size: f32,
    ) -> Result<ShapedRun, FontError> {
        if text.is_empty() {
            return Ok(ShapedRun::default());
        }

        let context_key = ContextKey {
            font: font.key.clone(),
            size_bits: pixel_size.to_bits(),
        };
        let cache_key = ShapeCacheKey {
            text: text.to_string(),
            context: context_key.clone(),
        };
        if let Some(cached) = self.shape_cache.get(&cache_key) {
            return Ok(*cached);
        }

        let context = self.context(context_key, pixel_size)?;

        // One buffer per Unicode script run: Latin-class text can mix
        // scripts with different shaping rules (Arabic joining, RTL)
        let mut advance_units: i64 = 0;
        let mut glyph_count = 0;
        let mut missing_glyphs = 0;
        for script_run in script_runs(text) {
            let mut buffer = UnicodeBuffer::new();
            buffer.push_str(script_run.text(text));
            if let Some(script) = harfbuzz_script(script_run.script) {
                buffer.set_script(script);
            }
            buffer.guess_segment_properties();

            let glyphs = rustybuzz::shape(&context.face.face, &self.features, buffer);
            advance_units += glyphs
                .glyph_positions()
                .iter()
                .map(|pos| i64::from(pos.x_advance))
                .sum::<i64>();
            missing_glyphs += glyphs
                .glyph_infos()
                .iter()
                .filter(|info| info.glyph_id == 0)
                .count();
            glyph_count += glyphs.len();
        }

        let run = ShapedRun {
            width_px: (advance_units as f64 * context.scale).max(0.0),
            glyph_count,
            missing_glyphs,
        };
        if run.has_missing_glyphs() {
            log::debug!(
                "{} of {} glyphs missing in {} for {:?}",
                missing_glyphs,
                run.glyph_count,
                font.name,
                text
            );
        }

        self.shape_cache.put(cache_key, run);
        Ok(run)
    }

    /// Shaping context for a font and size, loading the face on first use.
    fn context(&mut self, key: ContextKey, pixel_size: f32) -> Result<ShapingContext, FontError> {
        if let Some(context) = self.contexts.get(&key) {
            return Ok(context.clone());
        }

        let face = match self.faces.get(&key.font) {
            Some(face) => Arc::clone(face),
            None => {
                log::debug!("Loading font face {}", key.font.path.display());
                let face = Arc::new(LoadedFace::load(&key.font)?);
                self.faces.insert(key.font.clone(), Arc::clone(&face));
                face
            }
        };

        let context = ShapingContext {
            scale: f64::from(pixel_size) / face.units_per_em,
            face,
        };
        self.contexts.insert(key, context.clone());
        Ok(context)
    }

    /// Number of (font, size) shaping contexts built so far.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Number of font faces parsed so far.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Clear the shaped-run cache. Loaded faces are kept.
    pub fn clear_cache(&mut self) {
        self.shape_cache.clear();
    }

    /// Current number of cached shaped runs.
    pub fn cache_size(&self) -> usize {
        self.shape_cache.len()
    }
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}
