//! Script categories and script-run segmentation.
//!
//! Unicode scripts are folded into a few categories, one per font asset.
//! Characters without a strong script of their own (spaces, punctuation,
//! digits, combining marks) join the run of the preceding strong character,
//! or of the following one when they lead the string. A string with no
//! strong character at all is a single Latin-class run.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use unicode_script::{Script, UnicodeScript};

/// Engine-level grouping of Unicode scripts that share one rendering font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCategory {
    /// Latin, Greek, Cyrillic, Armenian, Hebrew and Arabic
    Latin,
    /// Hangul
    Korean,
    /// Thai
    Thai,
    /// Han, Hiragana, Katakana and Bopomofo
    Cjk,
    /// Any strong script not listed above
    Unclassified,
}

impl ScriptCategory {
    /// Every category, in resolution order.
    pub const ALL: [ScriptCategory; 5] = [
        ScriptCategory::Latin,
        ScriptCategory::Korean,
        ScriptCategory::Thai,
        ScriptCategory::Cjk,
        ScriptCategory::Unclassified,
    ];

    /// Category used for text that has no strong script character.
    pub const DEFAULT: ScriptCategory = ScriptCategory::Latin;

    /// Short lowercase name, also accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            ScriptCategory::Latin => "latin",
            ScriptCategory::Korean => "korean",
            ScriptCategory::Thai => "thai",
            ScriptCategory::Cjk => "cjk",
            ScriptCategory::Unclassified => "other",
        }
    }

    /// Map a Unicode script to its category.
    ///
    /// Returns `None` for `Common`, `Inherited` and `Unknown`, which take
    /// the category of their neighbours.
    pub fn from_script(script: Script) -> Option<Self> {
        match script {
            Script::Common | Script::Inherited | Script::Unknown => None,
            Script::Latin
            | Script::Greek
            | Script::Cyrillic
            | Script::Armenian
            | Script::Hebrew
            | Script::Arabic => Some(ScriptCategory::Latin),
            Script::Hangul => Some(ScriptCategory::Korean),
            Script::Thai => Some(ScriptCategory::Thai),
            Script::Han | Script::Hiragana | Script::Katakana | Script::Bopomofo => {
                Some(ScriptCategory::Cjk)
            }
            _ => Some(ScriptCategory::Unclassified),
        }
    }

    /// Category of a single character, `None` when it has no strong script.
    pub fn of_char(ch: char) -> Option<Self> {
        Self::from_script(ch.script())
    }
}

impl fmt::Display for ScriptCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A category name that `ScriptCategory::from_str` did not recognise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown script category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for ScriptCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin" => Ok(ScriptCategory::Latin),
            "korean" | "hangul" => Ok(ScriptCategory::Korean),
            "thai" => Ok(ScriptCategory::Thai),
            "cjk" => Ok(ScriptCategory::Cjk),
            "other" | "unclassified" => Ok(ScriptCategory::Unclassified),
            _ => Err(UnknownCategory(s.to_string())),
        }
    }
}

/// A maximal run of text sharing one script category.
///
/// Offsets are byte offsets into the measured string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSegment {
    /// Byte offset of the first character
    pub start: usize,
    /// Length in bytes
    pub len: usize,
    /// Category assigned to every character of the run
    pub category: ScriptCategory,
}

impl ScriptSegment {
    /// Byte range covered by the segment.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Slice of `source` covered by the segment.
    ///
    /// `source` must be the string the segment was produced from.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}

/// Split `text` into ordered, gap-free script-category runs.
///
/// An empty string yields no segments.
pub fn segment(text: &str) -> Vec<ScriptSegment> {
    split_runs(text, ScriptCategory::of_char, ScriptCategory::DEFAULT)
        .into_iter()
        .map(|(start, len, category)| ScriptSegment {
            start,
            len,
            category,
        })
        .collect()
}

/// A maximal run of text sharing one Unicode script.
///
/// Runs of one category can still mix scripts (Latin and Arabic share a
/// font). Shaping needs them apart, since each script has its own
/// shaping rules and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRun {
    /// Byte offset of the first character
    pub start: usize,
    /// Length in bytes
    pub len: usize,
    /// Script of every strong character in the run
    pub script: Script,
}

impl ScriptRun {
    /// Slice of `source` covered by the run.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.start + self.len]
    }
}

/// Split `text` into ordered, gap-free Unicode script runs.
///
/// Weak characters attach to their neighbours exactly as in `segment`.
/// A string with no strong character is one `Common` run.
pub fn script_runs(text: &str) -> Vec<ScriptRun> {
    split_runs(text, strong_script, Script::Common)
        .into_iter()
        .map(|(start, len, script)| ScriptRun { start, len, script })
        .collect()
}

fn strong_script(ch: char) -> Option<Script> {
    match ch.script() {
        Script::Common | Script::Inherited | Script::Unknown => None,
        script => Some(script),
    }
}

/// Group characters into maximal runs of one class. Characters `classify`
/// maps to `None` join the preceding run, or the first run when leading.
fn split_runs<K: Copy + PartialEq>(
    text: &str,
    classify: impl Fn(char) -> Option<K>,
    fallback: K,
) -> Vec<(usize, usize, K)> {
    let mut runs = Vec::new();
    let mut current: Option<K> = None;
    let mut run_start = 0;

    for (pos, ch) in text.char_indices() {
        let Some(class) = classify(ch) else {
            continue;
        };
        match current {
            // Leading weak characters join the first strong run
            None => current = Some(class),
            Some(prev) if prev != class => {
                runs.push((run_start, pos - run_start, prev));
                run_start = pos;
                current = Some(class);
            }
            Some(_) => {}
        }
    }

    if !text.is_empty() {
        runs.push((run_start, text.len() - run_start, current.unwrap_or(fallback)));
    }

    runs
}
