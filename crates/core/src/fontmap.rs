use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A font size in points, quantised to hundredths.
///
/// Raw sizes coming out of a text matrix carry float noise (`11.999998`), so
/// two runs set in the same style would land in different buckets. Rounding
/// on construction makes equality, hashing and ordering total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontSize(f32);

impl FontSize {
    pub fn new(points: f32) -> Self {
        FontSize((points * 100.0).round() / 100.0)
    }

    pub fn as_f32(&self) -> f32 {
        self.0
    }
}

impl PartialEq for FontSize {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FontSize {}

impl Hash for FontSize {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for FontSize {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FontSize {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f32> for FontSize {
    fn from(points: f32) -> Self {
        FontSize::new(points)
    }
}

impl fmt::Display for FontSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All text rendered with a single font, bucketed by size.
#[derive(Debug, Clone, Default)]
pub struct FontRecord {
    occurrences: IndexMap<FontSize, Vec<String>>,
}

impl FontRecord {
    /// Sizes this font was rendered at, in first-seen order.
    pub fn sizes(&self) -> impl Iterator<Item = FontSize> + '_ {
        self.occurrences.keys().copied()
    }

    /// Text runs rendered at `size`, in document order.
    pub fn texts(&self, size: FontSize) -> &[String] {
        self.occurrences
            .get(&size)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn occurrences(&self) -> impl Iterator<Item = (FontSize, &[String])> + '_ {
        self.occurrences
            .iter()
            .map(|(size, texts)| (*size, texts.as_slice()))
    }
}

/// Font identifier -> size -> ordered text runs.
///
/// Fonts and sizes enumerate in the order they were first seen while walking
/// the document. Only the order of runs within one `(font, size)` bucket
/// carries meaning.
#[derive(Debug, Clone, Default)]
pub struct FontMap {
    fonts: IndexMap<String, FontRecord>,
}

impl FontMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from `(font, size, text)` triples in rendering order.
    pub fn from_runs<I, F, T>(runs: I) -> Self
    where
        I: IntoIterator<Item = (F, f32, T)>,
        F: Into<String>,
        T: Into<String>,
    {
        let mut map = FontMap::new();
        for (font, size, text) in runs {
            map.record(font, size, text);
        }
        map
    }

    /// Record one text run. Returns `false` when the run was ignored.
    ///
    /// Runs with no font name, a non-positive size, or whitespace-only text
    /// cannot be attributed to a visual style and are dropped.
    pub fn record(&mut self, font: impl Into<String>, size: f32, text: impl Into<String>) -> bool {
        let font = font.into();
        let text = text.into();

        if font.is_empty() || size.is_nan() || size <= 0.0 || text.trim().is_empty() {
            return false;
        }

        self.fonts
            .entry(font)
            .or_default()
            .occurrences
            .entry(FontSize::new(size))
            .or_default()
            .push(text);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn get(&self, font: &str) -> Option<&FontRecord> {
        self.fonts.get(font)
    }

    /// Text runs for a `(font, size)` bucket; empty if the bucket is unknown.
    pub fn texts(&self, font: &str, size: FontSize) -> &[String] {
        self.fonts
            .get(font)
            .map(|record| record.texts(size))
            .unwrap_or_default()
    }

    pub fn fonts(&self) -> impl Iterator<Item = (&str, &FontRecord)> + '_ {
        self.fonts.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Every `(font, size, runs)` bucket in enumeration order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, FontSize, &[String])> + '_ {
        self.fonts().flat_map(|(font, record)| {
            record
                .occurrences()
                .map(move |(size, texts)| (font, size, texts))
        })
    }
}
