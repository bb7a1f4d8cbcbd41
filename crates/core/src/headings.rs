//! Guess which `(font, size)` pair a document uses for its section headings.
//!
//! Academic papers tend to reuse a small vocabulary of section names
//! ("Abstract", "Introduction", "References", ...). The bucket of the
//! [`FontMap`] whose short runs mention that vocabulary most often is taken to
//! be the heading style.

use serde::Serialize;

use crate::fontmap::{FontMap, FontSize};

/// Lower-case substrings that commonly appear in section headings.
pub const KNOWN_SECTION_NAMES: &[&str] = &[
    "abstract",
    "introduction",
    "approach",
    "methodology",
    "conclusion",
    "references",
    "future work",
    "acknowledgements",
];

/// Runs shorter than this many characters are too short to be a heading.
pub const MIN_HEADING_CHARS: usize = 5;

/// Runs longer than this many characters are too long to be a heading.
pub const MAX_HEADING_CHARS: usize = 50;

/// The visual style inferred for section headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingStyle {
    pub font: String,
    pub size: FontSize,
}

/// Heading-vocabulary hits for one `(font, size)` bucket.
#[derive(Debug, Clone, Serialize)]
pub struct StyleScore {
    pub font: String,
    pub size: FontSize,
    pub hits: usize,
    pub runs: usize,
}

fn is_heading_length(text: &str) -> bool {
    let len = text.chars().count();
    (MIN_HEADING_CHARS..=MAX_HEADING_CHARS).contains(&len)
}

/// Count heading-vocabulary hits across a bucket's runs.
///
/// A run contributes once for every vocabulary entry it contains, so
/// "Conclusion and Future Work" scores two. Runs outside the heading length
/// window never score.
pub fn count_heading_hits<S: AsRef<str>>(runs: &[S]) -> usize {
    runs.iter()
        .map(AsRef::<str>::as_ref)
        .filter(|text| is_heading_length(text))
        .map(|text| {
            let lower = text.to_lowercase();
            KNOWN_SECTION_NAMES
                .iter()
                .filter(|name| lower.contains(*name))
                .count()
        })
        .sum()
}

/// Score every bucket of the map, in enumeration order.
pub fn score_heading_styles(fontmap: &FontMap) -> Vec<StyleScore> {
    fontmap
        .buckets()
        .map(|(font, size, runs)| StyleScore {
            font: font.to_string(),
            size,
            hits: count_heading_hits(runs),
            runs: runs.len(),
        })
        .collect()
}

/// Pick the bucket with the most heading-vocabulary hits.
///
/// Ties keep the first bucket seen, and when nothing scores at all the first
/// bucket is still returned. `None` only for an empty map.
pub fn infer_heading_style(fontmap: &FontMap) -> Option<HeadingStyle> {
    let mut best: Option<StyleScore> = None;

    for score in score_heading_styles(fontmap) {
        if best.as_ref().map_or(true, |b| score.hits > b.hits) {
            best = Some(score);
        }
    }

    best.map(|score| HeadingStyle {
        font: score.font,
        size: score.size,
    })
}

/// The runs set in `style`, in document order.
pub fn candidate_headings(fontmap: &FontMap, style: &HeadingStyle) -> Vec<String> {
    fontmap.texts(&style.font, style.size).to_vec()
}
