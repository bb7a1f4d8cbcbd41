use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

const LIGATURES: [(char, &str); 5] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Normalize the text of a single run.
///
/// Applied to every run before it is indexed or joined into the document
/// text, so a heading taken from the font map can be found verbatim in the
/// whole text. NFC normalization, ligature expansion, removal of U+FFFD and
/// NUL, and collapsing of whitespace to single spaces.
pub fn normalize_run(text: &str) -> String {
    let mut result: String = text.nfc().collect();

    for (ligature, replacement) in LIGATURES {
        if result.contains(ligature) {
            result = result.replace(ligature, replacement);
        }
    }

    result.retain(|c| c != '\u{FFFD}' && c != '\0');

    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r"\s+").unwrap());

    re_spaces.replace_all(result.trim(), " ").into_owned()
}
