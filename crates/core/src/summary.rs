use indexmap::IndexMap;

/// Heading -> summary text. Sections that were never summarized map to "".
pub type SummaryMap = IndexMap<String, String>;

/// Heading words marking sections that are not worth summarizing.
const SKIPPED_SECTION_WORDS: &[&str] = &["references", "appendix"];

/// Whether the section under `heading` is skipped by the summarizer.
pub fn is_skipped_section(heading: &str) -> bool {
    let lower = heading.to_lowercase();
    SKIPPED_SECTION_WORDS.iter().any(|word| lower.contains(word))
}

/// A summary map with every heading present and empty.
pub fn seed_summaries<S: AsRef<str>>(headings: &[S]) -> SummaryMap {
    headings
        .iter()
        .map(|heading| (heading.as_ref().to_string(), String::new()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_references_and_appendix() {
        assert!(is_skipped_section("References"));
        assert!(is_skipped_section("7 REFERENCES"));
        assert!(is_skipped_section("Appendix A: Proofs"));
    }

    #[test]
    fn test_keeps_regular_sections() {
        assert!(!is_skipped_section("1 Introduction"));
        assert!(!is_skipped_section("Conclusion"));
    }

    #[test]
    fn test_seeded_map_is_empty_and_ordered() {
        let map = seed_summaries(&["Abstract", "Introduction"]);
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Abstract", "Introduction"]);
        assert!(map.values().all(String::is_empty));
    }
}
