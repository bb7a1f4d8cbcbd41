//! Reconcile a model's cleaned-up heading list with the original candidates.
//!
//! Models paraphrase. Asked to return the candidates that are real section
//! headings, they drop numbering ("1 Introduction" -> "Introduction"), fix
//! casing or merge lines. Rather than trusting the returned strings, every
//! returned string is scored against every original candidate and only
//! originals that closely match something the model returned are kept.

use serde::Serialize;
use thiserror::Error;

/// Pairs scoring below this are considered unrelated.
pub const SIMILARITY_THRESHOLD: u8 = 75;

#[derive(Debug, Error)]
#[error("Could not parse model response as a JSON array of strings: {source}")]
pub struct ResponseParseError {
    #[source]
    source: serde_json::Error,
    /// The response text after fence stripping.
    pub response: String,
}

/// One `(candidate, suggestion)` pair and its similarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredPair {
    pub score: u8,
    pub candidate: String,
    pub suggestion: String,
}

/// Insertion/deletion similarity as a percentage.
///
/// `2 * lcs / (len(a) + len(b))` over chars, scaled to `0..=100` and
/// rounded. Substitutions count as a deletion plus an insertion, so a
/// numbering prefix ("IV. Conclusion" vs "Conclusion") costs only its own
/// length. Symmetric and case-sensitive; two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> u8 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100;
    }

    let ratio = 2.0 * longest_common_subsequence(&a, &b) as f64 / total as f64;
    (ratio * 100.0).round() as u8
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];

    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }

    row[b.len()]
}

/// Score every candidate against every suggestion, best first.
///
/// The sort is stable, so pairs with equal scores stay in candidate-major
/// order.
pub fn rank_pairs<C, S>(candidates: &[C], suggestions: &[S]) -> Vec<ScoredPair>
where
    C: AsRef<str>,
    S: AsRef<str>,
{
    let mut pairs: Vec<ScoredPair> = candidates
        .iter()
        .flat_map(|candidate| {
            suggestions.iter().map(move |suggestion| ScoredPair {
                score: similarity_ratio(candidate.as_ref(), suggestion.as_ref()),
                candidate: candidate.as_ref().to_string(),
                suggestion: suggestion.as_ref().to_string(),
            })
        })
        .collect();

    pairs.sort_by(|a, b| b.score.cmp(&a.score));
    pairs
}

/// Keep the leading run of `ranked` that clears [`SIMILARITY_THRESHOLD`].
///
/// The cut is at the first pair scoring below the threshold. When every pair
/// clears it, at most `candidate_count` pairs are kept.
pub fn select_matches(ranked: &[ScoredPair], candidate_count: usize) -> &[ScoredPair] {
    let cut = ranked
        .iter()
        .position(|pair| pair.score < SIMILARITY_THRESHOLD)
        .unwrap_or(candidate_count.min(ranked.len()));

    &ranked[..cut]
}

/// Return the candidates that match something in `suggestions`.
///
/// Ordered by descending similarity, not document order. A candidate matched
/// by several suggestions appears once, at its best-scoring position.
pub fn reconcile<C, S>(candidates: &[C], suggestions: &[S]) -> Vec<String>
where
    C: AsRef<str>,
    S: AsRef<str>,
{
    let ranked = rank_pairs(candidates, suggestions);
    let mut kept: Vec<String> = Vec::new();

    for pair in select_matches(&ranked, candidates.len()) {
        if !kept.contains(&pair.candidate) {
            kept.push(pair.candidate.clone());
        }
    }

    kept
}

/// Remove a Markdown code fence wrapped around a model response.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };

    // Drop an info string such as `json`, with or without a line break
    // before the body.
    let inner = inner.trim();
    let info_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    inner[info_len..].trim()
}

/// Parse the model's answer as a JSON array of strings.
pub fn parse_suggestions(response: &str) -> Result<Vec<String>, ResponseParseError> {
    let body = strip_code_fence(response);
    serde_json::from_str(body).map_err(|source| ResponseParseError {
        source,
        response: body.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_similarity_identical() {
        assert_eq!(similarity_ratio("Abstract", "Abstract"), 100);
        assert_eq!(similarity_ratio("", ""), 100);
    }

    #[test]
    fn test_similarity_symmetric() {
        assert_eq!(
            similarity_ratio("1 Introduction", "Introduction"),
            similarity_ratio("Introduction", "1 Introduction")
        );
    }

    #[test]
    fn test_similarity_case_sensitive() {
        assert!(similarity_ratio("ABSTRACT", "abstract") < 100);
    }

    #[test]
    fn test_similarity_partial_match_clears_threshold() {
        assert!(similarity_ratio("1 Introduction", "Introduction") > SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_similarity_numbering_prefix() {
        assert_eq!(similarity_ratio("IV. Conclusion", "Conclusion"), 83);
        assert_eq!(similarity_ratio("1 Introduction", "Introduction"), 92);
        assert_eq!(similarity_ratio("abc", "xyz"), 0);
    }

    #[test]
    fn test_reconcile_keeps_roman_numbered_heading() {
        let candidates = ["Abstract", "IV. Conclusion"];
        let suggestions = ["Abstract", "Conclusion"];
        assert_eq!(
            reconcile(&candidates, &suggestions),
            vec!["Abstract", "IV. Conclusion"]
        );
    }

    #[test]
    fn test_similarity_unrelated_is_below_threshold() {
        for other in ["Abstract", "Introduction"] {
            assert!(similarity_ratio("Table 3", other) < SIMILARITY_THRESHOLD);
        }
    }

    #[test]
    fn test_reconcile_scenario() {
        let candidates = ["Abstract", "1 Introduction", "Table 3"];
        let suggestions = ["Abstract", "Introduction"];
        assert_eq!(
            reconcile(&candidates, &suggestions),
            vec!["Abstract", "1 Introduction"]
        );
    }

    #[test]
    fn test_reconcile_verbatim_matches_among_noise() {
        let candidates = [
            "Abstract",
            "Figure 2: pipeline overview",
            "3 Results",
            "Table 1",
            "Conclusion",
        ];
        let suggestions = [
            "qqqqqqqqqqqqqqqq",
            "Conclusion",
            "zzzzzzzzzzzzzzzzzzzz",
            "Abstract",
            "3 Results",
        ];

        let kept = reconcile(&candidates, &suggestions);

        assert_eq!(kept.len(), 3);
        for expected in ["Abstract", "3 Results", "Conclusion"] {
            assert!(kept.iter().any(|k| k == expected), "missing {expected}");
        }
    }

    #[test]
    fn test_reconcile_orders_by_similarity() {
        let candidates = ["2 Related Work", "Abstract"];
        let suggestions = ["Related Work", "Abstract"];
        assert_eq!(
            reconcile(&candidates, &suggestions),
            vec!["Abstract", "2 Related Work"]
        );
    }

    #[test]
    fn test_reconcile_deduplicates() {
        let candidates = ["Introduction", "Table 3"];
        let suggestions = ["Introduction", "Introductions"];
        assert_eq!(reconcile(&candidates, &suggestions), vec!["Introduction"]);
    }

    #[test]
    fn test_reconcile_empty_inputs() {
        assert!(reconcile::<&str, &str>(&[], &["Abstract"]).is_empty());
        assert!(reconcile::<&str, &str>(&["Abstract"], &[]).is_empty());
    }

    #[test]
    fn test_select_matches_caps_at_candidate_count() {
        let ranked = vec![
            ScoredPair {
                score: 100,
                candidate: "A".into(),
                suggestion: "A".into(),
            },
            ScoredPair {
                score: 90,
                candidate: "A".into(),
                suggestion: "A'".into(),
            },
        ];
        assert_eq!(select_matches(&ranked, 1).len(), 1);
        assert_eq!(select_matches(&ranked, 5).len(), 2);
    }

    #[test]
    fn test_select_matches_cuts_at_threshold() {
        let ranked = vec![
            ScoredPair {
                score: 80,
                candidate: "A".into(),
                suggestion: "A".into(),
            },
            ScoredPair {
                score: 74,
                candidate: "B".into(),
                suggestion: "C".into(),
            },
        ];
        assert_eq!(select_matches(&ranked, 2).len(), 1);
    }

    #[test]
    fn test_rank_pairs_is_stable_on_ties() {
        let ranked = rank_pairs(&["x", "y"], &["x", "y"]);
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[0].candidate, "x");
        assert_eq!(ranked[1].candidate, "y");
    }

    #[test]
    fn test_parse_plain_array() {
        let parsed = parse_suggestions(r#"["Abstract", "Introduction"]"#).unwrap();
        assert_eq!(parsed, vec!["Abstract", "Introduction"]);
    }

    #[test]
    fn test_parse_fenced_array() {
        let parsed = parse_suggestions("```json\n[\"Abstract\"]\n```").unwrap();
        assert_eq!(parsed, vec!["Abstract"]);
    }

    #[test]
    fn test_parse_one_line_fence() {
        let parsed = parse_suggestions("```json[\"Abstract\"]```").unwrap();
        assert_eq!(parsed, vec!["Abstract"]);

        let parsed = parse_suggestions("```[\"Abstract\", \"Methods\"]```").unwrap();
        assert_eq!(parsed, vec!["Abstract", "Methods"]);
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_suggestions("Sure! The headings are Abstract and Introduction.");
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_rejects_non_string_array() {
        assert!(parse_suggestions("[1, 2, 3]").is_err());
        assert!(parse_suggestions(r#"{"headings": ["Abstract"]}"#).is_err());
    }
}
