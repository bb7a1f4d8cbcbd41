use indexmap::IndexMap;
use thiserror::Error;

/// Heading -> text between that heading and the next one, in insertion order.
pub type SectionMap = IndexMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("Heading not found in document text: {0:?}")]
    HeadingNotFound(String),
    #[error("Cannot split on an empty heading")]
    EmptyHeading,
}

/// Everything after the first occurrence of `heading` in `text`.
fn after_heading<'a>(text: &'a str, heading: &str) -> Result<&'a str, SegmentationError> {
    if heading.is_empty() {
        return Err(SegmentationError::EmptyHeading);
    }

    text.split_once(heading)
        .map(|(_, rest)| rest)
        .ok_or_else(|| SegmentationError::HeadingNotFound(heading.to_string()))
}

/// Cut `text` into sections delimited by `headings`.
///
/// Each section runs from the end of the first occurrence of its heading up
/// to the first occurrence of the following heading in what remains; the
/// last section runs to the end of the text. Matching is literal substring
/// search.
///
/// `headings` must be in document order and each heading must occur once.
/// Neither is checked: out-of-order or repeated headings produce wrong spans
/// rather than an error. A heading missing from `text` is an error.
pub fn split_text_into_sections<S: AsRef<str>>(
    text: &str,
    headings: &[S],
) -> Result<SectionMap, SegmentationError> {
    let mut sections = SectionMap::with_capacity(headings.len());

    for (i, heading) in headings.iter().enumerate() {
        let heading = heading.as_ref();
        let rest = after_heading(text, heading)?;

        let body = match headings.get(i + 1).map(AsRef::<str>::as_ref) {
            Some("") => return Err(SegmentationError::EmptyHeading),
            Some(next) => rest.split_once(next).map_or(rest, |(body, _)| body),
            None => rest,
        };

        sections.insert(heading.to_string(), body.to_string());
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let headings = ["Abstract", "1 Introduction", "2 Method", "References"];
        let bodies = [
            "\nWe summarise papers.\n",
            "\nPapers are long.\n",
            "\nWe split them.\n",
            "\n[1] Someone, 2020.",
        ];
        let text: String = headings
            .iter()
            .zip(bodies.iter())
            .map(|(h, b)| format!("{h}{b}"))
            .collect();

        let sections = split_text_into_sections(&text, &headings).unwrap();

        assert_eq!(sections.len(), headings.len());
        for (heading, body) in headings.iter().zip(bodies.iter()) {
            assert_eq!(&sections[*heading], body);
        }
    }

    #[test]
    fn test_preamble_is_dropped() {
        let text = "Title Page\nAbstract body A Introduction body B";
        let sections = split_text_into_sections(text, &["Abstract", "Introduction"]).unwrap();
        assert_eq!(sections["Abstract"], " body A ");
        assert_eq!(sections["Introduction"], " body B");
    }

    #[test]
    fn test_keys_follow_heading_order() {
        let text = "A1 x B2 y C3 z";
        let sections = split_text_into_sections(text, &["A1", "B2", "C3"]).unwrap();
        let keys: Vec<&str> = sections.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn test_missing_heading_is_an_error() {
        let text = "Abstract body Introduction body";
        let err = split_text_into_sections(text, &["Abstract", "Methodology"]).unwrap_err();
        assert_eq!(
            err,
            SegmentationError::HeadingNotFound("Methodology".to_string())
        );
    }

    #[test]
    fn test_missing_first_heading_is_an_error() {
        let err = split_text_into_sections("some text", &["Abstract"]).unwrap_err();
        assert!(matches!(err, SegmentationError::HeadingNotFound(h) if h == "Abstract"));
    }

    #[test]
    fn test_empty_heading_is_an_error() {
        assert_eq!(
            split_text_into_sections("text", &[""]).unwrap_err(),
            SegmentationError::EmptyHeading
        );
        assert_eq!(
            split_text_into_sections("Abstract text", &["Abstract", ""]).unwrap_err(),
            SegmentationError::EmptyHeading
        );
    }

    #[test]
    fn test_no_headings_gives_empty_map() {
        let sections = split_text_into_sections::<&str>("text", &[]).unwrap();
        assert!(sections.is_empty());
    }

    #[test]
    fn test_last_section_runs_to_end() {
        let text = "Intro one Conclusion two three four";
        let sections = split_text_into_sections(text, &["Intro", "Conclusion"]).unwrap();
        assert_eq!(sections["Conclusion"], " two three four");
    }

    #[test]
    fn test_out_of_order_headings_are_not_detected() {
        // Documented limitation: the span for "B" runs past "A" to the end.
        let text = "A first B second";
        let sections = split_text_into_sections(text, &["B", "A"]).unwrap();
        assert_eq!(sections["B"], " second");
        assert_eq!(sections["A"], " first B second");
    }
}
