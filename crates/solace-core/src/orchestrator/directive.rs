//! Sentiment-conditioned behavioral directives (second system turn of every request).

use crate::shared::SentimentLabel;

pub const POSITIVE_DIRECTIVE: &str =
    "The user is feeling positive. Celebrate their progress and offer encouragement to keep going.";
pub const NEGATIVE_DIRECTIVE: &str = "The user is experiencing negative emotions. Please respond with extra care, empathy, and emotional support.";
pub const NEUTRAL_DIRECTIVE: &str =
    "The user is emotionally neutral. Offer calm, grounded support and ask reflective questions.";

impl SentimentLabel {
    /// Directive text for this label.
    pub fn directive(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => POSITIVE_DIRECTIVE,
            SentimentLabel::Negative => NEGATIVE_DIRECTIVE,
            SentimentLabel::Neutral => NEUTRAL_DIRECTIVE,
        }
    }
}

/// Total over any string: anything but exactly `positive`/`negative`/`neutral` gets the
/// neutral directive.
pub fn select_directive(label: &str) -> &'static str {
    SentimentLabel::parse_or_neutral(label).directive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn each_label_has_a_distinct_directive() {
        let set: HashSet<&str> = SentimentLabel::ALL.iter().map(|l| select_directive(l.as_str())).collect();
        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|d| !d.is_empty()));
    }

    #[test]
    fn unknown_labels_default_to_neutral() {
        for label in ["", "angry", "POSITIVE!", "mixed"] {
            assert_eq!(select_directive(label), NEUTRAL_DIRECTIVE, "label {:?}", label);
        }
    }

    #[test]
    fn lookup_matches_enum() {
        assert_eq!(select_directive("positive"), SentimentLabel::Positive.directive());
        assert_eq!(select_directive("negative"), NEGATIVE_DIRECTIVE);
    }

    #[test]
    fn case_and_whitespace_variants_are_not_labels() {
        for label in ["Negative", " negative ", "Positive", "NEUTRAL\n"] {
            assert_eq!(select_directive(label), NEUTRAL_DIRECTIVE, "label {:?}", label);
        }
    }
}
