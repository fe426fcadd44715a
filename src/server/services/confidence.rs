use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

lazy_static! {
    static ref CONFIDENCE_RE: Regex =
        Regex::new(r"(?i)CONFIDENCE:\s*([0-9]+)").expect("confidence pattern is valid");
    static ref ACTION_PLAN_RE: Regex =
        Regex::new(r"(?is)ACTION PLAN:\s*(.+)").expect("action plan pattern is valid");
}

/// Score and plan pulled out of free-form agent output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeAnalysis {
    pub confidence_score: Option<i64>,
    pub action_plan: Option<String>,
}

/// Extracts the first `CONFIDENCE: <n>` score and the `ACTION PLAN:` section
/// from agent output. Each part is independent; a missing marker leaves the
/// corresponding field empty. The score is not range-checked; values too
/// large for `i64` saturate to `i64::MAX`.
pub fn parse_confidence_and_plan(text: &str) -> ScopeAnalysis {
    let confidence_score = CONFIDENCE_RE.captures(text).map(|caps| {
        let digits = &caps[1];
        digits.parse::<i64>().unwrap_or_else(|e| {
            warn!("Confidence score {} out of range, saturating: {}", digits, e);
            i64::MAX
        })
    });

    let action_plan = ACTION_PLAN_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string());

    ScopeAnalysis {
        confidence_score,
        action_plan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_score_and_multiline_plan() {
        let text = "Looked into it.\nconfidence: 87\nACTION PLAN:\nDo X\nDo Y\n\n";
        let analysis = parse_confidence_and_plan(text);

        assert_eq!(analysis.confidence_score, Some(87));
        assert_eq!(analysis.action_plan.as_deref(), Some("Do X\nDo Y"));
    }

    #[test]
    fn missing_confidence_marker_yields_no_score() {
        let analysis = parse_confidence_and_plan("ACTION PLAN: ship it\nscore is 90");

        assert_eq!(analysis.confidence_score, None);
        assert_eq!(analysis.action_plan.as_deref(), Some("ship it\nscore is 90"));
    }

    #[test]
    fn score_without_plan() {
        let analysis = parse_confidence_and_plan("CONFIDENCE:42");

        assert_eq!(analysis.confidence_score, Some(42));
        assert_eq!(analysis.action_plan, None);
    }

    #[test]
    fn first_confidence_wins_and_range_is_not_checked() {
        let analysis = parse_confidence_and_plan("CONFIDENCE: 250\nCONFIDENCE: 10");
        assert_eq!(analysis.confidence_score, Some(250));
    }

    #[test]
    fn marker_without_digits_is_ignored() {
        let analysis = parse_confidence_and_plan("CONFIDENCE: high\nAction Plan: refactor");

        assert_eq!(analysis.confidence_score, None);
        assert_eq!(analysis.action_plan.as_deref(), Some("refactor"));
    }

    #[test]
    fn oversized_score_saturates() {
        let analysis = parse_confidence_and_plan("CONFIDENCE: 99999999999999999999999");
        assert_eq!(analysis.confidence_score, Some(i64::MAX));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert_eq!(parse_confidence_and_plan(""), ScopeAnalysis::default());
    }
}
