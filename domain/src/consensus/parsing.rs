//! Consensus score parsing.
//!
//! Extracts an agreement score in `[0.0, 1.0]` from a free-form oracle
//! response. Pure text handling: no I/O, no fallback policy. Callers decide
//! what a missing score means (see [`NEUTRAL_SCORE`]).
//!
//! # Supported Formats
//!
//! 1. **JSON**: `{"score": 0.7}` or `{"consensus": 0.7}`
//! 2. **Percentage**: `85%`
//! 3. **Standalone number**: `0.85` (must already lie in `[0.0, 1.0]`)
//!
//! Outside JSON the last usable numeral wins, since models tend to reason
//! first and state the score at the end. Negative numbers are never scores.

/// Score assumed when the oracle's answer cannot be used.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Parse a consensus score from an oracle response.
///
/// Returns `None` when no usable score is present.
///
/// # Examples
///
/// ```
/// use taskforce_domain::consensus::parse_consensus_score;
///
/// assert_eq!(parse_consensus_score(r#"{"score": 0.8}"#), Some(0.8));
/// assert_eq!(parse_consensus_score("Agreement: 0.65"), Some(0.65));
/// assert_eq!(parse_consensus_score("roughly 70%"), Some(0.7));
/// assert_eq!(parse_consensus_score("They mostly agree"), None);
/// ```
pub fn parse_consensus_score(response: &str) -> Option<f64> {
    if let Some(start) = response.find('{')
        && let Some(end) = response[start..].rfind('}')
    {
        let json_str = &response[start..start + end + 1];
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(json_str)
            && let Some(score) = parsed
                .get("score")
                .or_else(|| parsed.get("consensus"))
                .and_then(|v| v.as_f64())
            && score.is_finite()
        {
            return Some(score.clamp(0.0, 1.0));
        }
    }

    response.split_whitespace().rev().find_map(word_score)
}

/// Score carried by a single whitespace-separated word, if any.
fn word_score(word: &str) -> Option<f64> {
    let word = word.trim_start_matches(|c: char| !c.is_ascii_digit() && c != '.' && c != '-');
    if word.starts_with('-') {
        return None;
    }
    let word = word.trim_end_matches(|c: char| c.is_ascii_punctuation() && c != '%');

    if let Some(pct) = word.strip_suffix('%') {
        let num = pct.parse::<f64>().ok()?;
        return (0.0..=100.0).contains(&num).then(|| num / 100.0);
    }
    let num = word.parse::<f64>().ok()?;
    (0.0..=1.0).contains(&num).then_some(num)
}
