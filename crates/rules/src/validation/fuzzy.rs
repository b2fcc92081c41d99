//! Fuzzy string matching: Levenshtein distance and "Did you mean …?" hints
//! for parse errors.

use crate::schema::{AlertType, Connective, Operator, RuleConditionType};

const KINDS: &[&str] = &["JobRules", "ValueList"];

/// Find the closest match using Levenshtein distance. Returns None if best
/// distance exceeds half the candidate length (too dissimilar).
pub(crate) fn fuzzy_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for &candidate in candidates {
        let dist = levenshtein(&input_lower, &candidate.to_lowercase());
        match best {
            None => best = Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => best = Some((candidate, dist)),
            _ => {}
        }
    }

    best.and_then(|(name, dist)| {
        // Only suggest if edit distance is reasonable (≤ half the longer string)
        let max_len = input.len().max(name.len());
        if dist <= max_len / 2 {
            Some(name)
        } else {
            None
        }
    })
}

/// Levenshtein edit distance between two strings.
pub(crate) fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let m = a.len();
    let n = b.len();

    let mut prev = (0..=n).collect::<Vec<_>>();
    let mut curr = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// Suggest a replacement for the unknown keyword a parse error names.
///
/// Understands the construction errors for operators, condition types,
/// alert types, connectives and document kinds, and serde's "unknown variant/field `x`, expected one of …".
pub fn suggest_for_parse_error(message: &str) -> Option<String> {
    let operators: Vec<&str> = Operator::ALL.iter().map(|op| op.name()).collect();
    let condition_types: Vec<&str> = RuleConditionType::ALL.iter().map(|t| t.name()).collect();
    let alert_types: Vec<&str> = AlertType::ALL.iter().map(|t| t.name()).collect();
    let connectives: Vec<&str> = Connective::ALL.iter().map(|c| c.name()).collect();

    let found = if let Some(input) = quoted(message, "unknown operator '", '\'') {
        fuzzy_match(input, &operators)
    } else if let Some(input) = quoted(message, "unknown rule condition type '", '\'') {
        fuzzy_match(input, &condition_types)
    } else if let Some(input) = quoted(message, "unknown alert type '", '\'') {
        fuzzy_match(input, &alert_types)
    } else if let Some(input) = quoted(message, "unknown connective '", '\'') {
        fuzzy_match(input, &connectives)
    } else if let Some(input) = quoted(message, "unknown document kind: '", '\'') {
        fuzzy_match(input, KINDS)
    } else {
        serde_unknown(message).and_then(|(input, expected)| fuzzy_match(input, &expected))
    };

    found.map(|name| format!("Did you mean '{name}'?"))
}

/// Text between `prefix` and the next `close`.
fn quoted<'a>(message: &'a str, prefix: &str, close: char) -> Option<&'a str> {
    let start = message.find(prefix)? + prefix.len();
    let rest = &message[start..];
    let end = rest.find(close)?;
    Some(&rest[..end])
}

/// `(input, expected)` from serde's unknown variant / unknown field messages.
fn serde_unknown(message: &str) -> Option<(&str, Vec<&str>)> {
    let input = quoted(message, "unknown variant `", '`')
        .or_else(|| quoted(message, "unknown field `", '`'))?;
    let expected_start = message.find("expected one of ")? + "expected one of ".len();
    let expected = message[expected_start..]
        .split(", ")
        .filter_map(|item| quoted(item, "`", '`'))
        .collect();
    Some((input, expected))
}
