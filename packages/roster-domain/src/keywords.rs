use std::collections::HashSet;

use crate::normalize::trim_token;

/// Splits a clean subject into keyword terms: whitespace tokens with surrounding punctuation
/// trimmed, at least `min_chars` characters long, deduplicated in first-seen order.
pub fn extract_terms(subject: &str, min_chars: usize) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for token in subject.split_whitespace() {
		let token = trim_token(token).to_lowercase();

		if token.chars().count() < min_chars {
			continue;
		}
		if seen.insert(token.clone()) {
			out.push(token);
		}
	}

	out
}

/// OR-joined full-text expression, e.g. `harahan | drainage | pump`.
///
/// Terms are reduced to their alphanumeric characters so the expression stays valid for
/// `to_tsquery`; terms that reduce to nothing are skipped.
pub fn disjunction(terms: &[String]) -> String {
	terms
		.iter()
		.map(|term| term.chars().filter(|ch| ch.is_alphanumeric()).collect::<String>())
		.filter(|term| !term.is_empty())
		.collect::<Vec<_>>()
		.join(" | ")
}

/// Number of terms present in `haystack` as case-insensitive substrings. `haystack` must
/// already be lowercase.
pub fn count_term_matches(haystack: &str, terms: &[String]) -> usize {
	terms.iter().filter(|term| haystack.contains(term.to_lowercase().as_str())).count()
}

/// Heuristic score for a linear-scan hit: `base + (matches / total) * span`.
///
/// Returns `None` when nothing matched; such records are discarded.
pub fn scan_score(matches: usize, total: usize, base: f32, span: f32) -> Option<f32> {
	if matches == 0 || total == 0 {
		return None;
	}

	let ratio = (matches.min(total) as f32) / total as f32;

	Some(base + ratio * span)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extracts_terms_longer_than_two_chars() {
		let terms = extract_terms("harahan drainage pump to the river, la", 3);

		assert_eq!(terms, vec!["harahan", "drainage", "pump", "the", "river"]);
	}

	#[test]
	fn disjunction_sanitizes_terms() {
		let terms = vec!["o'neil".to_string(), "--".to_string(), "levee".to_string()];

		assert_eq!(disjunction(&terms), "oneil | levee");
	}

	#[test]
	fn scan_score_stays_within_band() {
		assert_eq!(scan_score(0, 4, 0.5, 0.3), None);

		let full = scan_score(4, 4, 0.5, 0.3).expect("Full match must score.");

		assert!((full - 0.8).abs() < 1e-6);

		let partial = scan_score(1, 4, 0.5, 0.3).expect("One match must score.");

		assert!((partial - 0.575).abs() < 1e-6);
	}
}
