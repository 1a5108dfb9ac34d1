use std::collections::{BTreeMap, HashSet};

use crate::{keywords, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryIntent {
	General,
	Project,
}
impl QueryIntent {
	/// A query is about a project when its lowercased text contains any trigger.
	pub fn detect(raw_text: &str, triggers: &[String]) -> Self {
		let folded = normalize::fold(raw_text);

		if triggers.iter().any(|trigger| !trigger.is_empty() && folded.contains(trigger.as_str())) {
			Self::Project
		} else {
			Self::General
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::General => "general",
			Self::Project => "project",
		}
	}
}

/// Deterministic extra search terms keyed by a trigger keyword.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
	entries: BTreeMap<String, Vec<String>>,
}
impl SynonymTable {
	pub fn new(entries: &BTreeMap<String, Vec<String>>) -> Self {
		let entries = entries
			.iter()
			.map(|(trigger, terms)| (normalize::fold(trigger.trim()), terms.clone()))
			.filter(|(trigger, _)| !trigger.is_empty())
			.collect();

		Self { entries }
	}

	/// Extra terms for every trigger contained in `subject`, in trigger order.
	pub fn augment(&self, subject: &str) -> Vec<&str> {
		if subject.is_empty() {
			return Vec::new();
		}

		let mut out = Vec::new();

		for (trigger, terms) in &self.entries {
			if subject.contains(trigger.as_str()) {
				out.extend(terms.iter().map(String::as_str).filter(|term| !term.trim().is_empty()));
			}
		}

		out
	}
}

/// The analyzed form of one search request. Built once, never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
	raw_text: String,
	is_project_query: bool,
	clean_subject: String,
	expanded_text: String,
	terms: Vec<String>,
}
impl Query {
	/// Composes the expanded query text.
	///
	/// Project queries: `raw clean_subject expansion synonyms`. General queries:
	/// `raw expansion`. Empty parts are skipped.
	pub fn new(
		raw_text: &str,
		intent: QueryIntent,
		clean_subject: String,
		expansion_terms: &[String],
		synonyms: &SynonymTable,
		min_term_chars: usize,
	) -> Self {
		let is_project_query = intent == QueryIntent::Project;
		let clean_subject = if is_project_query { clean_subject } else { String::new() };
		let expansion = expansion_terms.join(", ");
		let mut parts = vec![raw_text.trim().to_string()];

		if is_project_query {
			parts.push(clean_subject.clone());
			parts.push(expansion);
			parts.push(synonyms.augment(&clean_subject).join(" "));
		} else {
			parts.push(expansion);
		}

		let expanded_text = parts
			.into_iter()
			.filter(|part| !part.trim().is_empty())
			.collect::<Vec<_>>()
			.join(" ");
		let terms = keywords::extract_terms(&clean_subject, min_term_chars);

		Self {
			raw_text: raw_text.to_string(),
			is_project_query,
			clean_subject,
			expanded_text,
			terms,
		}
	}

	/// The caller's original input, echoed back unchanged in the response.
	pub fn raw_text(&self) -> &str {
		&self.raw_text
	}

	pub fn is_project_query(&self) -> bool {
		self.is_project_query
	}

	pub fn intent(&self) -> QueryIntent {
		if self.is_project_query { QueryIntent::Project } else { QueryIntent::General }
	}

	pub fn clean_subject(&self) -> &str {
		&self.clean_subject
	}

	pub fn expanded_text(&self) -> &str {
		&self.expanded_text
	}

	/// Keyword terms of the clean subject, shared by the text fallback and the match scorer.
	pub fn terms(&self) -> &[String] {
		&self.terms
	}
}

/// Parses a term-expansion reply into individual terms.
///
/// Accepts comma, semicolon, or newline separated lists and tolerates code fences, list
/// bullets, numbering, and quoting. Terms are deduplicated case-insensitively and capped at
/// `max_terms`.
pub fn parse_expansion_terms(content: &str, max_terms: usize) -> Vec<String> {
	let mut out = Vec::new();
	let mut seen = HashSet::new();

	for line in content.lines() {
		let line = line.trim();

		if line.starts_with("```") {
			continue;
		}

		for raw in line.split([',', ';']) {
			let term = strip_list_marker(raw.trim())
				.trim_matches(|ch: char| ch == '"' || ch == '\'' || ch == '`' || ch == '.')
				.trim();

			if term.is_empty() {
				continue;
			}
			if out.len() >= max_terms {
				return out;
			}
			if seen.insert(term.to_lowercase()) {
				out.push(term.to_string());
			}
		}
	}

	out
}

fn strip_list_marker(term: &str) -> &str {
	let term = term.trim_start_matches(['-', '*', '\u{2022}']).trim_start();
	let digits = term.chars().take_while(|ch| ch.is_ascii_digit()).count();

	if digits > 0 {
		let rest = &term[digits..];

		if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
			return stripped.trim_start();
		}
	}

	term
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn detects_project_intent_case_insensitively() {
		let triggers = vec!["project".to_string(), "worked on".to_string()];

		assert_eq!(
			QueryIntent::detect("Who WORKED ON the levee?", &triggers),
			QueryIntent::Project
		);
		assert_eq!(QueryIntent::detect("Senior civil engineers", &triggers), QueryIntent::General);
	}

	#[test]
	fn parses_numbered_and_fenced_lists() {
		let content = "```\n1. Harahan Pump Station\n2) drainage, pumping\n- levee\n```";
		let terms = parse_expansion_terms(content, 10);

		assert_eq!(terms, vec!["Harahan Pump Station", "drainage", "pumping", "levee"]);
	}

	#[test]
	fn caps_and_dedupes_terms() {
		let terms = parse_expansion_terms("a1, A1, b2, c3, d4", 2);

		assert_eq!(terms, vec!["a1", "b2"]);
	}

	#[test]
	fn numeric_terms_survive_marker_stripping() {
		assert_eq!(strip_list_marker("2024 flood study"), "2024 flood study");
	}
}
