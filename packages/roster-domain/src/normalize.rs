use std::collections::HashSet;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use roster_config::SearchNormalizer;

const QUOTED_PATTERN: &str = "[\"\u{201C}\u{201D}]([^\"\u{201C}\u{201D}]+)[\"\u{201C}\u{201D}]";

/// Reduces a raw project query to the subject it is about.
///
/// Boilerplate lead-ins ("employees who have worked on project", "people who worked on", ...)
/// and stopwords are removed on word boundaries. A quoted phrase anywhere in the query takes
/// precedence over the stripped text and is returned verbatim (lowercased).
#[derive(Debug, Clone)]
pub struct TermNormalizer {
	phrases: Vec<Vec<String>>,
	stopwords: HashSet<String>,
	quoted: Option<Regex>,
}
impl TermNormalizer {
	pub fn new(cfg: &SearchNormalizer) -> Self {
		let mut phrases: Vec<Vec<String>> = cfg
			.boilerplate_phrases
			.iter()
			.map(|phrase| tokenize(&fold(phrase)).into_iter().map(str::to_string).collect())
			.filter(|tokens: &Vec<String>| !tokens.is_empty())
			.collect();

		// Longer phrases first so "worked on project" never leaves a dangling "project" behind.
		phrases.sort_by(|left, right| {
			right
				.len()
				.cmp(&left.len())
				.then_with(|| phrase_chars(right).cmp(&phrase_chars(left)))
		});

		let stopwords = cfg.stopwords.iter().map(|word| fold(word)).collect();

		Self { phrases, stopwords, quoted: Regex::new(QUOTED_PATTERN).ok() }
	}

	pub fn normalize(&self, raw_text: &str) -> String {
		let folded = fold(raw_text);

		if let Some(phrase) = self.quoted_phrase(&folded) {
			return phrase;
		}

		let mut tokens = tokenize(&folded);

		for phrase in &self.phrases {
			tokens = strip_phrase(tokens, phrase);
		}

		tokens
			.into_iter()
			.filter(|token| !self.stopwords.contains(*token))
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Content of the first quoted substring, whitespace-collapsed. Empty quotes are ignored.
	pub fn quoted_phrase(&self, text: &str) -> Option<String> {
		let captures = self.quoted.as_ref()?.captures(text)?;
		let phrase = captures.get(1)?.as_str().split_whitespace().collect::<Vec<_>>().join(" ");

		if phrase.is_empty() { None } else { Some(phrase) }
	}
}

/// NFKC-normalizes and lowercases.
pub fn fold(text: &str) -> String {
	text.nfkc().collect::<String>().to_lowercase()
}

/// Trims punctuation around a word while keeping symbols that carry meaning in skill names
/// such as "c++" or "c#".
pub fn trim_token(token: &str) -> &str {
	token.trim_matches(|ch: char| !(ch.is_alphanumeric() || ch == '+' || ch == '#'))
}

fn tokenize(text: &str) -> Vec<&str> {
	text.split_whitespace().map(trim_token).filter(|token| !token.is_empty()).collect()
}

fn strip_phrase<'a>(tokens: Vec<&'a str>, phrase: &[String]) -> Vec<&'a str> {
	let width = phrase.len();

	if width == 0 || tokens.len() < width {
		return tokens;
	}

	let mut out = Vec::with_capacity(tokens.len());
	let mut idx = 0;

	while idx < tokens.len() {
		let end = idx + width;

		if end <= tokens.len()
			&& tokens[idx..end].iter().zip(phrase).all(|(token, word)| *token == word.as_str())
		{
			idx = end;

			continue;
		}

		out.push(tokens[idx]);

		idx += 1;
	}

	out
}

fn phrase_chars(phrase: &[String]) -> usize {
	phrase.iter().map(|word| word.chars().count()).sum()
}
