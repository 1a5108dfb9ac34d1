use roster_config::{LlmProviderConfig, Search};
use roster_domain::{Query, QueryIntent, SynonymTable, TermNormalizer, query};

use crate::{ExpansionProvider, call};

const PROJECT_PROMPT: &str = "\
You expand search queries against a database of engineering resumes and project histories.
The user is looking for people who worked on one specific project.
Reply with the most likely project name first, then the keywords that best distinguish this \
project from others (place names, structure types, clients), most specific first.
Reply with a single comma-separated list of at most {max_terms} terms and nothing else.";
const GENERAL_PROMPT: &str = "\
You expand search queries against a database of engineering resumes and project histories.
Reply with related search terms for the request: skills, disciplines, job titles, and \
common synonyms.
Reply with a single comma-separated list of at most {max_terms} terms and nothing else.";

/// Turns raw query text into an immutable [`Query`].
pub struct QueryAnalyzer<'a> {
	pub(crate) search: &'a Search,
	pub(crate) llm: &'a LlmProviderConfig,
	pub(crate) normalizer: &'a TermNormalizer,
	pub(crate) synonyms: &'a SynonymTable,
	pub(crate) expansion: &'a dyn ExpansionProvider,
}
impl QueryAnalyzer<'_> {
	pub async fn analyze(&self, raw_text: &str) -> Query {
		let cfg = &self.search.normalizer;
		let intent = QueryIntent::detect(raw_text, &cfg.project_triggers);
		let clean_subject = match intent {
			QueryIntent::Project => self.normalizer.normalize(raw_text),
			QueryIntent::General => String::new(),
		};
		let expansion_terms = self.expand(raw_text, intent, &clean_subject).await;
		let query = Query::new(
			raw_text,
			intent,
			clean_subject,
			&expansion_terms,
			self.synonyms,
			cfg.min_term_chars as usize,
		);

		tracing::info!(
			intent = intent.as_str(),
			clean_subject = query.clean_subject(),
			expansion_terms = expansion_terms.len(),
			"Analyzed query."
		);

		query
	}

	/// Asks the expansion service for extra terms. Any failure yields no terms.
	async fn expand(
		&self,
		raw_text: &str,
		intent: QueryIntent,
		clean_subject: &str,
	) -> Vec<String> {
		let cfg = &self.search.expansion;

		if !cfg.enabled {
			return Vec::new();
		}

		let (system_prompt, user_prompt) = prompts(intent, raw_text, clean_subject, cfg.max_terms);
		let reply = call::best_effort(
			"query expansion",
			self.search.timeouts.expansion_ms,
			self.expansion.expand(self.llm, &system_prompt, &user_prompt),
		)
		.await;

		match reply {
			Some(content) => query::parse_expansion_terms(&content, cfg.max_terms as usize),
			None => Vec::new(),
		}
	}
}

/// System and user prompts for the expansion call. Project queries send the clean subject, or
/// the raw text when nothing distinguishing survived normalization.
pub fn prompts(
	intent: QueryIntent,
	raw_text: &str,
	clean_subject: &str,
	max_terms: u32,
) -> (String, String) {
	let template = match intent {
		QueryIntent::Project => PROJECT_PROMPT,
		QueryIntent::General => GENERAL_PROMPT,
	};
	let system_prompt = template.replace("{max_terms}", &max_terms.to_string());
	let user_prompt = match intent {
		QueryIntent::Project if !clean_subject.is_empty() => format!("Project: {clean_subject}"),
		QueryIntent::Project => format!("Project: {}", raw_text.trim()),
		QueryIntent::General => format!("Search request: {}", raw_text.trim()),
	};

	(system_prompt, user_prompt)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn project_prompt_uses_clean_subject() {
		let (system, user) =
			prompts(QueryIntent::Project, "worked on project Lakeview", "lakeview", 6);

		assert!(system.contains("one specific project"));
		assert!(system.contains("at most 6 terms"));
		assert_eq!(user, "Project: lakeview");
	}

	#[test]
	fn empty_subject_falls_back_to_raw_text() {
		let (_, user) = prompts(QueryIntent::Project, " worked on project ", "", 10);

		assert_eq!(user, "Project: worked on project");
	}

	#[test]
	fn general_prompt_asks_for_related_terms() {
		let (system, user) = prompts(QueryIntent::General, "bridge inspectors", "", 10);

		assert!(system.contains("related search terms"));
		assert_eq!(user, "Search request: bridge inspectors");
	}
}
