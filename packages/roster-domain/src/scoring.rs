use serde_json::Value;

use roster_config::{FieldAliases, SearchScoring};

use crate::{
	candidate::{self, CandidateRecord, MatchReason, MatchedProject},
	keywords,
	query::Query,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectMatch {
	pub score: f32,
	pub project: Value,
	pub reason: MatchReason,
}

/// Boosts candidates whose project history corroborates a project query.
#[derive(Debug, Clone)]
pub struct MatchScorer {
	aliases: FieldAliases,
	boost_weight: f32,
	low_relevance_cutoff: f32,
}
impl MatchScorer {
	pub fn new(aliases: FieldAliases, scoring: &SearchScoring) -> Self {
		Self {
			aliases,
			boost_weight: scoring.boost_weight.max(0.0),
			low_relevance_cutoff: scoring.low_relevance_cutoff,
		}
	}

	/// Scores one candidate. Returns `None` when the candidate is dropped as low relevance.
	///
	/// General queries pass through untouched. For project queries a match sets
	/// `combined_score = base_score * (1 + match_score * boost_weight)`; without a match the
	/// candidate keeps its base score and is dropped when `base_score` is below the cutoff.
	pub fn score(&self, query: &Query, mut candidate: CandidateRecord) -> Option<CandidateRecord> {
		if !query.is_project_query() {
			return Some(candidate);
		}

		let projects = candidate.projects(&self.aliases);

		match find_project_match(query.clean_subject(), query.terms(), projects) {
			Some(found) => {
				candidate.project_match_score = Some(found.score);
				candidate.combined_score = candidate.base_score * self.boost_factor(found.score);
				candidate.matched_project =
					Some(MatchedProject { entry: found.project, reason: found.reason });

				Some(candidate)
			},
			None => {
				candidate.combined_score = candidate.base_score;

				if candidate.base_score < self.low_relevance_cutoff {
					tracing::debug!(
						id = %candidate.id,
						source = candidate.source.as_str(),
						base_score = candidate.base_score,
						"Dropping unmatched low-relevance candidate."
					);

					return None;
				}

				Some(candidate)
			},
		}
	}

	pub fn score_all(
		&self,
		query: &Query,
		candidates: Vec<CandidateRecord>,
	) -> Vec<CandidateRecord> {
		candidates.into_iter().filter_map(|candidate| self.score(query, candidate)).collect()
	}

	pub fn boost_factor(&self, match_score: f32) -> f32 {
		1.0 + match_score.clamp(0.0, 1.0) * self.boost_weight
	}
}

/// Finds the project that best corroborates the query.
///
/// The first project containing the whole subject wins outright with score 1.0. Otherwise each
/// project scores `matched_terms / terms`; the highest score wins and earlier projects win ties.
pub fn find_project_match(
	clean_subject: &str,
	terms: &[String],
	projects: Vec<Value>,
) -> Option<ProjectMatch> {
	let subject = clean_subject.trim().to_lowercase();
	let texts: Vec<String> = projects.iter().map(candidate::searchable_text).collect();

	if !subject.is_empty()
		&& let Some(idx) = texts.iter().position(|text| text.contains(subject.as_str()))
	{
		return projects.into_iter().nth(idx).map(|project| ProjectMatch {
			score: 1.0,
			project,
			reason: MatchReason::ExactPhrase,
		});
	}
	if terms.is_empty() {
		return None;
	}

	let mut best: Option<(usize, usize)> = None;

	for (idx, text) in texts.iter().enumerate() {
		let matched = keywords::count_term_matches(text, terms);

		if matched > 0 && best.map(|(_, top)| matched > top).unwrap_or(true) {
			best = Some((idx, matched));
		}
	}

	let (idx, matched) = best?;
	let total = terms.len();

	projects.into_iter().nth(idx).map(|project| ProjectMatch {
		score: matched as f32 / total as f32,
		project,
		reason: MatchReason::Keywords { matched, total },
	})
}
