use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use roster_config::FieldAliases;
use roster_domain::{CandidateRecord, ResultMerger, SearchResult, candidate};

use crate::{Error, Result, RosterService, retrieval};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub query: String,
	#[serde(default)]
	pub top_k: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	/// The caller's raw query, never the expanded text.
	pub query: String,
	pub results: Vec<SearchItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
	pub name: String,
	pub role: Option<String>,
	pub score: f32,
	pub education: Option<Value>,
	pub years_experience: Option<Value>,
	pub relevant_projects: Vec<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub matching_project_info: Option<MatchingProjectInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingProjectInfo {
	pub title: Option<String>,
	pub role: Option<String>,
	pub description: Option<String>,
	pub match_reason: String,
	pub match_score: f32,
}

impl RosterService {
	/// Runs one search. The only error is a blank query; collaborator failures degrade to fewer
	/// results. A requested `top_k` is clamped to `1..=search.max_top_k`.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		if req.query.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "query must be non-empty.".to_string() });
		}

		let search = &self.cfg.search;
		let top_k = req.top_k.unwrap_or(search.top_k).min(search.max_top_k).max(1);
		let span = tracing::info_span!("search", request_id = %Uuid::new_v4(), top_k);
		let result = self.rank(&req.query, top_k).instrument(span).await;

		Ok(SearchResponse::from_result(result, &self.cfg.search.fields))
	}

	/// The full pipeline up to the merged [`SearchResult`].
	pub async fn rank(&self, raw_text: &str, top_k: u32) -> SearchResult {
		let query = self.analyzer().analyze(raw_text).await;
		let vector_candidates = self.vector_client().search(&query, top_k).await;
		let fallback_candidates = if query.is_project_query() && vector_candidates.is_empty() {
			let limit = retrieval::vector_limit(&self.cfg.search, top_k);

			self.fallback_searcher().search(&query, limit).await
		} else {
			Vec::new()
		};
		let retrieved = (vector_candidates.len(), fallback_candidates.len());
		let vector_candidates = self.scorer.score_all(&query, vector_candidates);
		let fallback_candidates = self.scorer.score_all(&query, fallback_candidates);
		let result = ResultMerger::new(top_k as usize).merge(
			query.raw_text(),
			vector_candidates,
			fallback_candidates,
		);

		tracing::info!(
			intent = query.intent().as_str(),
			vector_candidates = retrieved.0,
			fallback_candidates = retrieved.1,
			results = result.results.len(),
			"Search completed."
		);

		result
	}
}

impl SearchResponse {
	pub fn from_result(result: SearchResult, aliases: &FieldAliases) -> Self {
		let results = result
			.results
			.iter()
			.map(|record| SearchItem::from_candidate(record, aliases))
			.collect();

		Self { query: result.query, results }
	}
}

impl SearchItem {
	pub fn from_candidate(record: &CandidateRecord, aliases: &FieldAliases) -> Self {
		let matching_project_info = match (&record.matched_project, record.project_match_score) {
			(Some(matched), Some(score)) => Some(MatchingProjectInfo {
				title: project_field(&matched.entry, &aliases.project_title, true),
				role: project_field(&matched.entry, &aliases.project_role, false),
				description: project_field(&matched.entry, &aliases.project_description, false),
				match_reason: matched.reason.describe(),
				match_score: score,
			}),
			_ => None,
		};

		Self {
			name: record.display_name.clone(),
			role: record.field(&aliases.role).and_then(candidate::value_text),
			score: record.combined_score,
			education: record.field(&aliases.education).cloned(),
			years_experience: record.field(&aliases.years_experience).cloned(),
			relevant_projects: record.projects(aliases),
			matching_project_info,
		}
	}
}

/// A field of a project entry. Plain-text entries only carry a title.
fn project_field(entry: &Value, aliases: &[String], is_title: bool) -> Option<String> {
	match entry {
		Value::Object(_) =>
			candidate::resolve_field(entry, aliases).and_then(candidate::value_text),
		other if is_title => candidate::value_text(other),
		_ => None,
	}
}
