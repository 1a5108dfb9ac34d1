use std::{cmp::Ordering, collections::HashMap};

use crate::candidate::CandidateRecord;

/// Terminal artifact of one search: the caller's raw query and the ranked records.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
	pub query: String,
	pub results: Vec<CandidateRecord>,
}

/// Dedupes, ranks, and truncates candidates from every retrieval path.
#[derive(Debug, Clone, Copy)]
pub struct ResultMerger {
	top_k: usize,
}
impl ResultMerger {
	pub fn new(top_k: usize) -> Self {
		Self { top_k }
	}

	/// Vector candidates are seen before fallback candidates. A duplicate id keeps the higher
	/// `combined_score` at the position where the id was first seen; equal scores keep the
	/// earlier entry. The stable sort then preserves first-seen order among ties.
	pub fn merge(
		&self,
		raw_query: &str,
		vector_candidates: Vec<CandidateRecord>,
		fallback_candidates: Vec<CandidateRecord>,
	) -> SearchResult {
		let mut results: Vec<CandidateRecord> = Vec::new();
		let mut positions: HashMap<String, usize> = HashMap::new();

		for candidate in vector_candidates.into_iter().chain(fallback_candidates) {
			match positions.get(&candidate.id) {
				Some(&idx) => {
					if cmp_f32_desc(candidate.combined_score, results[idx].combined_score)
						== Ordering::Less
					{
						results[idx] = candidate;
					}
				},
				None => {
					positions.insert(candidate.id.clone(), results.len());
					results.push(candidate);
				},
			}
		}

		results.sort_by(|left, right| cmp_f32_desc(left.combined_score, right.combined_score));
		results.truncate(self.top_k);

		SearchResult { query: raw_query.to_string(), results }
	}
}

/// Descending order for scores; NaN sorts last.
pub fn cmp_f32_desc(a: f32, b: f32) -> Ordering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => Ordering::Equal,
		(true, false) => Ordering::Greater,
		(false, true) => Ordering::Less,
		(false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
	}
}
