use roster_config::Search;
use roster_domain::{CandidateRecord, Query, RetrievalSource, candidate, keywords};
use roster_storage::{RecordStore, StoredRecord};

use crate::{call, retrieval};

/// Keyword retrieval for project queries the vector path found nothing for.
///
/// Tier one is the store's full-text search. Only when that call fails or times out does tier
/// two scan every record client-side. Neither tier is retried.
pub struct FallbackTextSearcher<'a> {
	pub(crate) search: &'a Search,
	pub(crate) store: &'a dyn RecordStore,
}
impl FallbackTextSearcher<'_> {
	pub async fn search(&self, query: &Query, limit: u32) -> Vec<CandidateRecord> {
		if !self.search.fallback.enabled {
			return Vec::new();
		}

		let terms = query.terms();

		if terms.is_empty() {
			tracing::debug!("No keyword terms in the query subject. Skipping fallback.");

			return Vec::new();
		}

		let expression = keywords::disjunction(terms);

		if !expression.is_empty()
			&& let Some(records) = call::best_effort(
				"text search",
				self.search.timeouts.text_search_ms,
				self.store.text_search(&expression, limit),
			)
			.await
		{
			tracing::info!(
				expression = %expression,
				hits = records.len(),
				"Text search fallback completed."
			);

			return retrieval::to_candidates(records, RetrievalSource::TextSearch, self.search);
		}

		let Some(records) =
			call::best_effort("record scan", self.search.timeouts.scan_ms, self.store.scan_all())
				.await
		else {
			return Vec::new();
		};
		let scanned = records.len();
		let candidates = self.score_scan(records, terms);

		tracing::info!(scanned, hits = candidates.len(), "Scan fallback completed.");

		candidates
	}

	/// Records matching at least one term, scored by the fraction of terms they contain.
	pub fn score_scan(&self, records: Vec<StoredRecord>, terms: &[String]) -> Vec<CandidateRecord> {
		let cfg = &self.search.fallback;

		records
			.into_iter()
			.filter_map(|record| {
				let text = candidate::searchable_text(&record.payload);
				let matches = keywords::count_term_matches(&text, terms);
				let score =
					keywords::scan_score(matches, terms.len(), cfg.score_base, cfg.score_span)?;

				Some(CandidateRecord::new(
					record.id,
					record.payload,
					score,
					RetrievalSource::Scan,
					&self.search.fields,
				))
			})
			.collect()
	}
}
