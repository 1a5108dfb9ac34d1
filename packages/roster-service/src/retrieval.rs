use roster_config::{EmbeddingProviderConfig, Search};
use roster_domain::{CandidateRecord, Query, RetrievalSource};
use roster_storage::{RecordStore, StoredRecord};

use crate::{EmbeddingProvider, call};

/// Semantic retrieval: embeds the expanded query and asks the store for nearest records.
pub struct VectorSearchClient<'a> {
	pub(crate) search: &'a Search,
	pub(crate) embedding_cfg: &'a EmbeddingProviderConfig,
	pub(crate) embedding: &'a dyn EmbeddingProvider,
	pub(crate) store: &'a dyn RecordStore,
}
impl VectorSearchClient<'_> {
	/// Unranked candidates above the intent's similarity threshold. Embedding or store failures
	/// yield no candidates.
	pub async fn search(&self, query: &Query, top_k: u32) -> Vec<CandidateRecord> {
		let texts = [query.expanded_text().to_string()];
		let Some(vectors) = call::best_effort(
			"query embedding",
			self.search.timeouts.embedding_ms,
			self.embedding.embed(self.embedding_cfg, &texts),
		)
		.await
		else {
			return Vec::new();
		};
		let Some(vector) = vectors.into_iter().next() else {
			tracing::warn!("Embedding provider returned no vectors.");

			return Vec::new();
		};
		let threshold = threshold_for(self.search, query);
		let limit = vector_limit(self.search, top_k);
		let Some(records) = call::best_effort(
			"vector match",
			self.search.timeouts.vector_ms,
			self.store.match_records(&vector, threshold, limit),
		)
		.await
		else {
			return Vec::new();
		};

		tracing::debug!(threshold, limit, matches = records.len(), "Vector search completed.");

		to_candidates(records, RetrievalSource::Vector, self.search)
	}
}

/// Project queries admit weaker semantic matches than general queries.
pub fn threshold_for(search: &Search, query: &Query) -> f32 {
	if query.is_project_query() { search.project_threshold } else { search.general_threshold }
}

pub fn vector_limit(search: &Search, top_k: u32) -> u32 {
	search.candidate_k.max(top_k)
}

pub(crate) fn to_candidates(
	records: Vec<StoredRecord>,
	source: RetrievalSource,
	search: &Search,
) -> Vec<CandidateRecord> {
	records
		.into_iter()
		.map(|record| {
			CandidateRecord::new(
				record.id,
				record.payload,
				record.similarity,
				source,
				&search.fields,
			)
		})
		.collect()
}
