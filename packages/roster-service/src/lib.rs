//! The search pipeline: analyze, retrieve, fall back, score, merge.

pub mod analyze;
pub mod fallback;
pub mod retrieval;
pub mod search;

mod call;
mod error;

pub use analyze::QueryAnalyzer;
pub use error::{Error, Result};
pub use fallback::FallbackTextSearcher;
pub use retrieval::VectorSearchClient;
pub use roster_storage::BoxFuture;
pub use search::{MatchingProjectInfo, SearchItem, SearchRequest, SearchResponse};

use std::sync::Arc;

use reqwest::Client;

use roster_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use roster_domain::{MatchScorer, SynonymTable, TermNormalizer};
use roster_providers::{embedding, expansion};
use roster_storage::RecordStore;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait ExpansionProvider
where
	Self: Send + Sync,
{
	/// Returns the raw reply text; parsing into terms happens in the analyzer.
	fn expand<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		system_prompt: &'a str,
		user_prompt: &'a str,
	) -> BoxFuture<'a, Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub expansion: Arc<dyn ExpansionProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		expansion: Arc<dyn ExpansionProvider>,
	) -> Self {
		Self { embedding, expansion }
	}

	/// OpenAI-compatible HTTP providers sharing one connection pool.
	pub fn http() -> Result<Self> {
		let provider = Arc::new(HttpProviders { client: roster_providers::http_client()? });

		Ok(Self { embedding: provider.clone(), expansion: provider })
	}
}

pub struct RosterService {
	pub cfg: Config,
	pub store: Arc<dyn RecordStore>,
	pub providers: Providers,
	normalizer: TermNormalizer,
	synonyms: SynonymTable,
	scorer: MatchScorer,
}
impl RosterService {
	pub fn new(cfg: Config, store: Arc<dyn RecordStore>) -> Result<Self> {
		Ok(Self::with_providers(cfg, store, Providers::http()?))
	}

	pub fn with_providers(cfg: Config, store: Arc<dyn RecordStore>, providers: Providers) -> Self {
		let normalizer = TermNormalizer::new(&cfg.search.normalizer);
		let synonyms = SynonymTable::new(&cfg.search.synonyms);
		let scorer = MatchScorer::new(cfg.search.fields.clone(), &cfg.search.scoring);

		Self { cfg, store, providers, normalizer, synonyms, scorer }
	}

	pub fn analyzer(&self) -> QueryAnalyzer<'_> {
		QueryAnalyzer {
			search: &self.cfg.search,
			llm: &self.cfg.providers.expansion,
			normalizer: &self.normalizer,
			synonyms: &self.synonyms,
			expansion: self.providers.expansion.as_ref(),
		}
	}

	pub fn vector_client(&self) -> VectorSearchClient<'_> {
		VectorSearchClient {
			search: &self.cfg.search,
			embedding_cfg: &self.cfg.providers.embedding,
			embedding: self.providers.embedding.as_ref(),
			store: self.store.as_ref(),
		}
	}

	pub fn fallback_searcher(&self) -> FallbackTextSearcher<'_> {
		FallbackTextSearcher { search: &self.cfg.search, store: self.store.as_ref() }
	}
}

struct HttpProviders {
	client: Client,
}

impl EmbeddingProvider for HttpProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(&self.client, cfg, texts).await?) })
	}
}

impl ExpansionProvider for HttpProviders {
	fn expand<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		system_prompt: &'a str,
		user_prompt: &'a str,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move {
			Ok(expansion::complete(&self.client, cfg, system_prompt, user_prompt).await?)
		})
	}
}
