//! Record stores behind the search pipeline: pgvector on Postgres, or a Qdrant collection.

pub mod pg;
pub mod qdrant;
pub mod schema;

mod error;

pub use error::Error;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use roster_config::{BACKEND_POSTGRES, BACKEND_QDRANT, Storage};

use crate::{pg::PgStore, qdrant::QdrantStore};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Similarity reported for every full-text hit. Keeps keyword hits below strong semantic matches.
pub const TEXT_SEARCH_SIMILARITY: f32 = 0.8;

/// One stored resume or project document.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
	pub id: String,
	pub payload: Value,
	/// Cosine-derived similarity for vector matches, [`TEXT_SEARCH_SIMILARITY`] for text hits,
	/// and `0.0` for scanned records.
	pub similarity: f32,
}

pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Records whose similarity to `embedding` exceeds `threshold`, most similar first.
	fn match_records<'a>(
		&'a self,
		embedding: &'a [f32],
		threshold: f32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<StoredRecord>>>;

	/// Full-text search with an OR-joined expression such as `harahan | drainage`.
	fn text_search<'a>(
		&'a self,
		expression: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<StoredRecord>>>;

	/// Every record in the store. Linear in corpus size.
	fn scan_all(&self) -> BoxFuture<'_, Result<Vec<StoredRecord>>>;
}

/// Connects the backend selected by `storage.backend`.
pub async fn open(cfg: &Storage) -> Result<Arc<dyn RecordStore>> {
	match cfg.backend.as_str() {
		BACKEND_POSTGRES => {
			let pg_cfg = cfg.postgres.as_ref().ok_or_else(|| {
				Error::InvalidArgument("storage.postgres section is missing.".to_string())
			})?;
			let store = PgStore::connect(pg_cfg).await?;

			store.ensure_schema(pg_cfg.vector_dim).await?;

			tracing::info!(table = %store.table, "Connected Postgres record store.");

			Ok(Arc::new(store))
		},
		BACKEND_QDRANT => {
			let qdrant_cfg = cfg.qdrant.as_ref().ok_or_else(|| {
				Error::InvalidArgument("storage.qdrant section is missing.".to_string())
			})?;
			let store = QdrantStore::new(qdrant_cfg)?;

			tracing::info!(collection = %store.collection, "Connected Qdrant record store.");

			Ok(Arc::new(store))
		},
		other => Err(Error::InvalidArgument(format!("Unknown storage backend {other:?}."))),
	}
}

/// Vectors are passed to pgvector as text and cast with `::text::vector`.
pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}
