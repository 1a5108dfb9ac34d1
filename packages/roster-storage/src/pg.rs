use sqlx::{
	PgPool, Row,
	postgres::{PgPoolOptions, PgRow},
};

use crate::{BoxFuture, Error, RecordStore, Result, StoredRecord, TEXT_SEARCH_SIMILARITY, schema};

pub struct PgStore {
	pub pool: PgPool,
	pub table: String,
}
impl PgStore {
	pub async fn connect(cfg: &roster_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		Ok(Self { pool, table: cfg.table.clone() })
	}

	pub async fn ensure_schema(&self, vector_dim: u32) -> Result<()> {
		let sql = schema::render_schema(&self.table, vector_dim);
		let lock_id: i64 = 7_120_115;
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	pub async fn nearest(
		&self,
		embedding: &[f32],
		threshold: f32,
		limit: u32,
	) -> Result<Vec<StoredRecord>> {
		if embedding.is_empty() {
			return Err(Error::InvalidArgument("Query embedding must not be empty.".to_string()));
		}

		let sql = format!(
			"\
SELECT id, payload, (1 - (embedding <=> $1::text::vector))::float8 AS similarity
FROM {table}
WHERE embedding IS NOT NULL
	AND 1 - (embedding <=> $1::text::vector) > $2
ORDER BY embedding <=> $1::text::vector, id
LIMIT $3",
			table = self.table
		);
		let rows = sqlx::query(&sql)
			.bind(crate::vector_to_pg(embedding))
			.bind(threshold as f64)
			.bind(limit as i64)
			.fetch_all(&self.pool)
			.await?;

		rows.iter()
			.map(|row| {
				let similarity: f64 = row.try_get("similarity")?;

				decode_row(row, similarity as f32)
			})
			.collect()
	}

	pub async fn full_text(&self, expression: &str, limit: u32) -> Result<Vec<StoredRecord>> {
		if expression.trim().is_empty() {
			return Err(Error::InvalidArgument("Text search expression is empty.".to_string()));
		}

		let sql = format!(
			"\
SELECT id, payload
FROM {table}
WHERE to_tsvector('english', content) @@ to_tsquery('english', $1)
ORDER BY ts_rank(to_tsvector('english', content), to_tsquery('english', $1)) DESC, id
LIMIT $2",
			table = self.table
		);
		let rows =
			sqlx::query(&sql).bind(expression).bind(limit as i64).fetch_all(&self.pool).await?;

		rows.iter().map(|row| decode_row(row, TEXT_SEARCH_SIMILARITY)).collect()
	}

	pub async fn all_records(&self) -> Result<Vec<StoredRecord>> {
		let sql = format!("SELECT id, payload FROM {table} ORDER BY id", table = self.table);
		let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

		rows.iter().map(|row| decode_row(row, 0.0)).collect()
	}
}

impl RecordStore for PgStore {
	fn match_records<'a>(
		&'a self,
		embedding: &'a [f32],
		threshold: f32,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<StoredRecord>>> {
		Box::pin(self.nearest(embedding, threshold, limit))
	}

	fn text_search<'a>(
		&'a self,
		expression: &'a str,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<StoredRecord>>> {
		Box::pin(self.full_text(expression, limit))
	}

	fn scan_all(&self) -> BoxFuture<'_, Result<Vec<StoredRecord>>> {
		Box::pin(self.all_records())
	}
}

fn decode_row(row: &PgRow, similarity: f32) -> Result<StoredRecord> {
	Ok(StoredRecord { id: row.try_get("id")?, payload: row.try_get("payload")?, similarity })
}
