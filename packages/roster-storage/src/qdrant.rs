use std::collections::HashMap;

use qdrant_client::{
	Qdrant,
	qdrant::{
		Condition, Filter, PointId, Query, QueryPointsBuilder, ScrollPointsBuilder,
		point_id::PointIdOptions, value::Kind,
	},
};
use serde_json::{Map, Number, Value};

use crate::{BoxFuture, Error, RecordStore, Result, StoredRecord, TEXT_SEARCH_SIMILARITY};

pub struct QdrantStore {
	pub client: Qdrant,
	pub collection: String,
	pub vector_name: Option<String>,
	pub text_field: String,
	pub page_size: u32,
}
impl QdrantStore {
	pub fn new(cfg: &roster_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_name: cfg.vector_name.clone(),
			text_field: cfg.text_field.clone(),
			page_size: cfg.scroll_page_size,
		})
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

		let mut search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(embedding.to_vec()))
			.score_threshold(threshold)
			.limit(limit as u64)
			.with_payload(true);

		if let Some(name) = &self.vector_name {
			search = search.using(name.clone());
		}

		let response = self.client.query(search).await?;

		Ok(response
			.result
			.into_iter()
			.filter_map(|point| {
				let id = point.id.as_ref().and_then(point_id_text)?;

				Some(StoredRecord {
					id,
					payload: payload_to_json(point.payload),
					similarity: point.score,
				})
			})
			.collect())
	}

	/// Scrolls points whose text field matches any term of the OR-joined expression.
	///
	/// Requires a full-text payload index on the text field; without one Qdrant rejects the
	/// filter and the caller falls through to a scan.
	pub async fn full_text(&self, expression: &str, limit: u32) -> Result<Vec<StoredRecord>> {
		let conditions: Vec<Condition> = expression
			.split('|')
			.map(str::trim)
			.filter(|term| !term.is_empty())
			.map(|term| Condition::matches_text(self.text_field.clone(), term.to_string()))
			.collect();

		if conditions.is_empty() {
			return Err(Error::InvalidArgument("Text search expression is empty.".to_string()));
		}

		let scroll = ScrollPointsBuilder::new(self.collection.clone())
			.filter(Filter::should(conditions))
			.limit(limit)
			.with_payload(true);
		let response = self.client.scroll(scroll).await?;

		Ok(response
			.result
			.into_iter()
			.filter_map(|point| {
				let id = point.id.as_ref().and_then(point_id_text)?;

				Some(StoredRecord {
					id,
					payload: payload_to_json(point.payload),
					similarity: TEXT_SEARCH_SIMILARITY,
				})
			})
			.collect())
	}

	pub async fn all_records(&self) -> Result<Vec<StoredRecord>> {
		let mut out = Vec::new();
		let mut offset: Option<PointId> = None;

		loop {
			let mut scroll = ScrollPointsBuilder::new(self.collection.clone())
				.limit(self.page_size)
				.with_payload(true);

			if let Some(offset) = offset.take() {
				scroll = scroll.offset(offset);
			}

			let response = self.client.scroll(scroll).await?;

			out.extend(response.result.into_iter().filter_map(|point| {
				let id = point.id.as_ref().and_then(point_id_text)?;

				Some(StoredRecord { id, payload: payload_to_json(point.payload), similarity: 0.0 })
			}));

			match response.next_page_offset {
				Some(next) => offset = Some(next),
				None => break,
			}
		}

		tracing::debug!(collection = %self.collection, records = out.len(), "Scanned collection.");

		Ok(out)
	}
}

impl RecordStore for QdrantStore {
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

fn point_id_text(point_id: &PointId) -> Option<String> {
	match &point_id.point_id_options {
		Some(PointIdOptions::Num(id)) => Some(id.to_string()),
		Some(PointIdOptions::Uuid(id)) => Some(id.clone()),
		None => None,
	}
}

fn payload_to_json(payload: HashMap<String, qdrant_client::qdrant::Value>) -> Value {
	Value::Object(payload.into_iter().map(|(key, value)| (key, value_to_json(value))).collect())
}

fn value_to_json(value: qdrant_client::qdrant::Value) -> Value {
	match value.kind {
		None | Some(Kind::NullValue(_)) => Value::Null,
		Some(Kind::BoolValue(flag)) => Value::Bool(flag),
		Some(Kind::IntegerValue(number)) => Value::from(number),
		Some(Kind::DoubleValue(number)) =>
			Number::from_f64(number).map(Value::Number).unwrap_or(Value::Null),
		Some(Kind::StringValue(text)) => Value::String(text),
		Some(Kind::ListValue(list)) =>
			Value::Array(list.values.into_iter().map(value_to_json).collect()),
		Some(Kind::StructValue(object)) => Value::Object(
			object
				.fields
				.into_iter()
				.map(|(key, value)| (key, value_to_json(value)))
				.collect::<Map<_, _>>(),
		),
	}
}
