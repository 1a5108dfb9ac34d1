use serde_json::Value;

use roster_config::FieldAliases;

/// Bumped whenever the shape of [`CandidateRecord`] changes.
pub const CANDIDATE_RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalSource {
	Vector,
	TextSearch,
	Scan,
}
impl RetrievalSource {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Vector => "vector",
			Self::TextSearch => "text_search",
			Self::Scan => "scan",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchReason {
	ExactPhrase,
	Keywords { matched: usize, total: usize },
}
impl MatchReason {
	pub fn describe(&self) -> String {
		match self {
			Self::ExactPhrase => "Exact project name match".to_string(),
			Self::Keywords { matched, total } => format!("Matched {matched} of {total} keywords"),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchedProject {
	pub entry: Value,
	pub reason: MatchReason,
}

/// One retrieved record, before and after scoring.
///
/// `combined_score` starts equal to `base_score` and is only ever raised by the match scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
	pub id: String,
	pub display_name: String,
	pub raw_payload: Value,
	pub source: RetrievalSource,
	pub base_score: f32,
	pub project_match_score: Option<f32>,
	pub matched_project: Option<MatchedProject>,
	pub combined_score: f32,
}
impl CandidateRecord {
	pub fn new(
		id: String,
		raw_payload: Value,
		similarity: f32,
		source: RetrievalSource,
		aliases: &FieldAliases,
	) -> Self {
		let base_score = if similarity.is_finite() { similarity.clamp(0.0, 1.0) } else { 0.0 };
		let display_name = resolve_field(&raw_payload, &aliases.name)
			.and_then(value_text)
			.unwrap_or_else(|| id.clone());

		Self {
			id,
			display_name,
			raw_payload,
			source,
			base_score,
			project_match_score: None,
			matched_project: None,
			combined_score: base_score,
		}
	}

	pub fn field(&self, aliases: &[String]) -> Option<&Value> {
		resolve_field(&self.raw_payload, aliases)
	}

	pub fn projects(&self, aliases: &FieldAliases) -> Vec<Value> {
		project_entries(&self.raw_payload, aliases)
	}
}

/// Value of the first alias present in `payload` with a non-null value.
pub fn resolve_field<'a>(payload: &'a Value, aliases: &[String]) -> Option<&'a Value> {
	let object = payload.as_object()?;

	aliases.iter().filter_map(|alias| object.get(alias)).find(|value| !value.is_null())
}

/// Scalar values rendered as text; strings are trimmed and empty strings are treated as absent.
pub fn value_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) => {
			let trimmed = text.trim();

			if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
		},
		Value::Number(number) => Some(number.to_string()),
		Value::Bool(flag) => Some(flag.to_string()),
		_ => None,
	}
}

/// The candidate's project list.
///
/// Arrays yield one entry per non-null item. Stores that kept the list as a JSON-encoded string
/// are decoded first. Any other non-empty value is treated as a single project.
pub fn project_entries(payload: &Value, aliases: &FieldAliases) -> Vec<Value> {
	let Some(value) = resolve_field(payload, &aliases.projects) else { return Vec::new() };

	match decode_embedded_json(value) {
		Some(Value::Array(items)) => items.into_iter().filter(|item| !item.is_null()).collect(),
		Some(other) => vec![other],
		None => match value {
			Value::Array(items) => items.iter().filter(|item| !item.is_null()).cloned().collect(),
			Value::String(text) if text.trim().is_empty() => Vec::new(),
			other => vec![other.clone()],
		},
	}
}

/// Lowercased concatenation of every scalar value inside a project entry or payload. Keys are
/// left out so field names never count as keyword hits.
pub fn searchable_text(value: &Value) -> String {
	let mut parts = Vec::new();

	collect_text(value, &mut parts);

	parts.join(" ").to_lowercase()
}

fn collect_text(value: &Value, out: &mut Vec<String>) {
	match value {
		Value::Array(items) =>
			for item in items {
				collect_text(item, out);
			},
		Value::Object(map) =>
			for item in map.values() {
				collect_text(item, out);
			},
		other =>
			if let Some(text) = value_text(other) {
				out.push(text);
			},
	}
}

fn decode_embedded_json(value: &Value) -> Option<Value> {
	let text = value.as_str()?.trim();

	if !(text.starts_with('[') || text.starts_with('{')) {
		return None;
	}

	serde_json::from_str(text).ok()
}
