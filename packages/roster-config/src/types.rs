use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	/// One of "postgres" or "qdrant". The matching section below must be present.
	pub backend: String,
	pub postgres: Option<Postgres>,
	pub qdrant: Option<Qdrant>,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_table")]
	pub table: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	/// Named dense vector to query. Unnamed collections leave this unset.
	pub vector_name: Option<String>,
	/// Payload field carrying a full-text index, used by the keyword fallback.
	#[serde(default = "default_text_field")]
	pub text_field: String,
	#[serde(default = "default_scroll_page_size")]
	pub scroll_page_size: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub expansion: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	#[serde(default)]
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub top_k: u32,
	/// Upper bound on a caller-supplied `top_k`.
	#[serde(default = "default_max_top_k")]
	pub max_top_k: u32,
	pub candidate_k: u32,
	/// Minimum similarity for general queries.
	pub general_threshold: f32,
	/// Minimum similarity for project queries. Short project names embed poorly against long
	/// resume narratives, so this sits well below `general_threshold`.
	pub project_threshold: f32,
	#[serde(default)]
	pub expansion: SearchExpansion,
	#[serde(default)]
	pub timeouts: SearchTimeouts,
	#[serde(default)]
	pub normalizer: SearchNormalizer,
	/// Trigger keyword to extra search terms, applied to project queries whose subject contains
	/// the trigger.
	#[serde(default)]
	pub synonyms: BTreeMap<String, Vec<String>>,
	#[serde(default)]
	pub scoring: SearchScoring,
	#[serde(default)]
	pub fallback: SearchFallback,
	#[serde(default)]
	pub fields: FieldAliases,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchExpansion {
	pub enabled: bool,
	pub max_terms: u32,
}
impl Default for SearchExpansion {
	fn default() -> Self {
		Self { enabled: true, max_terms: 10 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchTimeouts {
	pub expansion_ms: u64,
	pub embedding_ms: u64,
	pub vector_ms: u64,
	pub text_search_ms: u64,
	pub scan_ms: u64,
}
impl Default for SearchTimeouts {
	fn default() -> Self {
		Self {
			expansion_ms: 8_000,
			embedding_ms: 10_000,
			vector_ms: 5_000,
			text_search_ms: 5_000,
			scan_ms: 15_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchNormalizer {
	/// Any of these (lowercase) marks a query as a project query.
	pub project_triggers: Vec<String>,
	/// Lead-in phrases removed from project queries. Longer phrases are stripped first.
	pub boilerplate_phrases: Vec<String>,
	pub stopwords: Vec<String>,
	/// Keyword terms shorter than this many characters are ignored.
	pub min_term_chars: u32,
}
impl Default for SearchNormalizer {
	fn default() -> Self {
		Self {
			project_triggers: strings(&["project", "worked on"]),
			boilerplate_phrases: strings(&[
				"employees who have worked on project",
				"employees who worked on project",
				"people who have worked on project",
				"people who worked on project",
				"employees who have worked on",
				"employees who worked on",
				"people who have worked on",
				"people who worked on",
				"who have worked on",
				"who worked on",
				"worked on",
				"projects",
				"project",
			]),
			stopwords: strings(&[
				"a", "an", "and", "any", "anyone", "are", "employee", "employees", "find", "for",
				"had", "has", "have", "in", "is", "list", "me", "of", "on", "or", "people", "person",
				"show", "the", "to", "which", "who", "with", "worked",
			]),
			min_term_chars: 3,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchScoring {
	/// Boost factor is `1 + project_match_score * boost_weight`.
	pub boost_weight: f32,
	/// Candidates without a project match are dropped below this base score.
	pub low_relevance_cutoff: f32,
}
impl Default for SearchScoring {
	fn default() -> Self {
		Self { boost_weight: 2.0, low_relevance_cutoff: 0.1 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchFallback {
	pub enabled: bool,
	/// Linear-scan score is `score_base + (matches / terms) * score_span`.
	pub score_base: f32,
	pub score_span: f32,
}
impl Default for SearchFallback {
	fn default() -> Self {
		Self { enabled: true, score_base: 0.5, score_span: 0.3 }
	}
}

/// Ordered key aliases per logical field. The first alias present in a payload wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldAliases {
	pub name: Vec<String>,
	pub role: Vec<String>,
	pub projects: Vec<String>,
	pub education: Vec<String>,
	pub years_experience: Vec<String>,
	pub project_title: Vec<String>,
	pub project_role: Vec<String>,
	pub project_description: Vec<String>,
}
impl Default for FieldAliases {
	fn default() -> Self {
		Self {
			name: strings(&["name", "Name", "full_name", "Full Name", "employee_name"]),
			role: strings(&["role", "Role", "title", "Title", "position", "current_role"]),
			projects: strings(&[
				"relevant_projects",
				"Relevant Projects",
				"relevant projects",
				"relevantProjects",
				"projects",
				"Projects",
			]),
			education: strings(&["education", "Education"]),
			years_experience: strings(&[
				"years_experience",
				"Years of Experience",
				"years of experience",
				"yearsExperience",
				"experience_years",
			]),
			project_title: strings(&[
				"title",
				"Title",
				"project_name",
				"Project Name",
				"name",
				"Name",
				"project",
			]),
			project_role: strings(&["role", "Role", "position"]),
			project_description: strings(&["description", "Description", "summary", "details"]),
		}
	}
}

fn strings(values: &[&str]) -> Vec<String> {
	values.iter().map(|value| value.to_string()).collect()
}

fn default_table() -> String {
	"employees".to_string()
}

fn default_text_field() -> String {
	"content".to_string()
}

fn default_scroll_page_size() -> u32 {
	256
}

fn default_max_top_k() -> u32 {
	50
}
