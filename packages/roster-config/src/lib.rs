mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, FieldAliases, LlmProviderConfig, Postgres, Providers, Qdrant,
	Search, SearchExpansion, SearchFallback, SearchNormalizer, SearchScoring, SearchTimeouts,
	Service, Storage,
};

use std::{fs, path::Path};

pub const BACKEND_POSTGRES: &str = "postgres";
pub const BACKEND_QDRANT: &str = "qdrant";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	validate_storage(cfg)?;

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.embedding.timeout_ms", cfg.providers.embedding.timeout_ms),
		("providers.expansion.timeout_ms", cfg.providers.expansion.timeout_ms),
		("search.timeouts.expansion_ms", cfg.search.timeouts.expansion_ms),
		("search.timeouts.embedding_ms", cfg.search.timeouts.embedding_ms),
		("search.timeouts.vector_ms", cfg.search.timeouts.vector_ms),
		("search.timeouts.text_search_ms", cfg.search.timeouts.text_search_ms),
		("search.timeouts.scan_ms", cfg.search.timeouts.scan_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	validate_search(&cfg.search)?;

	Ok(())
}

fn validate_storage(cfg: &Config) -> Result<()> {
	let vector_dim = match cfg.storage.backend.as_str() {
		BACKEND_POSTGRES => {
			let Some(postgres) = cfg.storage.postgres.as_ref() else {
				return Err(Error::Validation {
					message: "storage.postgres must be present when storage.backend is postgres."
						.to_string(),
				});
			};

			if postgres.dsn.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.postgres.dsn must be non-empty.".to_string(),
				});
			}
			if postgres.pool_max_conns == 0 {
				return Err(Error::Validation {
					message: "storage.postgres.pool_max_conns must be greater than zero."
						.to_string(),
				});
			}
			if !is_sql_identifier(&postgres.table) {
				return Err(Error::Validation {
					message: "storage.postgres.table must be a plain SQL identifier.".to_string(),
				});
			}

			postgres.vector_dim
		},
		BACKEND_QDRANT => {
			let Some(qdrant) = cfg.storage.qdrant.as_ref() else {
				return Err(Error::Validation {
					message: "storage.qdrant must be present when storage.backend is qdrant."
						.to_string(),
				});
			};

			if qdrant.url.trim().is_empty() || qdrant.collection.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.qdrant.url and storage.qdrant.collection must be non-empty."
						.to_string(),
				});
			}
			if qdrant.text_field.trim().is_empty() {
				return Err(Error::Validation {
					message: "storage.qdrant.text_field must be non-empty.".to_string(),
				});
			}
			if qdrant.scroll_page_size == 0 {
				return Err(Error::Validation {
					message: "storage.qdrant.scroll_page_size must be greater than zero."
						.to_string(),
				});
			}

			qdrant.vector_dim
		},
		_ => {
			return Err(Error::Validation {
				message: "storage.backend must be one of postgres or qdrant.".to_string(),
			});
		},
	};

	if cfg.providers.embedding.dimensions != vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match the storage vector_dim."
				.to_string(),
		});
	}

	Ok(())
}

fn validate_search(search: &types::Search) -> Result<()> {
	if search.top_k == 0 {
		return Err(Error::Validation {
			message: "search.top_k must be greater than zero.".to_string(),
		});
	}
	if search.max_top_k < search.top_k {
		return Err(Error::Validation {
			message: "search.max_top_k must be at least search.top_k.".to_string(),
		});
	}
	if search.candidate_k == 0 {
		return Err(Error::Validation {
			message: "search.candidate_k must be greater than zero.".to_string(),
		});
	}

	for (label, value) in [
		("search.general_threshold", search.general_threshold),
		("search.project_threshold", search.project_threshold),
		("search.scoring.low_relevance_cutoff", search.scoring.low_relevance_cutoff),
		("search.fallback.score_base", search.fallback.score_base),
		("search.fallback.score_span", search.fallback.score_span),
	] {
		if !value.is_finite() {
			return Err(Error::Validation { message: format!("{label} must be a finite number.") });
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	if search.project_threshold >= search.general_threshold {
		return Err(Error::Validation {
			message: "search.project_threshold must be lower than search.general_threshold."
				.to_string(),
		});
	}
	if search.fallback.score_base + search.fallback.score_span > 1.0 {
		return Err(Error::Validation {
			message: "search.fallback.score_base plus score_span must not exceed 1.0.".to_string(),
		});
	}
	if !search.scoring.boost_weight.is_finite() || search.scoring.boost_weight < 0.0 {
		return Err(Error::Validation {
			message: "search.scoring.boost_weight must be a finite number, zero or greater."
				.to_string(),
		});
	}
	if search.expansion.max_terms == 0 {
		return Err(Error::Validation {
			message: "search.expansion.max_terms must be greater than zero.".to_string(),
		});
	}
	if search.normalizer.project_triggers.is_empty() {
		return Err(Error::Validation {
			message: "search.normalizer.project_triggers must be non-empty.".to_string(),
		});
	}
	if search.normalizer.min_term_chars == 0 {
		return Err(Error::Validation {
			message: "search.normalizer.min_term_chars must be greater than zero.".to_string(),
		});
	}

	for (label, aliases) in [
		("search.fields.name", &search.fields.name),
		("search.fields.projects", &search.fields.projects),
	] {
		if aliases.is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.providers.embedding.api_key = cfg.providers.embedding.api_key.trim().to_string();
	cfg.providers.expansion.api_key = cfg.providers.expansion.api_key.trim().to_string();

	let normalizer = &mut cfg.search.normalizer;

	for list in [
		&mut normalizer.project_triggers,
		&mut normalizer.boilerplate_phrases,
		&mut normalizer.stopwords,
	] {
		*list = list
			.iter()
			.map(|value| value.trim().to_lowercase())
			.filter(|value| !value.is_empty())
			.collect();
	}

	cfg.search.synonyms = std::mem::take(&mut cfg.search.synonyms)
		.into_iter()
		.map(|(trigger, terms)| (trigger.trim().to_lowercase(), terms))
		.filter(|(trigger, _)| !trigger.is_empty())
		.collect();
}

fn is_sql_identifier(value: &str) -> bool {
	let mut chars = value.chars();
	let Some(first) = chars.next() else { return false };

	(first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
