mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, LlmProviderConfig, Pipeline, Postgres, Providers, Retry,
	Service, Storage, Worker,
};

use std::{fs, path::Path};

use serde_json::{Map, Value};

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
		return Err(Error::validation("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::validation("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns", "must be greater than zero."));
	}

	let embedding = &cfg.providers.embedding;

	if embedding.dimensions == 0 {
		return Err(Error::validation(
			"providers.embedding.dimensions",
			"must be greater than zero.",
		));
	}
	if embedding.timeout_ms == 0 {
		return Err(Error::validation("providers.embedding.timeout_ms", "must be greater than zero."));
	}

	let llm = &cfg.providers.llm;

	if llm.timeout_ms == 0 {
		return Err(Error::validation("providers.llm.timeout_ms", "must be greater than zero."));
	}
	if !llm.temperature.is_finite() {
		return Err(Error::validation("providers.llm.temperature", "must be a finite number."));
	}
	if !(0.0..=2.0).contains(&llm.temperature) {
		return Err(Error::validation("providers.llm.temperature", "must be in the range 0.0-2.0."));
	}

	for (key, api_base) in [
		("providers.embedding.api_base", &embedding.api_base),
		("providers.llm.api_base", &llm.api_base),
	] {
		if api_base.trim().is_empty() {
			return Err(Error::validation(key, "must be non-empty."));
		}
	}
	for (key, api_key) in
		[("providers.embedding.api_key", &embedding.api_key), ("providers.llm.api_key", &llm.api_key)]
	{
		if api_key.trim().is_empty() {
			return Err(Error::validation(key, "must be non-empty."));
		}
	}
	for (key, headers) in [
		("providers.embedding.default_headers", &embedding.default_headers),
		("providers.llm.default_headers", &llm.default_headers),
	] {
		validate_headers(key, headers)?;
	}

	if cfg.pipeline.retrieval_concurrency == 0 {
		return Err(Error::validation("pipeline.retrieval_concurrency", "must be greater than zero."));
	}
	if cfg.pipeline.validation_concurrency == 0 {
		return Err(Error::validation(
			"pipeline.validation_concurrency",
			"must be greater than zero.",
		));
	}
	if cfg.pipeline.request_timeout_ms == 0 {
		return Err(Error::validation("pipeline.request_timeout_ms", "must be greater than zero."));
	}
	if cfg.retry.max_attempts == 0 {
		return Err(Error::validation("retry.max_attempts", "must be at least one."));
	}
	if cfg.retry.base_backoff_ms > cfg.retry.max_backoff_ms {
		return Err(Error::validation(
			"retry.base_backoff_ms",
			"must not exceed retry.max_backoff_ms.",
		));
	}
	if cfg.worker.batch_size == 0 {
		return Err(Error::validation("worker.batch_size", "must be greater than zero."));
	}

	Ok(())
}

fn validate_headers(key: &'static str, headers: &Map<String, Value>) -> Result<()> {
	if headers.values().any(|value| !value.is_string()) {
		return Err(Error::validation(key, "values must be strings."));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for api_base in [&mut cfg.providers.embedding.api_base, &mut cfg.providers.llm.api_base] {
		let trimmed = api_base.trim().trim_end_matches('/');

		if trimmed.len() != api_base.len() {
			*api_base = trimmed.to_string();
		}
	}
}
