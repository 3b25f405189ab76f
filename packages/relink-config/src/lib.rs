mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Postgres, Redirect, Search, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: "<inline>".into(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.log_level", &cfg.service.log_level),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("storage.search.url", &cfg.storage.search.url),
		("storage.search.collection", &cfg.storage.search.collection),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.search.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.search.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.search.max_rows == 0 {
		return Err(Error::Validation {
			message: "storage.search.max_rows must be greater than zero.".to_string(),
		});
	}
	if cfg.redirect.lock_shards == 0 {
		return Err(Error::Validation {
			message: "redirect.lock_shards must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.storage.search.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("storage.search.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.storage.search.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.storage.search.api_key = None;
	}

	let url = cfg.storage.search.url.trim_end_matches('/').to_string();

	cfg.storage.search.url = url;
}
