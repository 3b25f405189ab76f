use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub redirect: Redirect,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Solr-compatible search index holding the published records.
#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	pub url: String,
	pub collection: String,
	#[serde(default = "default_search_timeout_ms")]
	pub timeout_ms: u64,
	/// Upper bound on candidates fetched per redirection query.
	#[serde(default = "default_search_max_rows")]
	pub max_rows: u32,
	/// Optional. Sent as a bearer token when present and non-blank.
	pub api_key: Option<String>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Redirect {
	/// When false, redirection requests return without querying the index or the store.
	pub enabled: bool,
	/// Number of mutex shards used to serialize rewrites touching the same identifiers.
	pub lock_shards: u32,
}
impl Default for Redirect {
	fn default() -> Self {
		Self { enabled: true, lock_shards: 64 }
	}
}

fn default_search_timeout_ms() -> u64 {
	10_000
}

fn default_search_max_rows() -> u32 {
	100
}
