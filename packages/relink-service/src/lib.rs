pub mod audit;
pub mod candidates;
pub mod disambiguate;
pub mod locks;
pub mod redirect;
pub mod rewrite;

mod error;

pub use audit::GraphViolation;
pub use candidates::{CandidateQuery, MatchGroup, MatchGroupKind};
pub use error::{Error, Result};
pub use locks::{IdentifierGuard, IdentifierLocks};
pub use redirect::{RecordRedirectResult, RedirectBatchReport, RedirectOutcome, RedirectRequest};

use std::{future::Future, pin::Pin, sync::Arc};

use relink_config::Config;
use relink_domain::{SearchCandidate, SearchRequest};
use relink_search::SolrIndex;
use relink_storage::{
	db::Db,
	models::{RedirectChain, RedirectEdge},
	redirects,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Read-only access to the published records.
pub trait SearchIndex
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> BoxFuture<'a, Result<Vec<SearchCandidate>>>;
}

/// Persistence for redirect edges. At most one edge may exist per source identifier.
pub trait RedirectStore
where
	Self: Send + Sync,
{
	fn find_by_source<'a>(
		&'a self,
		source_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<RedirectEdge>>>;

	fn find_by_target<'a>(
		&'a self,
		target_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<RedirectEdge>>>;

	/// Inserts the edge or replaces the one stored for the same source.
	fn upsert<'a>(&'a self, edge: &'a RedirectEdge) -> BoxFuture<'a, Result<()>>;

	fn delete<'a>(&'a self, edge: &'a RedirectEdge) -> BoxFuture<'a, Result<()>>;

	/// Edge pairs `a -> b -> c`. A self-redirect shows up as `a -> a -> a`.
	fn find_chains<'a>(&'a self) -> BoxFuture<'a, Result<Vec<RedirectChain>>>;

	fn close<'a>(&'a self) -> BoxFuture<'a, ()>;
}

/// Postgres-backed [`RedirectStore`].
pub struct PgRedirectStore {
	db: Db,
	owns_pool: bool,
}
impl PgRedirectStore {
	/// Opens a dedicated pool, ensures the schema and closes the pool on [`RedirectStore::close`].
	pub async fn connect(cfg: &relink_config::Postgres) -> Result<Self> {
		let db = Db::connect(cfg).await?;

		db.ensure_schema().await?;

		Ok(Self { db, owns_pool: true })
	}

	/// Wraps a shared pool. Closing the store leaves the pool open.
	pub fn new(db: Db) -> Self {
		Self { db, owns_pool: false }
	}
}
impl RedirectStore for PgRedirectStore {
	fn find_by_source<'a>(
		&'a self,
		source_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<RedirectEdge>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(redirects::find_by_source(&mut conn, source_id).await?)
		})
	}

	fn find_by_target<'a>(
		&'a self,
		target_id: &'a str,
	) -> BoxFuture<'a, Result<Vec<RedirectEdge>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(redirects::find_by_target(&mut conn, target_id).await?)
		})
	}

	fn upsert<'a>(&'a self, edge: &'a RedirectEdge) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(redirects::upsert(&mut conn, edge).await?)
		})
	}

	fn delete<'a>(&'a self, edge: &'a RedirectEdge) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			redirects::delete(&mut conn, edge).await?;

			Ok(())
		})
	}

	fn find_chains<'a>(&'a self) -> BoxFuture<'a, Result<Vec<RedirectChain>>> {
		Box::pin(async move {
			let mut conn = self.db.pool.acquire().await?;

			Ok(redirects::find_chains(&mut conn).await?)
		})
	}

	fn close<'a>(&'a self) -> BoxFuture<'a, ()> {
		Box::pin(async move {
			if self.owns_pool {
				self.db.close().await;
			}
		})
	}
}

impl SearchIndex for SolrIndex {
	fn search<'a>(
		&'a self,
		request: &'a SearchRequest,
	) -> BoxFuture<'a, Result<Vec<SearchCandidate>>> {
		Box::pin(async move { Ok(SolrIndex::search(self, request).await?) })
	}
}

pub struct RedirectService {
	pub cfg: Config,
	pub store: Arc<dyn RedirectStore>,
	pub index: Arc<dyn SearchIndex>,
	locks: IdentifierLocks,
}
impl RedirectService {
	/// Builds the service over a shared database handle and the configured search index.
	pub fn new(cfg: Config, db: Db) -> Result<Self> {
		let index = SolrIndex::new(&cfg.storage.search)?;

		Ok(Self::with_backends(cfg, Arc::new(PgRedirectStore::new(db)), Arc::new(index)))
	}

	/// Builds the service with a store that owns its connection pool.
	pub async fn connect(cfg: Config) -> Result<Self> {
		let store = PgRedirectStore::connect(&cfg.storage.postgres).await?;
		let index = SolrIndex::new(&cfg.storage.search)?;

		Ok(Self::with_backends(cfg, Arc::new(store), Arc::new(index)))
	}

	pub fn with_backends(
		cfg: Config,
		store: Arc<dyn RedirectStore>,
		index: Arc<dyn SearchIndex>,
	) -> Self {
		let locks = IdentifierLocks::new(cfg.redirect.lock_shards as usize);

		Self { cfg, store, index, locks }
	}

	pub fn locks(&self) -> &IdentifierLocks {
		&self.locks
	}

	/// Releases the store's resources. Only pools owned by the store are closed.
	pub async fn close(&self) {
		self.store.close().await;
	}
}
