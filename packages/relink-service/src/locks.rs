use std::collections::BTreeSet;

use tokio::sync::{Mutex, MutexGuard};

/// Serializes rewrites that touch the same identifiers within one process.
///
/// Identifiers hash onto a fixed set of shards. Callers take every shard they need in one call,
/// and shards are always locked in ascending order, so two callers cannot deadlock. A rewrite
/// locks both of its identifiers plus every identifier that redirects to the old one.
pub struct IdentifierLocks {
	shards: Vec<Mutex<()>>,
}
impl IdentifierLocks {
	pub fn new(shard_count: usize) -> Self {
		let shards = (0..shard_count.max(1)).map(|_| Mutex::new(())).collect();

		Self { shards }
	}

	pub fn shard_count(&self) -> usize {
		self.shards.len()
	}

	pub fn shard_of(&self, id: &str) -> usize {
		let hash = blake3::hash(id.as_bytes());
		let mut prefix = [0_u8; 8];

		prefix.copy_from_slice(&hash.as_bytes()[..8]);

		(u64::from_le_bytes(prefix) % self.shards.len() as u64) as usize
	}

	pub async fn lock<I, S>(&self, ids: I) -> IdentifierGuard<'_>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let shards = ids.into_iter().map(|id| self.shard_of(id.as_ref())).collect::<BTreeSet<_>>();
		let mut guards = Vec::with_capacity(shards.len());

		for shard in shards {
			guards.push(self.shards[shard].lock().await);
		}

		IdentifierGuard { _guards: guards }
	}
}

/// Holds the locked shards until dropped.
pub struct IdentifierGuard<'a> {
	_guards: Vec<MutexGuard<'a, ()>>,
}
