use std::collections::BTreeSet;

use time::OffsetDateTime;

use relink_storage::models::RedirectEdge;

use crate::{Error, IdentifierGuard, IdentifierLocks, RedirectService, RedirectStore, Result};

impl RedirectService {
	/// Points `old_id` at `new_id` and collapses every redirect that went through either of them.
	///
	/// Holds the identifier locks of both ids, and of every id redirecting to `old_id`, for the
	/// duration of the rewrite.
	pub async fn introduce_redirection(
		&self,
		new_id: &str,
		old_id: &str,
		redirect_date: OffsetDateTime,
	) -> Result<()> {
		let _guard =
			lock_rewrite(self.locks(), self.store.as_ref(), &[new_id, old_id], &[old_id]).await?;

		introduce_redirection(self.store.as_ref(), new_id, old_id, redirect_date).await
	}
}

/// Locks `ids` and every identifier that currently redirects to one of `old_ids`.
///
/// Edges into an identifier are only written under that identifier's lock, so once the locks of
/// `old_ids` are held the set of redirecting identifiers can only shrink.
pub(crate) async fn lock_rewrite<'a>(
	locks: &'a IdentifierLocks,
	store: &dyn RedirectStore,
	ids: &[&str],
	old_ids: &[&str],
) -> Result<IdentifierGuard<'a>> {
	let mut wanted = ids.iter().map(|id| id.to_string()).collect::<BTreeSet<_>>();

	loop {
		let guard = locks.lock(&wanted).await;
		let mut missing = Vec::new();

		for old_id in old_ids {
			for edge in store.find_by_target(old_id).await? {
				if !wanted.contains(&edge.source_id) {
					missing.push(edge.source_id);
				}
			}
		}

		if missing.is_empty() {
			return Ok(guard);
		}

		drop(guard);

		tracing::debug!(redirecting = missing.len(), "Widening identifier locks.");

		wanted.extend(missing);
	}
}

/// Rewrites the redirect graph so `old_id` resolves to `new_id` in a single hop.
///
/// The steps are not atomic. Callers must not run two rewrites touching the same identifiers at
/// once. Re-running an interrupted rewrite converges to the same graph.
pub async fn introduce_redirection(
	store: &dyn RedirectStore,
	new_id: &str,
	old_id: &str,
	redirect_date: OffsetDateTime,
) -> Result<()> {
	if new_id.trim().is_empty() || old_id.trim().is_empty() {
		return Err(Error::InvalidRequest {
			message: "Redirect identifiers must be non-empty.".to_string(),
		});
	}
	if new_id == old_id {
		tracing::info!(record_id = %new_id, "Skipping redirection of a record to itself.");

		return Ok(());
	}

	// The new id is live again, so nothing may redirect away from it.
	for edge in store.find_by_source(new_id).await? {
		store.delete(&edge).await?;

		tracing::debug!(
			source_id = %edge.source_id,
			target_id = %edge.target_id,
			"Deleted redirect from a live record."
		);
	}

	let mut already_redirected = false;

	for edge in store.find_by_source(old_id).await? {
		if edge.target_id == new_id {
			already_redirected = true;

			continue;
		}

		store.delete(&edge).await?;

		tracing::debug!(
			source_id = %edge.source_id,
			target_id = %edge.target_id,
			"Deleted superseded redirect."
		);
	}

	if !already_redirected {
		store.upsert(&RedirectEdge::new(old_id, new_id, redirect_date)).await?;

		tracing::debug!(source_id = %old_id, target_id = %new_id, "Created redirect.");
	}

	for edge in store.find_by_target(old_id).await? {
		let retargeted = RedirectEdge::new(edge.source_id, new_id, edge.created_at);

		store.upsert(&retargeted).await?;

		tracing::debug!(
			source_id = %retargeted.source_id,
			via_id = %old_id,
			target_id = %new_id,
			"Collapsed redirect chain."
		);
	}

	Ok(())
}
