use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use relink_domain::{RecordReference, non_blank};

use crate::{Error, RedirectService, Result, candidates, disambiguate, rewrite};

/// One record to redirect, with the datasets it may have been published under before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRequest {
	pub record: RecordReference,
	#[serde(default)]
	pub dataset_ids_to_redirect_from: Vec<String>,
	/// Stamped on every newly created redirect.
	#[serde(with = "time::serde::rfc3339")]
	pub redirect_date: OffsetDateTime,
}
impl RedirectRequest {
	/// Non-blank dataset ids, first occurrence kept.
	pub fn dataset_ids(&self) -> Vec<&str> {
		let mut out: Vec<&str> = Vec::new();

		let dataset_ids =
			self.dataset_ids_to_redirect_from.iter().map(String::as_str).filter_map(non_blank);

		for dataset_id in dataset_ids {
			if !out.contains(&dataset_id) {
				out.push(dataset_id);
			}
		}

		out
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectOutcome {
	/// Identifiers now redirecting to the record, in candidate order.
	pub redirected_from: Vec<String>,
	/// Earliest creation timestamp among the redirected records.
	#[serde(with = "time::serde::rfc3339::option")]
	pub earliest_created_at: Option<OffsetDateTime>,
}
impl RedirectOutcome {
	pub fn is_redirected(&self) -> bool {
		!self.redirected_from.is_empty()
	}
}

#[derive(Debug)]
pub struct RecordRedirectResult {
	pub record_id: String,
	pub result: Result<RedirectOutcome>,
}

#[derive(Debug, Default)]
pub struct RedirectBatchReport {
	pub records: Vec<RecordRedirectResult>,
	pub redirected: usize,
	pub failed: usize,
}

impl RedirectService {
	/// Redirects earlier incarnations of the record to it and returns the earliest creation date
	/// among them, if any.
	pub async fn perform_redirection(
		&self,
		request: &RedirectRequest,
	) -> Result<Option<OffsetDateTime>> {
		Ok(self.redirect(request).await?.earliest_created_at)
	}

	pub async fn redirect(&self, request: &RedirectRequest) -> Result<RedirectOutcome> {
		if !self.cfg.redirect.enabled {
			tracing::debug!(
				record_id = %request.record.about,
				"Redirection is disabled; skipping."
			);

			return Ok(RedirectOutcome::default());
		}

		self.redirect_record(request)
			.await
			.map_err(|err| Error::redirection(request.record.about.as_str(), err))
	}

	/// Redirects every record in order. A failing record is reported and does not stop the batch.
	pub async fn redirect_batch(&self, requests: &[RedirectRequest]) -> RedirectBatchReport {
		let mut report = RedirectBatchReport::default();

		for request in requests {
			let record_id = request.record.about.to_string();
			let result = self.redirect(request).await;

			match &result {
				Ok(outcome) if outcome.is_redirected() => report.redirected += 1,
				Ok(_) => {},
				Err(err) => {
					report.failed += 1;

					tracing::warn!(
						error = %err,
						record_id = %record_id,
						"Record redirection failed."
					);
				},
			}

			report.records.push(RecordRedirectResult { record_id, result });
		}

		report
	}

	async fn redirect_record(&self, request: &RedirectRequest) -> Result<RedirectOutcome> {
		let about = request.record.about.as_str();
		let Some(query) =
			candidates::build_candidate_query(request, self.cfg.storage.search.max_rows)
		else {
			tracing::debug!(record_id = %about, "Nothing to match previous incarnations on.");

			return Ok(RedirectOutcome::default());
		};

		tracing::debug!(
			record_id = %about,
			query = %query.request.query.render(),
			"Searching for previous incarnations."
		);

		let found = self.index.search(&query.request).await?;
		let Some(confirmed) = disambiguate::disambiguate(found, &query) else {
			return Ok(RedirectOutcome::default());
		};
		let survivors = confirmed.winners;
		let old_ids = survivors.iter().map(|c| c.id.as_str()).collect::<Vec<_>>();
		let ids = std::iter::once(about).chain(old_ids.iter().copied()).collect::<Vec<_>>();
		let _guard =
			rewrite::lock_rewrite(self.locks(), self.store.as_ref(), &ids, &old_ids).await?;

		for survivor in &survivors {
			rewrite::introduce_redirection(
				self.store.as_ref(),
				about,
				&survivor.id,
				request.redirect_date,
			)
			.await?;
		}

		tracing::info!(
			record_id = %about,
			stage = confirmed.stage.as_str(),
			redirected = survivors.len(),
			"Redirected previous incarnations."
		);

		Ok(RedirectOutcome {
			earliest_created_at: survivors.iter().filter_map(|c| c.created_at).min(),
			redirected_from: survivors.into_iter().map(|c| c.id).collect(),
		})
	}
}
