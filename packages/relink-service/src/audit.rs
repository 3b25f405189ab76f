use serde::Serialize;

use crate::{Error, RedirectService, Result};

/// A break of the single-hop redirect graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphViolation {
	SelfRedirect { source_id: String },
	/// `source_id` reaches `target_id` only through `via_id`.
	Chain { source_id: String, via_id: String, target_id: String },
}

impl RedirectService {
	/// Follows at most one redirect. Identifiers without a redirect resolve to themselves.
	pub async fn resolve(&self, id: &str) -> Result<String> {
		if id.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "Record identifier must be non-empty.".to_string(),
			});
		}

		let edges = self.store.find_by_source(id).await?;

		Ok(edges.into_iter().next().map(|edge| edge.target_id).unwrap_or_else(|| id.to_string()))
	}

	pub async fn audit_graph(&self) -> Result<Vec<GraphViolation>> {
		let mut violations = Vec::new();

		for chain in self.store.find_chains().await? {
			let violation = if chain.source_id == chain.via_id {
				GraphViolation::SelfRedirect { source_id: chain.source_id }
			} else {
				GraphViolation::Chain {
					source_id: chain.source_id,
					via_id: chain.via_id,
					target_id: chain.target_id,
				}
			};

			if !violations.contains(&violation) {
				violations.push(violation);
			}
		}

		if !violations.is_empty() {
			tracing::warn!(violations = violations.len(), "Redirect graph is not single-hop.");
		}

		Ok(violations)
	}
}
