use sqlx::PgConnection;

use crate::{
	Error, Result,
	models::{RedirectChain, RedirectEdge},
};

pub async fn find_by_source(
	executor: &mut PgConnection,
	source_id: &str,
) -> Result<Vec<RedirectEdge>> {
	let rows = sqlx::query_as::<_, RedirectEdge>(
		"\
SELECT source_id, target_id, created_at
FROM record_redirects
WHERE source_id = $1",
	)
	.bind(source_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn find_by_target(
	executor: &mut PgConnection,
	target_id: &str,
) -> Result<Vec<RedirectEdge>> {
	let rows = sqlx::query_as::<_, RedirectEdge>(
		"\
SELECT source_id, target_id, created_at
FROM record_redirects
WHERE target_id = $1
ORDER BY source_id",
	)
	.bind(target_id)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

/// Inserts the edge, replacing any edge already stored for its source.
pub async fn upsert(executor: &mut PgConnection, edge: &RedirectEdge) -> Result<()> {
	validate_edge(edge)?;

	sqlx::query(
		"\
INSERT INTO record_redirects (source_id, target_id, created_at)
VALUES ($1, $2, $3)
ON CONFLICT (source_id) DO UPDATE
SET
	target_id = EXCLUDED.target_id,
	created_at = EXCLUDED.created_at",
	)
	.bind(edge.source_id.as_str())
	.bind(edge.target_id.as_str())
	.bind(edge.created_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Deletes the edge matching both endpoints. Returns the number of rows removed.
pub async fn delete(executor: &mut PgConnection, edge: &RedirectEdge) -> Result<u64> {
	let result = sqlx::query(
		"\
DELETE FROM record_redirects
WHERE source_id = $1 AND target_id = $2",
	)
	.bind(edge.source_id.as_str())
	.bind(edge.target_id.as_str())
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

pub async fn find_chains(executor: &mut PgConnection) -> Result<Vec<RedirectChain>> {
	let rows = sqlx::query_as::<_, RedirectChain>(
		"\
SELECT
	head.source_id,
	head.target_id AS via_id,
	tail.target_id
FROM record_redirects head
JOIN record_redirects tail ON tail.source_id = head.target_id
ORDER BY head.source_id",
	)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

fn validate_edge(edge: &RedirectEdge) -> Result<()> {
	if edge.source_id.trim().is_empty() || edge.target_id.trim().is_empty() {
		return Err(Error::InvalidArgument(
			"Redirect source and target must be non-empty.".to_string(),
		));
	}
	if edge.source_id == edge.target_id {
		return Err(Error::InvalidArgument(format!(
			"Redirect source {} must not point to itself.",
			edge.source_id
		)));
	}

	Ok(())
}
