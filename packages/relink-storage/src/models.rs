use time::OffsetDateTime;

/// One persisted redirect: `source_id` was retired in favour of `target_id`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RedirectEdge {
	pub source_id: String,
	pub target_id: String,
	pub created_at: OffsetDateTime,
}
impl RedirectEdge {
	pub fn new(
		source_id: impl Into<String>,
		target_id: impl Into<String>,
		created_at: OffsetDateTime,
	) -> Self {
		Self { source_id: source_id.into(), target_id: target_id.into(), created_at }
	}
}

/// Two edges forming `source_id -> via_id -> target_id`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RedirectChain {
	pub source_id: String,
	pub via_id: String,
	pub target_id: String,
}
