use time::OffsetDateTime;

use crate::query::{FieldValues, SearchField, SearchQuery};

/// A published record returned by the search index. Not yet confirmed as a match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchCandidate {
	pub id: String,
	pub created_at: Option<OffsetDateTime>,
	pub identifiers: Vec<String>,
	pub titles: Vec<String>,
	pub descriptions: Vec<String>,
	pub is_shown_by: Vec<String>,
}
impl SearchCandidate {
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into(), ..Default::default() }
	}

	pub fn values(&self, field: SearchField) -> &[String] {
		match field {
			SearchField::Id => std::slice::from_ref(&self.id),
			SearchField::Identifier => &self.identifiers,
			SearchField::Title => &self.titles,
			SearchField::Description => &self.descriptions,
			SearchField::IsShownBy => &self.is_shown_by,
			SearchField::Created | SearchField::DatasetName => &[],
		}
	}
}
impl FieldValues for SearchCandidate {
	fn field_values(&self, field: SearchField) -> Vec<&str> {
		self.values(field).iter().map(String::as_str).collect()
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
	pub query: SearchQuery,
	pub fields: Vec<SearchField>,
	pub rows: u32,
}
impl SearchRequest {
	/// Request parameters in the form the index's select endpoint takes them.
	pub fn to_params(&self) -> Vec<(&'static str, String)> {
		vec![
			("q", self.query.render()),
			(
				"fl",
				self.fields.iter().map(SearchField::as_str).collect::<Vec<_>>().join(","),
			),
			("rows", self.rows.to_string()),
		]
	}
}
