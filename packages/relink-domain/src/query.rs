use serde::{Deserialize, Serialize};

/// Search index fields the redirection queries read or filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
	Id,
	Created,
	Identifier,
	Title,
	Description,
	IsShownBy,
	DatasetName,
}
impl SearchField {
	/// Fields returned for every candidate.
	pub const PROJECTION: [Self; 6] =
		[Self::Id, Self::Created, Self::Identifier, Self::Title, Self::Description, Self::IsShownBy];

	/// Field name in the published record schema.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Id => "europeana_id",
			Self::Created => "timestamp_created",
			Self::Identifier => "proxy_dc_identifier",
			Self::Title => "proxy_dc_title",
			Self::Description => "proxy_dc_description",
			Self::IsShownBy => "provider_aggregation_edm_isShownBy",
			Self::DatasetName => "edm_datasetName",
		}
	}
}

/// Anything a query can be evaluated against.
pub trait FieldValues {
	fn field_values(&self, field: SearchField) -> Vec<&str>;
}

/// Boolean query over [`SearchField`]s.
///
/// Rendered into the Lucene standard syntax for the remote index, and evaluable in memory so the
/// same query drives index doubles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchQuery {
	AnyOf { field: SearchField, values: Vec<String> },
	AnyPrefix { field: SearchField, prefixes: Vec<String> },
	And(Vec<SearchQuery>),
	Or(Vec<SearchQuery>),
	Not(Box<SearchQuery>),
}
impl SearchQuery {
	/// `None` when there is nothing to match on.
	pub fn any_of(field: SearchField, values: Vec<String>) -> Option<Self> {
		if values.is_empty() { None } else { Some(Self::AnyOf { field, values }) }
	}

	pub fn any_prefix(field: SearchField, prefixes: Vec<String>) -> Option<Self> {
		if prefixes.is_empty() { None } else { Some(Self::AnyPrefix { field, prefixes }) }
	}

	/// Collapses to the only child, and to `None` when there are no children.
	pub fn and(mut children: Vec<Self>) -> Option<Self> {
		match children.len() {
			0 => None,
			1 => children.pop(),
			_ => Some(Self::And(children)),
		}
	}

	pub fn or(mut children: Vec<Self>) -> Option<Self> {
		match children.len() {
			0 => None,
			1 => children.pop(),
			_ => Some(Self::Or(children)),
		}
	}

	pub fn negate(self) -> Self {
		Self::Not(Box::new(self))
	}

	pub fn render(&self) -> String {
		match self {
			Self::AnyOf { field, values } => format!(
				"{}:({})",
				field.as_str(),
				values.iter().map(|value| quote_phrase(value)).collect::<Vec<_>>().join(" OR ")
			),
			Self::AnyPrefix { field, prefixes } => format!(
				"{}:({})",
				field.as_str(),
				prefixes
					.iter()
					.map(|prefix| format!("{}*", escape_query_chars(prefix)))
					.collect::<Vec<_>>()
					.join(" OR ")
			),
			Self::And(children) =>
				children.iter().map(Self::render_operand).collect::<Vec<_>>().join(" AND "),
			Self::Or(children) =>
				children.iter().map(Self::render_operand).collect::<Vec<_>>().join(" OR "),
			Self::Not(child) => format!("-{}", child.render_operand()),
		}
	}

	pub fn evaluate<T>(&self, doc: &T) -> bool
	where
		T: FieldValues + ?Sized,
	{
		match self {
			Self::AnyOf { field, values } => doc
				.field_values(*field)
				.into_iter()
				.any(|actual| values.iter().any(|value| value == actual)),
			Self::AnyPrefix { field, prefixes } => doc
				.field_values(*field)
				.into_iter()
				.any(|actual| prefixes.iter().any(|prefix| actual.starts_with(prefix.as_str()))),
			Self::And(children) => children.iter().all(|child| child.evaluate(doc)),
			Self::Or(children) => children.iter().any(|child| child.evaluate(doc)),
			Self::Not(child) => !child.evaluate(doc),
		}
	}

	fn render_operand(&self) -> String {
		match self {
			Self::And(children) | Self::Or(children) if children.len() > 1 =>
				format!("({})", self.render()),
			_ => self.render(),
		}
	}
}

fn quote_phrase(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);

	out.push('"');

	for ch in value.chars() {
		if matches!(ch, '\\' | '"') {
			out.push('\\');
		}

		out.push(ch);
	}

	out.push('"');

	out
}

fn escape_query_chars(value: &str) -> String {
	let mut out = String::with_capacity(value.len());

	for ch in value.chars() {
		if ch.is_whitespace()
			|| matches!(
				ch,
				'\\' | '+'
					| '-' | '!' | '(' | ')'
					| ':' | '^' | '[' | ']'
					| '"' | '{' | '}' | '~'
					| '*' | '?' | '|' | '&'
					| ';' | '/'
			) {
			out.push('\\');
		}

		out.push(ch);
	}

	out
}
