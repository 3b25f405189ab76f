use relink_domain::{RecordReference, SearchCandidate, SearchField, SearchQuery, SearchRequest};

use crate::redirect::RedirectRequest;

/// Which combination of provider fields a [`MatchGroup`] checks, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchGroupKind {
	/// Identifier plus title, or description when there are no titles.
	IdentifierAndText,
	/// Shown-by resource plus title, or description when there are no titles.
	ShownByAndText,
	ShownByAndIdentifier,
}
impl MatchGroupKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::IdentifierAndText => "identifier_and_text",
			Self::ShownByAndText => "shown_by_and_text",
			Self::ShownByAndIdentifier => "shown_by_and_identifier",
		}
	}
}

/// Fields ANDed together, values ORed within a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
	kind: MatchGroupKind,
	fields: Vec<(SearchField, Vec<String>)>,
}
impl MatchGroup {
	/// `None` when any field has no values.
	pub fn new(kind: MatchGroupKind, fields: Vec<(SearchField, Vec<String>)>) -> Option<Self> {
		if fields.is_empty() || fields.iter().any(|(_, values)| values.is_empty()) {
			return None;
		}

		Some(Self { kind, fields })
	}

	pub fn kind(&self) -> MatchGroupKind {
		self.kind
	}

	pub fn fields(&self) -> &[(SearchField, Vec<String>)] {
		&self.fields
	}

	pub fn to_query(&self) -> SearchQuery {
		let mut children = self
			.fields
			.iter()
			.map(|(field, values)| SearchQuery::AnyOf { field: *field, values: values.clone() })
			.collect::<Vec<_>>();

		if children.len() == 1
			&& let Some(only) = children.pop()
		{
			return only;
		}

		SearchQuery::And(children)
	}

	/// Exact string equality: every field needs at least one shared value.
	pub fn matches(&self, candidate: &SearchCandidate) -> bool {
		self.fields.iter().all(|(field, values)| {
			candidate.values(*field).iter().any(|actual| values.contains(actual))
		})
	}
}

/// Everything needed to fetch and later confirm the prior incarnations of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
	pub request: SearchRequest,
	pub exact_candidate_ids: Vec<String>,
	/// Defined groups only, highest priority first.
	pub groups: Vec<MatchGroup>,
}

/// Builds the candidate query for `request`, or `None` when the record offers nothing to match
/// on.
pub fn build_candidate_query(request: &RedirectRequest, max_rows: u32) -> Option<CandidateQuery> {
	let record = &request.record;
	let dataset_ids = request.dataset_ids();
	let exact_candidate_ids = dataset_ids
		.iter()
		.map(|dataset_id| record.about.in_dataset(dataset_id))
		.collect::<Vec<_>>();
	let groups = match_groups(record);
	let mut matching = Vec::with_capacity(groups.len() + 1);

	if let Some(exact) = SearchQuery::any_of(SearchField::Id, exact_candidate_ids.clone()) {
		matching.push(exact);
	}

	matching.extend(groups.iter().map(MatchGroup::to_query));

	let matching = SearchQuery::or(matching)?;
	let mut prefixes = vec![format!("{}_", record.about.dataset_id())];

	for dataset_id in &dataset_ids {
		let prefix = format!("{dataset_id}_");

		if !prefixes.contains(&prefix) {
			prefixes.push(prefix);
		}
	}

	let scope = SearchQuery::any_prefix(SearchField::DatasetName, prefixes)?;
	let not_self = SearchQuery::any_of(SearchField::Id, vec![record.about.to_string()])?.negate();
	let query = SearchQuery::and(vec![scope, matching, not_self])?;

	Some(CandidateQuery {
		request: SearchRequest {
			query,
			fields: SearchField::PROJECTION.to_vec(),
			rows: max_rows,
		},
		exact_candidate_ids,
		groups,
	})
}

fn match_groups(record: &RecordReference) -> Vec<MatchGroup> {
	let identifiers = record.matching_identifiers();
	let is_shown_by = record.matching_is_shown_by();
	let text = text_field(record);

	[
		MatchGroup::new(
			MatchGroupKind::IdentifierAndText,
			vec![(SearchField::Identifier, identifiers.clone()), text.clone()],
		),
		MatchGroup::new(
			MatchGroupKind::ShownByAndText,
			vec![(SearchField::IsShownBy, is_shown_by.clone()), text],
		),
		MatchGroup::new(
			MatchGroupKind::ShownByAndIdentifier,
			vec![(SearchField::IsShownBy, is_shown_by), (SearchField::Identifier, identifiers)],
		),
	]
	.into_iter()
	.flatten()
	.collect()
}

// Titles win; descriptions only stand in when the record has no usable title.
fn text_field(record: &RecordReference) -> (SearchField, Vec<String>) {
	let titles = record.matching_titles();

	if titles.is_empty() {
		(SearchField::Description, record.matching_descriptions())
	} else {
		(SearchField::Title, titles)
	}
}
