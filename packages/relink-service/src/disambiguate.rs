use relink_domain::SearchCandidate;

use crate::candidates::{CandidateQuery, MatchGroup, MatchGroupKind};

/// The matcher that confirmed a set of candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStage {
	ExactId,
	Group(MatchGroupKind),
}
impl MatchStage {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::ExactId => "exact_id",
			Self::Group(kind) => kind.as_str(),
		}
	}
}

enum Matcher<'a> {
	ExactId(&'a [String]),
	Group(&'a MatchGroup),
}
impl Matcher<'_> {
	fn stage(&self) -> MatchStage {
		match self {
			Self::ExactId(_) => MatchStage::ExactId,
			Self::Group(group) => MatchStage::Group(group.kind()),
		}
	}

	fn accepts(&self, candidate: &SearchCandidate) -> bool {
		match self {
			Self::ExactId(ids) => ids.contains(&candidate.id),
			Self::Group(group) => group.matches(candidate),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disambiguation {
	pub stage: MatchStage,
	pub winners: Vec<SearchCandidate>,
}

/// Filters the approximate index hits down to the confirmed prior incarnations.
///
/// Matchers run in priority order (exact ids, then each defined group) and the first one that
/// accepts any candidate decides the result. Winners of different matchers are never combined.
pub fn disambiguate(
	candidates: Vec<SearchCandidate>,
	query: &CandidateQuery,
) -> Option<Disambiguation> {
	if candidates.is_empty() {
		return None;
	}

	let matchers = std::iter::once(Matcher::ExactId(&query.exact_candidate_ids))
		.chain(query.groups.iter().map(Matcher::Group));

	for matcher in matchers {
		let winners = candidates
			.iter()
			.filter(|candidate| matcher.accepts(candidate))
			.cloned()
			.collect::<Vec<_>>();

		if !winners.is_empty() {
			tracing::debug!(
				stage = matcher.stage().as_str(),
				winners = winners.len(),
				candidates = candidates.len(),
				"Confirmed redirection candidates."
			);

			return Some(Disambiguation { stage: matcher.stage(), winners });
		}
	}

	tracing::debug!(candidates = candidates.len(), "No candidate survived disambiguation.");

	None
}
