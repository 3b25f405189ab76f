use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, non_blank};

/// Composite record identifier, `datasetId/localId`.
///
/// Harvested identifiers usually carry a leading slash (`/datasetId/localId`). Both spellings
/// parse, and identifiers derived from a parsed id keep its convention so they compare equal to
/// what the index stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId {
	about: String,
	dataset_id: String,
	local_id: String,
	leading_slash: bool,
}
impl RecordId {
	pub fn parse(raw: &str) -> Result<Self> {
		let about = raw.trim();
		let (leading_slash, rest) = match about.strip_prefix('/') {
			Some(rest) => (true, rest),
			None => (false, about),
		};
		let Some((dataset_id, local_id)) = rest.split_once('/') else {
			return Err(Error::InvalidRecordId {
				id: raw.to_string(),
				reason: "expected datasetId/localId".to_string(),
			});
		};

		if dataset_id.trim().is_empty() {
			return Err(Error::InvalidRecordId {
				id: raw.to_string(),
				reason: "dataset id must not be empty".to_string(),
			});
		}
		if local_id.trim().is_empty() {
			return Err(Error::InvalidRecordId {
				id: raw.to_string(),
				reason: "local id must not be empty".to_string(),
			});
		}

		Ok(Self {
			about: about.to_string(),
			dataset_id: dataset_id.to_string(),
			local_id: local_id.to_string(),
			leading_slash,
		})
	}

	pub fn as_str(&self) -> &str {
		&self.about
	}

	pub fn dataset_id(&self) -> &str {
		&self.dataset_id
	}

	pub fn local_id(&self) -> &str {
		&self.local_id
	}

	/// The identifier this record would have had in `dataset_id`.
	pub fn in_dataset(&self, dataset_id: &str) -> String {
		if self.leading_slash {
			format!("/{dataset_id}/{}", self.local_id)
		} else {
			format!("{dataset_id}/{}", self.local_id)
		}
	}
}
impl Display for RecordId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.about)
	}
}
impl TryFrom<String> for RecordId {
	type Error = Error;

	fn try_from(value: String) -> Result<Self> {
		Self::parse(&value)
	}
}
impl From<RecordId> for String {
	fn from(id: RecordId) -> Self {
		id.about
	}
}

/// A provider description: literal text, or a reference to a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
	pub text: Option<String>,
	pub resource: Option<String>,
}
impl Description {
	pub fn literal(text: impl Into<String>) -> Self {
		Self { text: Some(text.into()), resource: None }
	}

	pub fn resource(uri: impl Into<String>) -> Self {
		Self { text: None, resource: Some(uri.into()) }
	}

	/// Text wins over the resource; blank values count as absent.
	pub fn matching_value(&self) -> Option<&str> {
		self.text
			.as_deref()
			.and_then(non_blank)
			.or_else(|| self.resource.as_deref().and_then(non_blank))
	}
}

/// The incoming record as seen by redirection: its identifier plus the provider proxy fields used
/// to recognise earlier incarnations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordReference {
	pub about: RecordId,
	#[serde(default)]
	pub identifiers: Vec<String>,
	#[serde(default)]
	pub titles: Vec<String>,
	#[serde(default)]
	pub descriptions: Vec<Description>,
	#[serde(default)]
	pub is_shown_by: Vec<String>,
}
impl RecordReference {
	pub fn new(about: RecordId) -> Self {
		Self {
			about,
			identifiers: Vec::new(),
			titles: Vec::new(),
			descriptions: Vec::new(),
			is_shown_by: Vec::new(),
		}
	}

	pub fn matching_identifiers(&self) -> Vec<String> {
		collect_non_blank(self.identifiers.iter().map(String::as_str))
	}

	pub fn matching_titles(&self) -> Vec<String> {
		collect_non_blank(self.titles.iter().map(String::as_str))
	}

	pub fn matching_descriptions(&self) -> Vec<String> {
		collect_non_blank(self.descriptions.iter().filter_map(Description::matching_value))
	}

	pub fn matching_is_shown_by(&self) -> Vec<String> {
		collect_non_blank(self.is_shown_by.iter().map(String::as_str))
	}
}

fn collect_non_blank<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
	values.filter_map(non_blank).map(str::to_string).collect()
}
