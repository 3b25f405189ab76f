use std::time::Duration;

use reqwest::{Client, header::HeaderMap};
use serde_json::Value;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use relink_domain::{SearchCandidate, SearchField, SearchRequest};

use crate::{Error, Result};

/// Client for the select endpoint of a Solr collection.
pub struct SolrIndex {
	client: Client,
	select_url: String,
	headers: HeaderMap,
}
impl SolrIndex {
	pub fn new(cfg: &relink_config::Search) -> Result<Self> {
		if cfg.collection.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: "Search collection must be non-empty.".to_string(),
			});
		}

		let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
		let select_url =
			format!("{}/{}/select", cfg.url.trim_end_matches('/'), cfg.collection.trim());
		let headers = crate::request_headers(cfg.api_key.as_deref(), &cfg.default_headers)?;

		Ok(Self { client, select_url, headers })
	}

	pub fn select_url(&self) -> &str {
		&self.select_url
	}

	pub async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchCandidate>> {
		let mut params = request.to_params();

		params.push(("wt", "json".to_string()));

		tracing::debug!(url = %self.select_url, q = %params[0].1, "Querying search index.");

		let res = self
			.client
			.get(&self.select_url)
			.headers(self.headers.clone())
			.query(&params)
			.send()
			.await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_select_response(json)
	}
}

fn parse_select_response(json: Value) -> Result<Vec<SearchCandidate>> {
	let docs = json
		.get("response")
		.and_then(|response| response.get("docs"))
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Search response is missing response.docs array.".to_string(),
		})?;

	docs.iter().enumerate().map(|(index, doc)| parse_doc(index, doc)).collect()
}

fn parse_doc(index: usize, doc: &Value) -> Result<SearchCandidate> {
	let id = string_values(doc, SearchField::Id).into_iter().next().ok_or_else(|| {
		Error::InvalidResponse { message: format!("Search document {index} has no identifier.") }
	})?;
	let created_at = match string_values(doc, SearchField::Created).first() {
		Some(raw) => Some(OffsetDateTime::parse(raw, &Rfc3339).map_err(|err| {
			Error::InvalidResponse {
				message: format!("Search document {id} has an invalid creation timestamp: {err}."),
			}
		})?),
		None => None,
	};

	Ok(SearchCandidate {
		created_at,
		identifiers: string_values(doc, SearchField::Identifier),
		titles: string_values(doc, SearchField::Title),
		descriptions: string_values(doc, SearchField::Description),
		is_shown_by: string_values(doc, SearchField::IsShownBy),
		id,
	})
}

// Solr returns single-valued fields as scalars and multi-valued fields as arrays.
fn string_values(doc: &Value, field: SearchField) -> Vec<String> {
	match doc.get(field.as_str()) {
		Some(Value::String(value)) => vec![value.clone()],
		Some(Value::Array(values)) =>
			values.iter().filter_map(Value::as_str).map(str::to_string).collect(),
		_ => Vec::new(),
	}
}
