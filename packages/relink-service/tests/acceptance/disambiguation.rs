use std::sync::Arc;

use time::macros::datetime;

use super::{
	IndexedRecord, MemoryRedirectStore, MemorySearchIndex, build_service, record, request,
	test_config,
};

#[tokio::test]
async fn exact_identifier_wins_over_group_matches() {
	let mut incoming = record("/1/a");

	incoming.is_shown_by = vec!["http://example.org/a.jpg".to_string()];
	incoming.titles = vec!["Mona Lisa".to_string()];

	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/3/b", "3_x")
			.is_shown_by(&["http://example.org/a.jpg"])
			.titles(&["Mona Lisa"]),
		IndexedRecord::new("/2/a", "2_x"),
	]));
	let service = build_service(test_config(), store.clone(), index);
	let outcome = service
		.redirect(&request(incoming, &["2", "3"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");

	assert_eq!(outcome.redirected_from, vec!["/2/a"]);
	assert_eq!(store.target_of("/3/b"), None);
}

#[tokio::test]
async fn identifier_and_title_group_beats_shown_by_groups() {
	let mut incoming = record("/1/a");

	incoming.identifiers = vec!["inv-42".to_string()];
	incoming.titles = vec!["Mona Lisa".to_string()];
	incoming.is_shown_by = vec!["http://example.org/a.jpg".to_string()];

	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/2/x", "2_x")
			.is_shown_by(&["http://example.org/a.jpg"])
			.identifiers(&["inv-42"]),
		IndexedRecord::new("/2/y", "2_x").identifiers(&["inv-42"]).titles(&["Mona Lisa"]),
	]));
	let service = build_service(test_config(), store.clone(), index);
	let outcome = service
		.redirect(&request(incoming, &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");

	assert_eq!(outcome.redirected_from, vec!["/2/y"]);
}

#[tokio::test]
async fn shown_by_and_title_group_beats_shown_by_and_identifier() {
	let mut incoming = record("/1/a");

	incoming.identifiers = vec!["inv-42".to_string()];
	incoming.titles = vec!["Mona Lisa".to_string()];
	incoming.is_shown_by = vec!["http://example.org/a.jpg".to_string()];

	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/2/x", "2_x")
			.is_shown_by(&["http://example.org/a.jpg"])
			.identifiers(&["inv-42"])
			.titles(&["La Gioconda"]),
		IndexedRecord::new("/2/y", "2_x")
			.is_shown_by(&["http://example.org/a.jpg"])
			.identifiers(&["inv-7"])
			.titles(&["Mona Lisa"]),
	]));
	let service = build_service(test_config(), store.clone(), index);
	let outcome = service
		.redirect(&request(incoming, &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");

	assert_eq!(outcome.redirected_from, vec!["/2/y"]);
	assert_eq!(store.target_of("/2/y").as_deref(), Some("/1/a"));
	assert_eq!(store.target_of("/2/x"), None);
}

#[tokio::test]
async fn shown_by_and_identifier_is_the_last_resort() {
	let mut incoming = record("/1/a");

	incoming.identifiers = vec!["inv-42".to_string()];
	incoming.is_shown_by = vec!["http://example.org/a.jpg".to_string()];

	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/2/x", "2_x")
			.is_shown_by(&["http://example.org/a.jpg"])
			.identifiers(&["inv-42", "other"]),
		IndexedRecord::new("/2/y", "2_x").is_shown_by(&["http://example.org/a.jpg"]),
	]));
	let service = build_service(test_config(), store.clone(), index);
	let outcome = service
		.redirect(&request(incoming, &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");

	assert_eq!(outcome.redirected_from, vec!["/2/x"]);
	assert_eq!(store.target_of("/2/y"), None);
}

#[tokio::test]
async fn description_resource_matches_when_titles_are_missing() {
	let mut incoming = record("/1/a");

	incoming.identifiers = vec!["inv-42".to_string()];
	incoming.descriptions =
		vec![relink_domain::Description::resource("http://example.org/desc/42")];

	let mut published = IndexedRecord::new("/2/x", "2_x").identifiers(&["inv-42"]);

	published.candidate.descriptions = vec!["http://example.org/desc/42".to_string()];

	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![published]));
	let service = build_service(test_config(), store.clone(), index);
	let outcome = service
		.redirect(&request(incoming, &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");

	assert_eq!(outcome.redirected_from, vec!["/2/x"]);
}
