use std::sync::Arc;

use time::macros::datetime;

use super::{
	IndexedRecord, MemoryRedirectStore, MemorySearchIndex, assert_single_hop, build_service, edge,
	record, request, test_config,
};
use relink_config::Redirect;
use relink_service::Error;

#[tokio::test]
async fn redirects_previous_incarnation_and_returns_its_creation_date() {
	let t0 = datetime!(2023-06-01 00:00 UTC);
	let t1 = datetime!(2024-05-01 12:00 UTC);
	let created = datetime!(2019-03-15 08:30 UTC);
	let store = Arc::new(MemoryRedirectStore::with_edges([
		edge("/old/rec1", "/new/rec1", t0),
		edge("/zero/rec1", "/old/rec1", t0),
	]));
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/old/rec1", "old_Paintings").created_at(created),
		IndexedRecord::new("/unrelated/rec1", "unrelated_Maps"),
	]));
	let service = build_service(test_config(), store.clone(), index.clone());
	let date = service
		.perform_redirection(&request(record("/new2/rec1"), &["old"], t1))
		.await
		.expect("Failed to perform redirection.");

	assert_eq!(date, Some(created));
	assert_eq!(store.target_of("/old/rec1").as_deref(), Some("/new2/rec1"));
	assert_eq!(store.target_of("/zero/rec1").as_deref(), Some("/new2/rec1"));
	assert!(store.edges().iter().all(|stored| stored.target_id != "/new/rec1"));
	assert_eq!(
		store
			.edges()
			.into_iter()
			.find(|stored| stored.source_id == "/old/rec1")
			.map(|stored| stored.created_at),
		Some(t1)
	);
	assert_single_hop(&store);
	assert_eq!(index.calls(), 1);
}

#[tokio::test]
async fn record_with_nothing_to_match_never_queries_the_index() {
	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![IndexedRecord::new("/2/a", "2_x")]));
	let service = build_service(test_config(), store.clone(), index.clone());
	let date = service
		.perform_redirection(&request(record("/1/a"), &[" "], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to perform redirection.");

	assert_eq!(date, None);
	assert_eq!(index.calls(), 0);
	assert!(store.edges().is_empty());
}

#[tokio::test]
async fn no_confirmed_candidate_leaves_the_graph_untouched() {
	let mut incoming = record("/1/a");

	incoming.identifiers = vec!["id-1".to_string()];
	incoming.titles = vec!["Mona Lisa".to_string()];

	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/2/b", "2_x").identifiers(&["id-1"]).titles(&["Mona Lisa (detail)"]),
	]));
	let service = build_service(test_config(), store.clone(), index.clone());
	let outcome = service
		.redirect(&request(incoming, &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");

	assert!(!outcome.is_redirected());
	assert_eq!(outcome.earliest_created_at, None);
	assert_eq!(index.calls(), 1);
	assert!(store.edges().is_empty());
}

#[tokio::test]
async fn earliest_date_is_the_minimum_over_all_winners() {
	let early = datetime!(2018-01-01 00:00 UTC);
	let late = datetime!(2021-01-01 00:00 UTC);
	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/2/a", "2_x").created_at(late),
		IndexedRecord::new("/3/a", "3_x").created_at(early),
		IndexedRecord::new("/4/a", "4_x"),
	]));
	let service = build_service(test_config(), store.clone(), index);
	let outcome = service
		.redirect(&request(record("/1/a"), &["2", "3", "4"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");

	assert_eq!(outcome.redirected_from, vec!["/2/a", "/3/a", "/4/a"]);
	assert_eq!(outcome.earliest_created_at, Some(early));

	for source in ["/2/a", "/3/a", "/4/a"] {
		assert_eq!(store.target_of(source).as_deref(), Some("/1/a"));
	}
}

#[tokio::test]
async fn disabled_redirection_touches_nothing() {
	let mut cfg = test_config();

	cfg.redirect = Redirect { enabled: false, lock_shards: 8 };

	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![IndexedRecord::new("/2/a", "2_x")]));
	let service = build_service(cfg, store.clone(), index.clone());
	let date = service
		.perform_redirection(&request(record("/1/a"), &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to perform redirection.");

	assert_eq!(date, None);
	assert_eq!(index.calls(), 0);
	assert!(store.edges().is_empty());
}

#[tokio::test]
async fn query_is_scoped_to_datasets_and_excludes_the_record() {
	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/1/a", "1_x"),
		IndexedRecord::new("/2/a", "2_x"),
		IndexedRecord::new("/2/a", "20_lookalike"),
	]));
	let service = build_service(test_config(), store.clone(), index.clone());
	let outcome = service
		.redirect(&request(record("/1/a"), &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect("Failed to redirect.");
	let sent = index.last_request().expect("Index should have been queried.");

	assert_eq!(outcome.redirected_from, vec!["/2/a"]);
	assert_eq!(sent.rows, 100);
	assert_eq!(
		sent.query.render(),
		r#"edm_datasetName:(1_* OR 2_*) AND europeana_id:("/2/a") AND -europeana_id:("/1/a")"#
	);
}

#[tokio::test]
async fn index_failure_is_wrapped_with_the_record_id() {
	let store = Arc::new(MemoryRedirectStore::default());
	let index = Arc::new(MemorySearchIndex::default());

	index.fail();

	let service = build_service(test_config(), store.clone(), index);
	let err = service
		.perform_redirection(&request(record("/1/a"), &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect_err("Expected redirection failure.");

	match err {
		Error::Redirection { record_id, source } => {
			assert_eq!(record_id, "/1/a");
			assert!(matches!(*source, Error::Search { .. }));
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert!(store.edges().is_empty());
}

#[tokio::test]
async fn store_failure_is_wrapped_with_the_record_id() {
	let store = Arc::new(MemoryRedirectStore::default());

	store.fail_writes();

	let index = Arc::new(MemorySearchIndex::new(vec![IndexedRecord::new("/2/a", "2_x")]));
	let service = build_service(test_config(), store, index);
	let err = service
		.redirect(&request(record("/1/a"), &["2"], datetime!(2024-05-01 12:00 UTC)))
		.await
		.expect_err("Expected redirection failure.");

	assert!(err.to_string().contains("Could not publish the redirection changes"));
	assert!(matches!(
		err,
		Error::Redirection { ref source, .. } if matches!(**source, Error::Storage { .. })
	));
}

#[tokio::test]
async fn close_releases_the_store() {
	let store = Arc::new(MemoryRedirectStore::default());
	let service =
		build_service(test_config(), store.clone(), Arc::new(MemorySearchIndex::default()));

	service.close().await;

	assert!(store.is_closed());
}
