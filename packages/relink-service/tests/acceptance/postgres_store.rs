use std::sync::Arc;

use time::macros::datetime;

use super::{IndexedRecord, MemorySearchIndex, edge, record, request, test_config};
use relink_config::Postgres;
use relink_service::{GraphViolation, PgRedirectStore, RedirectService, RedirectStore};
use relink_storage::db::Db;
use relink_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external Postgres. Set RELINK_PG_DSN to run."]
async fn postgres_store_collapses_chains_end_to_end() {
	let Some(base_dsn) = relink_testkit::env_dsn() else {
		eprintln!("Skipping postgres_store_collapses_chains_end_to_end; set RELINK_PG_DSN to run.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let mut cfg = test_config();

	cfg.storage.postgres = Postgres { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };

	let store = Arc::new(
		PgRedirectStore::connect(&cfg.storage.postgres)
			.await
			.expect("Failed to connect redirect store."),
	);
	let t0 = datetime!(2023-06-01 00:00 UTC);
	let t1 = datetime!(2024-05-01 12:00 UTC);
	let created = datetime!(2019-03-15 08:30 UTC);

	store.upsert(&edge("/old/rec1", "/new/rec1", t0)).await.expect("Failed to seed redirect.");

	let index = Arc::new(MemorySearchIndex::new(vec![
		IndexedRecord::new("/old/rec1", "old_Paintings").created_at(created),
	]));
	let service = RedirectService::with_backends(cfg, store.clone(), index);
	let date = service
		.perform_redirection(&request(record("/new2/rec1"), &["old"], t1))
		.await
		.expect("Failed to perform redirection.");

	assert_eq!(date, Some(created));
	assert_eq!(service.resolve("/old/rec1").await.expect("Failed to resolve."), "/new2/rec1");
	assert!(
		store.find_by_target("/new/rec1").await.expect("Failed to query redirects.").is_empty()
	);
	assert_eq!(
		service.audit_graph().await.expect("Failed to audit graph."),
		Vec::<GraphViolation>::new()
	);

	service.close().await;
	test_db.cleanup().await.expect("Failed to cleanup test database.");
}

#[tokio::test]
#[ignore = "Requires external Postgres. Set RELINK_PG_DSN to run."]
async fn shared_pool_stays_open_after_close() {
	let Some(base_dsn) = relink_testkit::env_dsn() else {
		eprintln!("Skipping shared_pool_stays_open_after_close; set RELINK_PG_DSN to run.");

		return;
	};

	relink_testkit::with_test_db(&base_dsn, |test_db| {
		let dsn = test_db.dsn().to_string();

		async move {
			let db = Db::connect(&Postgres { dsn, pool_max_conns: 2 })
				.await
				.expect("Failed to connect to Postgres.");

			db.ensure_schema().await.expect("Failed to ensure schema.");

			let pool = db.pool.clone();
			let store = PgRedirectStore::new(db);

			store.close().await;

			assert!(!pool.is_closed());

			pool.close().await;

			Ok(())
		}
	})
	.await
	.expect("Failed to run test database scenario.");
}
