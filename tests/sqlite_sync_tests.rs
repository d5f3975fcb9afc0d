mod common;

use common::sqlite_pool;
use sqlsync::db::SqliteObjectStore;
use sqlsync::resources::embedded;
use sqlsync::sync::{self, cancel_pair};
use sqlsync::{
    Backend, CancelSignal, ConfigError, DatabaseInitializer, DbPool, ObjectKind, ObjectStore,
    ResourceBundle, SyncError, SyncService,
};

async fn view_names(pool: &DbPool) -> Vec<String> {
    let mut store = pool.object_store(None).await.unwrap();
    store
        .list_objects(ObjectKind::View)
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.to_string())
        .collect()
}

async fn execute(pool: &DbPool, sql: &str) {
    let mut store = pool.object_store(None).await.unwrap();
    store.execute(sql).await.unwrap();
}

#[tokio::test]
async fn test_connect_rejects_unknown_scheme() {
    let err = DbPool::connect("mysql://root@localhost/app", 1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::Config(ConfigError::UnsupportedBackend { ref scheme }) if scheme == "mysql"
    ));
}

#[tokio::test]
async fn test_embedded_views_create_then_alter() {
    let (_dir, pool) = sqlite_pool().await;
    assert_eq!(pool.backend(), Backend::Sqlite);
    pool.apply_bootstrap_schema().await.unwrap();

    let service = SyncService::default();
    let bundle = embedded::sqlite();
    let cancel = CancelSignal::never();

    let first = service
        .sync_pool(&pool, &bundle, &ObjectKind::ALL, &cancel)
        .await
        .unwrap();
    assert_eq!(first.kinds.len(), 1, "sqlite only syncs views");
    let views = first.kind(ObjectKind::View).unwrap();
    assert_eq!(views.created, 2);
    assert_eq!(views.errors, 0);
    assert_eq!(
        view_names(&pool).await,
        vec!["main.active_users", "main.user_dashboard_counts"]
    );

    let second = service
        .sync_pool(&pool, &bundle, &ObjectKind::ALL, &cancel)
        .await
        .unwrap();
    assert_eq!(second.total.altered, 2);
    assert_eq!(second.total.created, 0);
    assert_eq!(second.total.dropped, 0);

    pool.close().await;
}

#[tokio::test]
async fn test_stale_view_is_dropped() {
    let (_dir, pool) = sqlite_pool().await;
    pool.apply_bootstrap_schema().await.unwrap();
    execute(&pool, "CREATE VIEW legacy_users AS SELECT id FROM users").await;

    let report = SyncService::default()
        .sync_pool(
            &pool,
            &embedded::sqlite(),
            &[ObjectKind::View],
            &CancelSignal::never(),
        )
        .await
        .unwrap();

    assert_eq!(report.total.dropped, 1);
    assert_eq!(report.total.created, 2);
    assert!(!view_names(&pool).await.contains(&"main.legacy_users".to_string()));
}

#[tokio::test]
async fn test_borrowed_connection_stays_open_after_sync() {
    let (_dir, pool) = sqlite_pool().await;
    pool.apply_bootstrap_schema().await.unwrap();
    let DbPool::Sqlite(sqlite) = &pool else {
        panic!("expected a SQLite pool");
    };

    let mut conn = sqlite.acquire().await.unwrap();
    sqlx::query("CREATE TEMP TABLE session_marker (id INTEGER)")
        .execute(&mut *conn)
        .await
        .unwrap();

    {
        let mut store = SqliteObjectStore::borrowed(&mut *conn);
        let result = SyncService::default()
            .sync_views(&mut store, &embedded::sqlite(), &CancelSignal::never())
            .await
            .unwrap();
        assert_eq!(result.created, 2);
        assert_eq!(result.errors, 0);
    }

    // Temp tables are per connection, so this only succeeds on the same open session.
    let markers: i64 = sqlx::query_scalar("SELECT count(*) FROM session_marker")
        .fetch_one(&mut *conn)
        .await
        .unwrap();
    assert_eq!(markers, 0);

    let views: i64 =
        sqlx::query_scalar("SELECT count(*) FROM sqlite_master WHERE type = 'view'")
            .fetch_one(&mut *conn)
            .await
            .unwrap();
    assert_eq!(views, 2);
}

#[tokio::test]
async fn test_broken_view_is_counted_and_others_still_apply() {
    let (_dir, pool) = sqlite_pool().await;
    pool.apply_bootstrap_schema().await.unwrap();
    let bundle = embedded::sqlite().with(
        "Views.main.broken.sql",
        "CREATE VIEW main.broken AS SELEC 1 FROM users",
    );

    let report = SyncService::default()
        .sync_pool(&pool, &bundle, &[ObjectKind::View], &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(report.total.errors, 1);
    assert_eq!(report.total.created, 2);
    assert!(report.total.ensure_clean().is_err());
}

#[tokio::test]
async fn test_procedures_rejected_on_sqlite() {
    let (_dir, pool) = sqlite_pool().await;
    let bundle = ResourceBundle::new().with(
        "StoredProcedures.main.do_work.sql",
        "CREATE PROCEDURE main.do_work AS SELECT 1",
    );

    let err = SyncService::default()
        .sync_pool(&pool, &bundle, &ObjectKind::ALL, &CancelSignal::never())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Config(ConfigError::UnsupportedObjectKind {
            backend: Backend::Sqlite,
            kind: ObjectKind::Procedure,
        })
    ));
}

#[tokio::test]
async fn test_resources_from_directory() {
    let (_dir, pool) = sqlite_pool().await;
    pool.apply_bootstrap_schema().await.unwrap();

    let resources = tempfile::tempdir().unwrap();
    let views = resources.path().join("Views");
    std::fs::create_dir_all(&views).unwrap();
    std::fs::write(
        views.join("main.user_emails.sql"),
        "CREATE VIEW main.user_emails AS SELECT email FROM users",
    )
    .unwrap();

    let bundle = ResourceBundle::from_dir(resources.path()).await.unwrap();
    let report = SyncService::default()
        .sync_pool(&pool, &bundle, &[ObjectKind::View], &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(report.total.created, 1);
    assert_eq!(view_names(&pool).await, vec!["main.user_emails"]);
}

#[tokio::test]
async fn test_initializer_runs_once() {
    let (_dir, pool) = sqlite_pool().await;
    let initializer =
        DatabaseInitializer::new(pool.clone(), embedded::sqlite(), SyncService::default());
    let cancel = CancelSignal::never();

    assert!(!initializer.is_initialized().await);
    let report = initializer
        .ensure_initialized(&cancel)
        .await
        .unwrap()
        .expect("first call initializes");
    assert_eq!(report.total.created, 2);
    assert!(initializer.is_initialized().await);

    let again = initializer.ensure_initialized(&cancel).await.unwrap();
    assert!(again.is_none());
    assert_eq!(view_names(&pool).await.len(), 2);
}

#[tokio::test]
async fn test_initializer_stays_uninitialized_after_cancel() {
    let (_dir, pool) = sqlite_pool().await;
    let initializer = DatabaseInitializer::new(pool, embedded::sqlite(), SyncService::default());
    let (handle, signal) = cancel_pair();
    handle.cancel();

    let err = initializer.ensure_initialized(&signal).await.unwrap_err();
    assert!(matches!(err, SyncError::Cancelled));
    assert!(!initializer.is_initialized().await);
}

#[tokio::test]
async fn test_actor_serializes_runs() {
    let (_dir, pool) = sqlite_pool().await;
    pool.apply_bootstrap_schema().await.unwrap();
    let handle = sync::spawn(pool, embedded::sqlite(), SyncService::default())
        .await
        .unwrap();

    let other = handle.clone();
    let (a, b) = tokio::join!(
        handle.sync_all(CancelSignal::never()),
        other.sync_kinds(vec![ObjectKind::View], CancelSignal::never()),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.total.created + b.total.created, 2);
    assert_eq!(a.total.altered + b.total.altered, 2);
    assert_eq!(a.total.errors + b.total.errors, 0);

    let views = handle
        .sync_kind(ObjectKind::View, CancelSignal::never())
        .await
        .unwrap();
    assert_eq!(views.altered, 2);

    handle.stop();
}
