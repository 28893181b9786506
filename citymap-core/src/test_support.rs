//! Catalog fixtures for tests. The crate itself never provisions `cities`.

use tempfile::TempDir;

use crate::db::Database;

pub(crate) const CATALOG_SQL: &str = "CREATE TABLE cities (
    id INTEGER PRIMARY KEY,
    city TEXT NOT NULL,
    country TEXT NOT NULL,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    density REAL NOT NULL
)";

/// `(name, country, lat, lng, density)`
pub(crate) type CatalogRow = (&'static str, &'static str, f64, f64, f64);

pub(crate) const WORLD: &[CatalogRow] = &[
    ("Tokyo", "Japan", 35.6897, 139.6922, 6000.0),
    ("Osaka", "Japan", 34.6939, 135.5022, 4000.0),
    ("Paris", "France", 48.8566, 2.3522, 20000.0),
    ("Lyon", "France", 45.7600, 4.8400, 11000.0),
    ("London", "United Kingdom", 51.5072, -0.1275, 5000.0),
    ("New York", "United States", 40.6943, -73.9249, 7000.0),
];

/// Keeps the temporary directory alive for as long as the database is used.
pub(crate) struct TestDb {
    pub db: Database,
    _dir: TempDir,
}

pub(crate) async fn empty_db() -> TestDb {
    let dir = tempfile::tempdir().expect("temp dir");
    let db = Database::connect(dir.path().join("cities.db")).await.expect("open database");
    TestDb { db, _dir: dir }
}

pub(crate) async fn catalog_db(rows: &[CatalogRow]) -> TestDb {
    let test_db = empty_db().await;
    sqlx::query(CATALOG_SQL).execute(test_db.db.pool()).await.expect("create catalog");
    for row in rows {
        insert_city(&test_db.db, *row).await;
    }
    test_db
}

pub(crate) async fn insert_city(db: &Database, (name, country, lat, lng, density): CatalogRow) {
    sqlx::query("INSERT INTO cities (city, country, lat, lng, density) VALUES (?, ?, ?, ?, ?)")
        .bind(name)
        .bind(country)
        .bind(lat)
        .bind(lng)
        .bind(density)
        .execute(db.pool())
        .await
        .expect("insert catalog row");
}
