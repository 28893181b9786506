use std::path::Path;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    db::Database,
    error::Result,
    geo,
    model::MapPoint,
    query::QueryEngine,
    store::AssociationStore,
};

/// Store and query engine over one shared database handle, plus the
/// coordinate-based helpers that renderers and the CLI consume.
#[derive(Debug, Clone)]
pub struct CityMap {
    store: AssociationStore,
    query: QueryEngine,
}

impl CityMap {
    pub fn new(db: Database) -> Self {
        Self {
            store: AssociationStore::new(db.clone()),
            query: QueryEngine::new(db),
        }
    }

    /// Open the database at `path` and make sure the link table exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let map = Self::new(Database::connect(path).await?);
        map.store.ensure_schema().await?;
        Ok(map)
    }

    pub fn store(&self) -> &AssociationStore {
        &self.store
    }

    pub fn query(&self) -> &QueryEngine {
        &self.query
    }

    /// Points to plot for a user's selection, in selection order.
    pub async fn map_points(&self, user_id: i64) -> Result<Vec<MapPoint>> {
        self.store.list_points(user_id).await
    }

    /// Great-circle distance in km, or `None` if either city is unknown.
    pub async fn distance_km(&self, from: &str, to: &str) -> Result<Option<f64>> {
        let from = self.query.coordinates(from).await?;
        let to = self.query.coordinates(to).await?;
        let (Some(a), Some(b)) = (from, to) else {
            return Ok(None);
        };
        Ok(Some(geo::distance_km(a, b)))
    }

    pub async fn local_time(
        &self,
        city_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<DateTime<Tz>>> {
        let coords = self.query.coordinates(city_name).await?;
        Ok(coords.map(|c| geo::local_time(c, now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{WORLD, catalog_db};
    use chrono::{TimeZone, Timelike};

    async fn city_map() -> (crate::test_support::TestDb, CityMap) {
        let test_db = catalog_db(WORLD).await;
        let map = CityMap::new(test_db.db.clone());
        map.store().ensure_schema().await.unwrap();
        (test_db, map)
    }

    #[tokio::test]
    async fn open_creates_link_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cities.db");
        CityMap::open(&path).await.unwrap();

        let db = Database::connect(&path).await.unwrap();

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='users_cities')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();
        assert!(exists);
    }

    #[tokio::test]
    async fn map_points_follow_selection_order() {
        let (_db, map) = city_map().await;
        map.store().add_city(1, "Paris").await.unwrap();
        map.store().add_city(1, "Tokyo").await.unwrap();

        let points = map.map_points(1).await.unwrap();
        let names: Vec<_> = points.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Paris", "Tokyo"]);
        assert_eq!(points[0].coordinates.lat, 48.8566);
        assert!(map.map_points(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn distance_needs_both_cities() {
        let (_db, map) = city_map().await;

        let d = map.distance_km("Paris", "London").await.unwrap().expect("both known");
        assert!((d - 343.5).abs() < 5.0);
        assert!(map.distance_km("Paris", "Atlantis").await.unwrap().is_none());
        assert!(map.distance_km("Atlantis", "Paris").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn local_time_uses_city_timezone() {
        let (_db, map) = city_map().await;
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        let tokyo = map.local_time("Tokyo", now).await.unwrap().expect("Tokyo known");
        assert_eq!(tokyo.hour(), 21);
        assert!(map.local_time("Atlantis", now).await.unwrap().is_none());
    }
}
