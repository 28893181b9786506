use crate::{
    db::Database,
    error::Result,
    model::{Coordinates, MapPoint},
};

const LINK_SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS users_cities (
    user_id INTEGER NOT NULL,
    city_id INTEGER NOT NULL
)";

/// Records which users selected which catalog cities.
///
/// Links are only ever created for names that resolve in the catalog. The
/// same pair may be stored more than once; every insert is kept.
#[derive(Debug, Clone)]
pub struct AssociationStore {
    db: Database,
}

impl AssociationStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create the link table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(LINK_SCHEMA_SQL).execute(self.db.pool()).await?;
        Ok(())
    }

    /// Link `city_name` to `user_id`. Returns `false` without writing anything
    /// when the catalog has no city by that exact name.
    ///
    /// The lookup and the insert are one statement, so no reader ever observes
    /// a link whose catalog check ran separately. Duplicate catalog names
    /// resolve to the lowest id.
    pub async fn add_city(&self, user_id: i64, city_name: &str) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO users_cities (user_id, city_id)
             SELECT ?, id FROM cities WHERE city = ? ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .bind(city_name)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Names of every city linked to `user_id`, in the order they were added.
    pub async fn list_cities(&self, user_id: i64) -> Result<Vec<String>> {
        let names = sqlx::query_scalar(
            "SELECT cities.city
             FROM users_cities
             JOIN cities ON users_cities.city_id = cities.id
             WHERE users_cities.user_id = ?
             ORDER BY users_cities.rowid",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(names)
    }

    /// The linked catalog rows of `user_id` with their coordinates, in the
    /// order they were added. One query, joined on the stored city id.
    pub async fn list_points(&self, user_id: i64) -> Result<Vec<MapPoint>> {
        let rows = sqlx::query_as::<_, (String, f64, f64)>(
            "SELECT cities.city, CAST(cities.lat AS REAL), CAST(cities.lng AS REAL)
             FROM users_cities
             JOIN cities ON users_cities.city_id = cities.id
             WHERE users_cities.user_id = ?
             ORDER BY users_cities.rowid",
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let points = rows
            .into_iter()
            .map(|(name, lat, lng)| MapPoint {
                name,
                coordinates: Coordinates::new(lat, lng),
            })
            .collect();
        Ok(points)
    }
}
