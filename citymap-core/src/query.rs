use crate::{
    db::Database,
    error::Result,
    model::{City, Coordinates, DensityRange},
};

/// Read-only lookups over the `cities` catalog.
///
/// The catalog's column affinities are not ours to choose, so numeric
/// columns are cast to REAL on the way out.
///
/// Filters return names in ascending catalog id order. A filter that matches
/// nothing yields an empty `Vec`; a name that is not in the catalog yields
/// `None`. Where a name appears more than once the lowest id wins.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    db: Database,
}

impl QueryEngine {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn city(&self, city_name: &str) -> Result<Option<City>> {
        let city = sqlx::query_as::<_, City>(
            "SELECT id, city, country,
                    CAST(lat AS REAL) AS lat,
                    CAST(lng AS REAL) AS lng,
                    CAST(density AS REAL) AS density
             FROM cities WHERE city = ? ORDER BY id LIMIT 1",
        )
        .bind(city_name)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(city)
    }

    pub async fn coordinates(&self, city_name: &str) -> Result<Option<Coordinates>> {
        let row = sqlx::query_as::<_, (f64, f64)>(
            "SELECT CAST(lat AS REAL), CAST(lng AS REAL)
             FROM cities WHERE city = ? ORDER BY id LIMIT 1",
        )
        .bind(city_name)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Coordinates::from))
    }

    pub async fn cities_in_country(&self, country_name: &str) -> Result<Vec<String>> {
        let names = sqlx::query_scalar("SELECT city FROM cities WHERE country = ? ORDER BY id")
            .bind(country_name)
            .fetch_all(self.db.pool())
            .await?;

        Ok(names)
    }

    /// Cities with `min <= density <= max`. Fails with `InvalidRange` before
    /// touching storage when `min > max`.
    pub async fn cities_by_density(&self, min: f64, max: f64) -> Result<Vec<String>> {
        let range = DensityRange::new(min, max)?;

        let names = sqlx::query_scalar(
            "SELECT city FROM cities WHERE density BETWEEN ? AND ? ORDER BY id",
        )
        .bind(range.min())
        .bind(range.max())
        .fetch_all(self.db.pool())
        .await?;

        Ok(names)
    }

    pub async fn cities_in_country_by_density(
        &self,
        country_name: &str,
        min: f64,
        max: f64,
    ) -> Result<Vec<String>> {
        let range = DensityRange::new(min, max)?;

        let names = sqlx::query_scalar(
            "SELECT city FROM cities
             WHERE country = ? AND density BETWEEN ? AND ?
             ORDER BY id",
        )
        .bind(country_name)
        .bind(range.min())
        .bind(range.max())
        .fetch_all(self.db.pool())
        .await?;

        Ok(names)
    }
}
