use serde::{Deserialize, Serialize};

use crate::{
    config::Units,
    error::{CityError, Result},
};

/// A catalog row. Provisioned out of band and never written by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: i64,
    #[sqlx(rename = "city")]
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub density: f64,
}

impl City {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

/// Inclusive population density bounds, `min <= density <= max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityRange {
    min: f64,
    max: f64,
}

impl DensityRange {
    /// Rejects inverted bounds and NaN instead of letting them match nothing.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(CityError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, density: f64) -> bool {
        self.min <= density && density <= self.max
    }
}

/// A named point handed to a map renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub name: String,
    pub coordinates: Coordinates,
}

/// Current conditions for a city as reported by a weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub city: String,
    pub temperature: f64,
    pub units: Units,
    pub condition: String,
}

impl CityWeather {
    /// One-line rendering, e.g. `21.4°C, clear sky`.
    pub fn summary(&self) -> String {
        format!("{}{}, {}", self.temperature, self.units.temperature_suffix(), self.condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_range_is_inclusive() {
        let range = DensityRange::new(4000.0, 6000.0).expect("valid range");
        assert!(range.contains(4000.0));
        assert!(range.contains(6000.0));
        assert!(!range.contains(3999.9));
        assert!(!range.contains(6000.1));
    }

    #[test]
    fn density_range_accepts_single_point() {
        let range = DensityRange::new(5000.0, 5000.0).expect("min == max is valid");
        assert!(range.contains(5000.0));
    }

    #[test]
    fn inverted_density_range_is_rejected() {
        let err = DensityRange::new(7000.0, 5000.0).unwrap_err();
        assert!(matches!(
            err,
            CityError::InvalidRange { min, max } if min == 7000.0 && max == 5000.0
        ));
        assert!(err.to_string().contains("Invalid density range"));
    }

    #[test]
    fn nan_bound_is_rejected() {
        assert!(DensityRange::new(f64::NAN, 10.0).is_err());
        assert!(DensityRange::new(0.0, f64::NAN).is_err());
    }
}
