use thiserror::Error;

/// Failures surfaced by the city store and query engine.
///
/// A missing city or an empty selection is not an error: those come back as
/// `false`, `None` or an empty `Vec`.
#[derive(Debug, Error)]
pub enum CityError {
    #[error("City storage is unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("Invalid density range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },
}

pub type Result<T> = std::result::Result<T, CityError>;
