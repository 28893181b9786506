use std::sync::OnceLock;

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tzf_rs::DefaultFinder;

use crate::model::Coordinates;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Great-circle distance between two points, in kilometres.
pub fn distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let (lat1, lat2) = (from.lat.to_radians(), to.lat.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = (to.lng - from.lng).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

/// IANA timezone covering `coords`, or UTC for open water and unknown zones.
pub fn timezone_at(coords: Coordinates) -> Tz {
    static FINDER: OnceLock<DefaultFinder> = OnceLock::new();
    let finder = FINDER.get_or_init(DefaultFinder::new);

    // tzf-rs takes (longitude, latitude)
    finder.get_tz_name(coords.lng, coords.lat).parse().unwrap_or(Tz::UTC)
}

pub fn local_time(coords: Coordinates, now: DateTime<Utc>) -> DateTime<Tz> {
    timezone_at(coords).from_utc_datetime(&now.naive_utc())
}
