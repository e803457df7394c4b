//! Geographic bounding-box filtering.

use super::range::Bounds;
use crate::data::Table;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Longitude/latitude acceptance box, inclusive on all sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub longitude: Bounds,
    pub latitude: Bounds,
}

/// New York City.
pub const NYC_BOUNDING_BOX: BoundingBox = BoundingBox {
    longitude: Bounds {
        lower: -74.25,
        upper: -73.50,
    },
    latitude: Bounds {
        lower: 40.5,
        upper: 41.2,
    },
};

impl BoundingBox {
    /// Check whether a point lies inside the box.
    pub fn contains(&self, longitude: f64, latitude: f64) -> bool {
        self.longitude.contains(longitude) && self.latitude.contains(latitude)
    }
}

/// Keep rows whose coordinates lie inside `bbox`.
///
/// A row with either coordinate missing is dropped.
pub fn filter_bounding_box(
    table: &Table,
    longitude_column: &str,
    latitude_column: &str,
    bbox: &BoundingBox,
) -> Result<Table> {
    let longitudes = table.numeric_column(longitude_column)?;
    let latitudes = table.numeric_column(latitude_column)?;

    let mask: Vec<bool> = longitudes
        .iter()
        .zip(&latitudes)
        .map(|(lon, lat)| match (lon, lat) {
            (Some(lon), Some(lat)) => bbox.contains(*lon, *lat),
            _ => false,
        })
        .collect();

    table.select_rows(&mask)
}
