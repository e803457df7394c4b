//! Row filtering primitives for listing tables.

pub mod dates;
pub mod geo;
pub mod missing;
pub mod outlier;
pub mod range;

pub use dates::parse_dates;
pub use geo::{filter_bounding_box, BoundingBox, NYC_BOUNDING_BOX};
pub use missing::drop_missing;
pub use outlier::{bounds_from_quartiles, filter_iqr, iqr_bounds, quantile_sorted, quartiles};
pub use range::{filter_range, Bounds};
