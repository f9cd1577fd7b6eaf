use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorksheetError {
    #[error("parcel boundary is empty")]
    EmptyBoundary,

    #[error("parcel area must be positive")]
    ZeroArea,

    #[error("no contours to compute slope from")]
    NoContours,

    #[error("invalid contour interval {0} ft")]
    Interval(f64),
}
