//! # Santa Clara County GIS
//!
//! `arcgis` resolves parcels and their elevation contours through the
//! county's ArcGIS REST services.

mod client;
pub mod config;
mod error;
pub mod esri;
pub mod query;

pub use crate::{client::ArcGis, config::ServiceConfig, error::GisError};
use worksheet::{Contour, Parcel};

/// A source of parcel and terrain data.
pub trait GisSource {
    /// Returns the parcel at `address`.
    fn parcel_by_address(&self, address: &str) -> Result<Parcel, GisError>;

    /// Returns the parcel with Assessor's Parcel Number `apn`.
    fn parcel_by_apn(&self, apn: &str) -> Result<Parcel, GisError>;

    /// Returns the contours intersecting `parcel`.
    ///
    /// Fails with [`GisError::NotFound`] when none do.
    fn contours(&self, parcel: &Parcel) -> Result<Vec<Contour>, GisError>;

    /// Returns the mean DEM slope (percent rise) sampled at up to
    /// `samples` points inside `parcel`.
    fn dem_slope(&self, parcel: &Parcel, samples: usize) -> Result<Option<f64>, GisError>;
}
