use crate::{WorksheetError, SQFT_PER_ACRE};
use geo::{
    geometry::{MultiLineString, MultiPolygon},
    Area,
};

/// A county parcel.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    /// Assessor's Parcel Number.
    apn: String,

    /// Situs address, when the county record has one.
    address: Option<String>,

    /// Parcel boundary in feet.
    boundary: MultiPolygon<f64>,

    /// Boundary area in square feet.
    area_sqft: f64,
}

impl Parcel {
    pub fn new(
        apn: impl Into<String>,
        boundary: MultiPolygon<f64>,
    ) -> Result<Self, WorksheetError> {
        if boundary.0.is_empty() {
            return Err(WorksheetError::EmptyBoundary);
        }
        let area_sqft = boundary.unsigned_area();
        if !(area_sqft > 0.0) {
            return Err(WorksheetError::ZeroArea);
        }
        Ok(Self {
            apn: apn.into(),
            address: None,
            boundary,
            area_sqft,
        })
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn apn(&self) -> &str {
        &self.apn
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn boundary(&self) -> &MultiPolygon<f64> {
        &self.boundary
    }

    /// Returns the parcel area in square feet.
    pub fn area_sqft(&self) -> f64 {
        self.area_sqft
    }

    /// Returns the parcel area in acres (`An` on the worksheet).
    pub fn area_acres(&self) -> f64 {
        self.area_sqft / SQFT_PER_ACRE
    }
}

/// Which contour series a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourKind {
    /// Major, labeled contours.
    Index,
    /// Minor contours between index lines.
    Intermediate,
    Other,
}

impl ContourKind {
    /// Decodes the county contour layer's `LAYER` attribute.
    pub fn from_layer(layer: &str) -> Self {
        match layer.trim().to_ascii_uppercase().as_str() {
            "INDEX" => Self::Index,
            "INTERMEDIATE" => Self::Intermediate,
            _ => Self::Other,
        }
    }
}

/// A single elevation contour.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Elevation in feet, if the layer reported one.
    pub elevation: Option<f64>,

    pub kind: ContourKind,

    pub line: MultiLineString<f64>,
}
