//! Contour-derived average slope.

use crate::{
    geometry::{length_inside, MAX_PIECE_FT},
    Contour, ContourKind, Parcel, Worksheet, WorksheetError,
};
use log::{debug, warn};

/// How to pick the contour interval `I`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ContourInterval {
    /// 5 ft when intermediate contours are present, 10 ft otherwise.
    #[default]
    Detect,

    /// Use only contours whose elevation is a multiple of this many
    /// feet. Contours without an elevation are dropped.
    Fixed(f64),
}

/// Interval used when intermediate contours are present.
pub const INTERMEDIATE_INTERVAL_FT: f64 = 5.0;

/// Interval used when only index contours are present.
pub const INDEX_INTERVAL_FT: f64 = 10.0;

impl ContourInterval {
    /// Returns the interval in feet and the contours it applies to.
    pub fn select<'a>(&self, contours: &'a [Contour]) -> (f64, Vec<&'a Contour>) {
        match *self {
            Self::Detect => {
                let interval = if contours
                    .iter()
                    .any(|c| c.kind == ContourKind::Intermediate)
                {
                    INTERMEDIATE_INTERVAL_FT
                } else {
                    INDEX_INTERVAL_FT
                };
                (interval, contours.iter().collect())
            }
            Self::Fixed(interval) => {
                let selected = contours
                    .iter()
                    .filter(|c| c.elevation.is_some_and(|elev| on_interval(elev, interval)))
                    .collect();
                (interval, selected)
            }
        }
    }
}

fn on_interval(elevation: f64, interval: f64) -> bool {
    const EPS: f64 = 1e-6;
    let rem = elevation.rem_euclid(interval);
    rem < EPS || interval - rem < EPS
}

/// Average slope of a parcel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeResult {
    /// Number of contours used.
    pub contour_count: usize,

    /// Total contour length inside the parcel (`L`), in feet.
    pub contour_length_ft: f64,

    /// Contour interval (`I`), in feet.
    pub interval_ft: f64,

    /// Parcel area (`An`), in acres.
    pub area_acres: f64,

    /// Average slope (`S`), in percent.
    pub slope: f64,
}

impl Worksheet {
    /// Returns the average slope of `parcel` from the `contours`
    /// crossing it.
    pub fn parcel_slope(
        &self,
        parcel: &Parcel,
        contours: &[Contour],
        interval: ContourInterval,
    ) -> Result<SlopeResult, WorksheetError> {
        if contours.is_empty() {
            return Err(WorksheetError::NoContours);
        }
        let (interval_ft, selected) = interval.select(contours);
        if selected.is_empty() {
            return Err(WorksheetError::NoContours);
        }

        let contour_length_ft: f64 = selected
            .iter()
            .map(|contour| length_inside(parcel.boundary(), &contour.line, MAX_PIECE_FT))
            .sum();
        if contour_length_ft == 0.0 {
            warn!(
                "apn {}: no contour length inside parcel boundary",
                parcel.apn()
            );
        }

        let area_acres = parcel.area_acres();
        let slope = self.average_slope(contour_length_ft, interval_ft, area_acres)?;

        debug!(
            "apn {}; contours: {}, length: {contour_length_ft:.1} ft, interval: {interval_ft} ft, area: {area_acres:.4} ac, slope: {slope:.2}%",
            parcel.apn(),
            selected.len(),
        );

        Ok(SlopeResult {
            contour_count: selected.len(),
            contour_length_ft,
            interval_ft,
            area_acres,
            slope,
        })
    }
}
