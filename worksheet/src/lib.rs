//! # Los Altos Hills Worksheet #1
//!
//! `worksheet` computes the Town of Los Altos Hills buildability
//! figures for a parcel: average slope (S), Lot Unit Factor (LUF),
//! Maximum Development Area (MDA) and Maximum Floor Area (MFA).
//!
//! All coordinates are planar and measured in feet (the county
//! services are queried in WKID 2227, NAD83 / California zone III).

mod error;
pub mod formula;
pub mod geometry;
mod parcel;
pub mod slope;

pub use {
    crate::{
        error::WorksheetError,
        formula::{Limits, Worksheet},
        parcel::{Contour, ContourKind, Parcel},
        slope::{ContourInterval, SlopeResult},
    },
    geo,
};

/// Square feet per acre.
pub const SQFT_PER_ACRE: f64 = 43_560.0;

/// Rounds `val` to `decimals` places.
pub fn round_to(val: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (val * scale).round() / scale
}
