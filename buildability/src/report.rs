use crate::{error::Error, options::Query};
use arcgis::GisSource;
use log::{debug, info, warn};
use serde::Serialize;
use worksheet::{round_to, ContourInterval, Limits, Parcel, SlopeResult, Worksheet};

/// Buildability figures for one parcel.
///
/// Values are rounded once, here, so every output format renders the
/// same numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Address or APN as given.
    pub input: String,

    pub address: Option<String>,

    pub apn: String,

    /// Parcel area, ft².
    pub area: f64,

    /// Parcel area, acres.
    pub area_acres: f64,

    pub contour_count: usize,

    /// Contour length inside the parcel, ft.
    pub contour_length: f64,

    /// Contour interval, ft.
    pub interval: f64,

    /// Average slope, percent.
    pub average_slope: f64,

    pub luf: f64,

    /// Maximum Development Area, ft².
    pub mda: f64,

    /// Maximum Floor Area, ft².
    pub mfa: f64,

    pub requires_cdp: bool,

    /// DEM cross-check slope, percent.
    pub dem_slope: Option<f64>,
}

impl Report {
    pub fn new(
        input: &str,
        parcel: &Parcel,
        slope: &SlopeResult,
        limits: &Limits,
        dem_slope: Option<f64>,
    ) -> Self {
        Self {
            input: input.to_owned(),
            address: parcel.address().map(str::to_owned),
            apn: parcel.apn().to_owned(),
            area: round_to(parcel.area_sqft(), 1),
            area_acres: round_to(slope.area_acres, 4),
            contour_count: slope.contour_count,
            contour_length: round_to(slope.contour_length_ft, 1),
            interval: slope.interval_ft,
            average_slope: round_to(slope.slope, 2),
            luf: round_to(limits.luf, 6),
            mda: limits.mda,
            mfa: limits.mfa,
            requires_cdp: limits.requires_cdp,
            dem_slope: dem_slope.map(|s| round_to(s, 2)),
        }
    }
}

/// Runs lookups against a [`GisSource`].
pub struct Analyzer<'a, S> {
    source: &'a S,
    worksheet: Worksheet,
    interval: ContourInterval,
    dem_samples: Option<usize>,
}

impl<'a, S: GisSource> Analyzer<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            worksheet: Worksheet::LOS_ALTOS_HILLS,
            interval: ContourInterval::Detect,
            dem_samples: None,
        }
    }

    pub fn interval(mut self, interval: ContourInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Enables the DEM cross-check with this many sample points.
    pub fn dem_samples(mut self, samples: Option<usize>) -> Self {
        self.dem_samples = samples;
        self
    }

    pub fn run(&self, query: &Query) -> Result<Report, Error> {
        let now = std::time::Instant::now();

        let parcel = match query {
            Query::Address(address) => self.source.parcel_by_address(address)?,
            Query::Apn(apn) => self.source.parcel_by_apn(apn)?,
        };
        let contours = self.source.contours(&parcel)?;
        let slope = self
            .worksheet
            .parcel_slope(&parcel, &contours, self.interval)?;
        let limits = self.worksheet.evaluate(slope.area_acres, slope.slope);

        // The DEM slope is a cross-check only; its failure doesn't
        // invalidate the worksheet figures.
        let dem_slope = match self.dem_samples {
            Some(samples) => match self.source.dem_slope(&parcel, samples) {
                Ok(dem_slope) => dem_slope,
                Err(e) => {
                    warn!("apn {}: DEM sampling failed, {e}", parcel.apn());
                    None
                }
            },
            None => None,
        };

        debug!("{}: exec {:?}", query.input(), now.elapsed());
        info!(
            "apn {}; S: {:.2}%, LUF: {:.4}, MDA: {:.1}, MFA: {:.1}",
            parcel.apn(),
            slope.slope,
            limits.luf,
            limits.mda,
            limits.mfa
        );

        Ok(Report::new(
            query.input(),
            &parcel,
            &slope,
            &limits,
            dem_slope,
        ))
    }
}
