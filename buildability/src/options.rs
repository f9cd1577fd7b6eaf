use anyhow::{anyhow, Error as AnyError};
use arcgis::{config, ServiceConfig};
use clap::{ArgGroup, Parser, ValueEnum};
use std::{path::PathBuf, str::FromStr, time::Duration};
use worksheet::ContourInterval;

/// Los Altos Hills Worksheet #1: average slope, LUF, MDA and MFA from
/// Santa Clara County GIS.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["address", "apn", "batch"])))]
pub struct Cli {
    /// Street address, e.g. "24785 Prospect Ave, Los Altos Hills, CA".
    #[arg(long)]
    pub address: Option<String>,

    /// Assessor's Parcel Number (digits, dashes allowed).
    #[arg(long)]
    pub apn: Option<String>,

    /// Text file with one address per line.
    #[arg(long)]
    pub batch: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Append one row per lookup to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Contour interval in feet. Only contours on this interval are
    /// used. Detected from the contour layer when omitted (5 or 10).
    #[arg(long)]
    pub interval: Option<Feet>,

    /// Image service URL for the DEM slope cross-check.
    #[arg(long)]
    pub dem_service: Option<String>,

    /// Number of DEM sample points (at most 10000).
    #[arg(
        long,
        default_value_t = 225,
        value_parser = clap::value_parser!(u32).range(1..=10_000),
    )]
    pub dem_samples: u32,

    #[arg(long, default_value = config::PARCEL_LAYER)]
    pub parcel_layer: String,

    #[arg(long, default_value = config::CONTOUR_LAYER)]
    pub contour_layer: String,

    /// Spatial reference WKID; must be measured in feet.
    #[arg(long, default_value_t = config::SR_WKID)]
    pub wkid: u32,

    /// HTTP request timeout, in seconds.
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human readable table.
    Table,

    /// JSON.
    Json,
}

/// A positive length in feet.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct Feet(pub f64);

impl FromStr for Feet {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let feet = f64::from_str(s.trim())?;
        if feet.is_finite() && feet > 0.0 {
            Ok(Self(feet))
        } else {
            Err(anyhow!("not a positive number of feet"))
        }
    }
}

/// A single lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Address(String),
    Apn(String),
}

impl Query {
    /// Returns the text the user asked about.
    pub fn input(&self) -> &str {
        match self {
            Self::Address(s) | Self::Apn(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Single(Query),
    Batch(PathBuf),
}

impl Cli {
    pub fn input(&self) -> Result<Input, AnyError> {
        match (&self.address, &self.apn, &self.batch) {
            (Some(address), None, None) => Ok(Input::Single(Query::Address(address.clone()))),
            (None, Some(apn), None) => Ok(Input::Single(Query::Apn(apn.clone()))),
            (None, None, Some(path)) => Ok(Input::Batch(path.clone())),
            _ => Err(anyhow!("expected exactly one of --address, --apn or --batch")),
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            parcel_layer: self.parcel_layer.clone(),
            contour_layer: self.contour_layer.clone(),
            dem_service: self.dem_service.clone(),
            wkid: self.wkid,
            timeout: Duration::from_secs(self.timeout),
            ..ServiceConfig::default()
        }
    }

    pub fn contour_interval(&self) -> ContourInterval {
        self.interval
            .map_or(ContourInterval::Detect, |Feet(ft)| ContourInterval::Fixed(ft))
    }

    /// Returns the DEM sample count when a DEM service is configured.
    pub fn dem_samples(&self) -> Option<usize> {
        self.dem_service
            .as_ref()
            .and_then(|_| usize::try_from(self.dem_samples).ok())
    }
}
