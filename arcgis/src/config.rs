//! Santa Clara County service defaults.

use std::time::Duration;

macro_rules! scc_base {
    () => {
        "https://mapservices.sccgov.org/arcgis/rest/services"
    };
}

/// County ArcGIS REST root.
pub const SCC_BASE: &str = scc_base!();

/// Parcel (property) layer.
pub const PARCEL_LAYER: &str = concat!(scc_base!(), "/property/SCCProperty/MapServer/0");

/// Elevation contour layer.
pub const CONTOUR_LAYER: &str = concat!(scc_base!(), "/basic/SCCContour/MapServer/0");

/// NAD83 / California zone III (ftUS).
pub const SR_WKID: u32 = 2227;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(40);

pub const USER_AGENT: &str = "buildability-lah/1.0";

/// Where and how to reach the GIS services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub parcel_layer: String,

    pub contour_layer: String,

    /// DEM image service used for the slope cross-check. DEM sampling
    /// is disabled when unset.
    pub dem_service: Option<String>,

    /// Spatial reference for all geometry in and out.
    pub wkid: u32,

    pub timeout: Duration,

    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            parcel_layer: PARCEL_LAYER.to_owned(),
            contour_layer: CONTOUR_LAYER.to_owned(),
            dem_service: None,
            wkid: SR_WKID,
            timeout: DEFAULT_TIMEOUT,
            user_agent: USER_AGENT.to_owned(),
        }
    }
}
