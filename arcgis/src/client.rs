//! ArcGIS REST client.

use crate::{
    esri::{
        self, attr_f64, attr_string, EsriPolygon, EsriPolyline, Feature, FeatureSet, LayerInfo,
        Samples,
    },
    query, GisError, GisSource, ServiceConfig,
};
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use worksheet::{geometry::sample_grid, round_to, Contour, ContourKind, Parcel};

/// Maximum number of contour features requested per parcel.
const MAX_CONTOURS: u32 = 2000;

/// Maximum number of parcels considered for an address match.
const MAX_ADDRESS_MATCHES: u32 = 5;

/// Elevation field used when the contour layer doesn't advertise one.
const FALLBACK_ELEVATION_FIELD: &str = "ELEVATION";

pub struct ArcGis {
    client: Client,
    config: ServiceConfig,
}

impl ArcGis {
    pub fn new(config: ServiceConfig) -> Result<Self, GisError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

impl ArcGis {
    fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, GisError> {
        debug!("GET {url}; {params:?}");
        let body = self
            .client
            .get(url)
            .query(&[("f", "json")])
            .query(params)
            .send()?
            .error_for_status()?
            .text()?;
        decode(&body)
    }

    fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, GisError> {
        debug!("POST {url}; {} params", params.len());
        let mut form: Vec<(&str, &str)> = vec![("f", "json")];
        form.extend(params.iter().map(|(k, v)| (*k, v.as_str())));
        let body = self
            .client
            .post(url)
            .form(&form)
            .send()?
            .error_for_status()?
            .text()?;
        decode(&body)
    }

    fn query_parcels(
        &self,
        where_clause: String,
        max: Option<u32>,
    ) -> Result<FeatureSet<EsriPolygon>, GisError> {
        let mut params = vec![
            ("where", where_clause),
            ("outFields", "*".to_owned()),
            ("returnGeometry", "true".to_owned()),
            ("outSR", self.config.wkid.to_string()),
        ];
        if let Some(max) = max {
            params.push(("resultRecordCount", max.to_string()));
        }
        self.get(&format!("{}/query", self.config.parcel_layer), &params)
    }

    fn elevation_field(&self) -> Result<String, GisError> {
        let info: LayerInfo = self.get(&self.config.contour_layer, &[])?;
        let field = info
            .elevation_field()
            .unwrap_or(FALLBACK_ELEVATION_FIELD)
            .to_owned();
        debug!("contour elevation field: {field}");
        Ok(field)
    }
}

impl GisSource for ArcGis {
    fn parcel_by_address(&self, address: &str) -> Result<Parcel, GisError> {
        let where_clause = query::address_where(address)?;
        let features = self
            .query_parcels(where_clause, Some(MAX_ADDRESS_MATCHES))?
            .features;
        debug!("{} parcel(s) match '{address}'", features.len());
        let feature = features.into_iter().next().ok_or_else(|| {
            GisError::NotFound(format!("no parcel found for address '{address}'"))
        })?;
        Ok(parcel_from_feature(feature, None)?.with_address(address.trim()))
    }

    fn parcel_by_apn(&self, apn: &str) -> Result<Parcel, GisError> {
        let where_clause = query::apn_where(apn)?;
        let feature = self
            .query_parcels(where_clause, None)?
            .features
            .into_iter()
            .next()
            .ok_or_else(|| GisError::NotFound(format!("no parcel for APN {apn}")))?;
        let apn = query::normalize_apn(apn)?;
        parcel_from_feature(feature, Some(&apn))
    }

    fn contours(&self, parcel: &Parcel) -> Result<Vec<Contour>, GisError> {
        let field = self.elevation_field()?;
        let wkid = self.config.wkid.to_string();
        let params = [
            ("where", format!("{field} IS NOT NULL")),
            ("outFields", "*".to_owned()),
            ("returnGeometry", "true".to_owned()),
            (
                "geometry",
                EsriPolygon::json(parcel.boundary(), self.config.wkid).to_string(),
            ),
            ("geometryType", "esriGeometryPolygon".to_owned()),
            ("spatialRel", "esriSpatialRelIntersects".to_owned()),
            ("inSR", wkid.clone()),
            ("outSR", wkid),
            ("resultRecordCount", MAX_CONTOURS.to_string()),
        ];
        let features: FeatureSet<EsriPolyline> =
            self.post(&format!("{}/query", self.config.contour_layer), &params)?;
        let contours: Vec<Contour> = features
            .features
            .into_iter()
            .map(|feature| contour_from_feature(feature, &field))
            .collect();
        debug!("apn {}: {} contour(s)", parcel.apn(), contours.len());
        if contours.is_empty() {
            return Err(GisError::NotFound(format!(
                "no contours intersect parcel {}",
                parcel.apn()
            )));
        }
        Ok(contours)
    }

    fn dem_slope(&self, parcel: &Parcel, samples: usize) -> Result<Option<f64>, GisError> {
        let Some(dem_service) = &self.config.dem_service else {
            return Ok(None);
        };
        let points: Vec<[f64; 2]> = sample_grid(parcel.boundary(), samples)
            .into_iter()
            .map(|c| [c.x, c.y])
            .collect();
        if points.is_empty() {
            return Ok(None);
        }
        debug!("apn {}: {} DEM sample point(s)", parcel.apn(), points.len());

        let wkid = self.config.wkid.to_string();
        let geometry = json!({
            "points": points,
            "spatialReference": { "wkid": self.config.wkid },
        });
        let rendering_rule = json!({
            "rasterFunction": "Slope",
            "rasterFunctionArguments": { "zFactor": 1, "slopeType": "PERCENT_RISE" },
            "variableName": "Raster",
        });
        let params = [
            ("geometryType", "esriGeometryMultipoint".to_owned()),
            ("geometry", geometry.to_string()),
            ("inSR", wkid.clone()),
            ("outSR", wkid),
            ("returnGeometry", "false".to_owned()),
            ("renderingRule", rendering_rule.to_string()),
        ];
        let samples: Samples = self.post(&format!("{dem_service}/getSamples"), &params)?;
        Ok(samples.mean().map(|mean| round_to(mean, 2)))
    }
}

/// Decodes a response body, surfacing in-band service errors.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, GisError> {
    let value: Value = serde_json::from_str(body)?;
    Ok(serde_json::from_value(esri::check(value)?)?)
}

fn parcel_from_feature(
    feature: Feature<EsriPolygon>,
    apn: Option<&str>,
) -> Result<Parcel, GisError> {
    let apn = attr_string(&feature.attributes, "APN")
        .or_else(|| apn.map(str::to_owned))
        .unwrap_or_default();
    let boundary = feature.geometry.unwrap_or_default().to_multi_polygon();
    let parcel = Parcel::new(apn, boundary)?;
    debug!("apn {}: {:.1} ft²", parcel.apn(), parcel.area_sqft());
    Ok(parcel)
}

fn contour_from_feature(feature: Feature<EsriPolyline>, elevation_field: &str) -> Contour {
    let elevation = attr_f64(&feature.attributes, elevation_field);
    let kind = attr_string(&feature.attributes, "LAYER")
        .map_or(ContourKind::Other, |layer| ContourKind::from_layer(&layer));
    let line = feature.geometry.unwrap_or_default().to_multi_line_string();
    Contour {
        elevation,
        kind,
        line,
    }
}
