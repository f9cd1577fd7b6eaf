//! Esri JSON payloads.
//!
//! # References
//!
//! 1. [Geometry objects](https://developers.arcgis.com/documentation/common-data-types/geometry-objects.htm)
//! 1. [Query (Map Service/Layer)](https://developers.arcgis.com/rest/services-reference/enterprise/query-map-service-layer-.htm)

use crate::GisError;
use geo::{
    geometry::{Coord, LineString, MultiLineString, MultiPolygon, Polygon},
    orient::Direction,
    Area, Contains, Intersects, Orient,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// A query response.
#[derive(Debug, Deserialize)]
pub struct FeatureSet<G> {
    #[serde(default = "Vec::new")]
    pub features: Vec<Feature<G>>,
}

#[derive(Debug, Deserialize)]
pub struct Feature<G> {
    #[serde(default)]
    pub attributes: Map<String, Value>,

    pub geometry: Option<G>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EsriPolygon {
    #[serde(default)]
    pub rings: Vec<Vec<Vec<f64>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EsriPolyline {
    #[serde(default)]
    pub paths: Vec<Vec<Vec<f64>>>,
}

/// Layer metadata; only the field list is of interest.
#[derive(Debug, Default, Deserialize)]
pub struct LayerInfo {
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Deserialize)]
pub struct FieldInfo {
    pub name: String,
}

/// An image service `getSamples` response.
#[derive(Debug, Default, Deserialize)]
pub struct Samples {
    #[serde(default)]
    pub samples: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
pub struct Sample {
    #[serde(default)]
    pub value: Value,
}

/// Returns `value`, or the error it carries.
///
/// ArcGIS reports most failures as HTTP 200 with an `error` object in
/// the body.
pub fn check(value: Value) -> Result<Value, GisError> {
    match value.get("error") {
        Some(err) => {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or_default();
            let mut message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_owned();
            let details: Vec<&str> = err
                .get("details")
                .and_then(Value::as_array)
                .map(|details| details.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            if !details.is_empty() {
                message = format!("{message} ({})", details.join("; "));
            }
            Err(GisError::Service { code, message })
        }
        None => Ok(value),
    }
}

fn coords(points: &[Vec<f64>]) -> Vec<Coord<f64>> {
    points
        .iter()
        .filter_map(|p| match p.as_slice() {
            [x, y, ..] => Some(Coord { x: *x, y: *y }),
            _ => None,
        })
        .collect()
}

impl EsriPolygon {
    /// Converts Esri rings to a `MultiPolygon`.
    ///
    /// Esri exterior rings are clockwise and holes counter-clockwise.
    /// A hole is attached to the first exterior strictly containing one
    /// of its vertices, else the first exterior it touches; a hole with
    /// neither is kept as an exterior.
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        let mut exteriors: Vec<Polygon<f64>> = Vec::new();
        let mut holes: Vec<LineString<f64>> = Vec::new();

        for ring in &self.rings {
            let ring = coords(ring);
            if ring.len() < 3 {
                continue;
            }
            let ring = Polygon::new(LineString::from(ring), vec![]);
            if ring.signed_area() < 0.0 {
                exteriors.push(ring);
            } else {
                let (exterior, _) = ring.into_inner();
                holes.push(exterior);
            }
        }

        for hole in holes {
            let parent = exteriors
                .iter()
                .position(|ext| hole.0.iter().any(|c| ext.contains(c)))
                .or_else(|| exteriors.iter().position(|ext| ext.intersects(&hole)));
            match parent {
                Some(idx) => exteriors[idx].interiors_push(hole),
                None => exteriors.push(Polygon::new(hole, vec![])),
            }
        }

        MultiPolygon(exteriors)
    }

    /// Returns the Esri JSON for `boundary`, exteriors clockwise.
    pub fn json(boundary: &MultiPolygon<f64>, wkid: u32) -> Value {
        let rings: Vec<Vec<[f64; 2]>> = boundary
            .orient(Direction::Reversed)
            .iter()
            .flat_map(|poly| std::iter::once(poly.exterior()).chain(poly.interiors()))
            .map(|ring| ring.coords().map(|c| [c.x, c.y]).collect())
            .collect();
        json!({
            "rings": rings,
            "spatialReference": { "wkid": wkid },
        })
    }
}

impl EsriPolyline {
    pub fn to_multi_line_string(&self) -> MultiLineString<f64> {
        MultiLineString(
            self.paths
                .iter()
                .map(|path| coords(path))
                .filter(|path| path.len() >= 2)
                .map(LineString::from)
                .collect(),
        )
    }
}

/// Returns the attribute `key` as a string, matching the name
/// exactly first, then ignoring case.
pub fn attr_string(attributes: &Map<String, Value>, key: &str) -> Option<String> {
    let value = attributes.get(key).or_else(|| {
        attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value)
    })?;
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Returns the attribute `key` as a number.
pub fn attr_f64(attributes: &Map<String, Value>, key: &str) -> Option<f64> {
    attr_string(attributes, key).and_then(|s| s.parse().ok())
}

/// Elevation attribute names, in order of preference.
pub const ELEVATION_FIELDS: [&str; 5] = ["ELEV", "ELEVATION", "CONTOUR", "INDEXELEV", "INDEX"];

impl LayerInfo {
    /// Returns the name of the layer's elevation field, if any.
    pub fn elevation_field(&self) -> Option<&str> {
        ELEVATION_FIELDS.iter().find_map(|candidate| {
            self.fields
                .iter()
                .find(|field| field.name.eq_ignore_ascii_case(candidate))
                .map(|field| field.name.as_str())
        })
    }
}

impl Samples {
    /// Returns the mean of the numeric sample values.
    pub fn mean(&self) -> Option<f64> {
        let values: Vec<f64> = self
            .samples
            .iter()
            .filter_map(|sample| match &sample.value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            })
            .filter(|v| v.is_finite())
            .collect();
        if values.is_empty() {
            None
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = values.len() as f64;
            Some(values.iter().sum::<f64>() / n)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        attr_f64, attr_string, check, EsriPolygon, EsriPolyline, FeatureSet, LayerInfo, Samples,
    };
    use crate::GisError;
    use assert_approx_eq::assert_approx_eq;
    use geo::{Area, EuclideanLength};
    use serde_json::json;

    #[test]
    fn test_polygon_with_hole() {
        let polygon: EsriPolygon = serde_json::from_value(json!({
            "rings": [
                [[0.0, 0.0], [0.0, 100.0], [100.0, 100.0], [100.0, 0.0], [0.0, 0.0]],
                [[25.0, 25.0], [75.0, 25.0], [75.0, 75.0], [25.0, 75.0], [25.0, 25.0]],
            ],
            "spatialReference": { "wkid": 2227 },
        }))
        .unwrap();
        let mp = polygon.to_multi_polygon();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert_approx_eq!(mp.unsigned_area(), 7_500.0);
    }

    #[test]
    fn test_hole_touching_exterior() {
        // Triangular hole whose first vertex sits on the exterior's
        // left edge.
        let polygon: EsriPolygon = serde_json::from_value(json!({
            "rings": [
                [[0.0, 0.0], [0.0, 100.0], [100.0, 100.0], [100.0, 0.0], [0.0, 0.0]],
                [[0.0, 50.0], [50.0, 25.0], [50.0, 75.0], [0.0, 50.0]],
            ],
        }))
        .unwrap();
        let mp = polygon.to_multi_polygon();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert_approx_eq!(mp.unsigned_area(), 8_750.0);
    }

    #[test]
    fn test_polygon_two_parts_and_zm() {
        let polygon: EsriPolygon = serde_json::from_value(json!({
            "hasZ": true,
            "rings": [
                [[0.0, 0.0, 5.0], [0.0, 10.0, 5.0], [10.0, 10.0, 5.0], [10.0, 0.0, 5.0], [0.0, 0.0, 5.0]],
                [[20.0, 0.0], [20.0, 10.0], [30.0, 10.0], [30.0, 0.0], [20.0, 0.0]],
                [[1.0], [2.0]],
            ],
        }))
        .unwrap();
        let mp = polygon.to_multi_polygon();
        assert_eq!(mp.0.len(), 2);
        assert_approx_eq!(mp.unsigned_area(), 200.0);
    }

    #[test]
    fn test_orphan_hole_is_exterior() {
        let polygon = EsriPolygon {
            rings: vec![vec![
                vec![0.0, 0.0],
                vec![10.0, 0.0],
                vec![10.0, 10.0],
                vec![0.0, 10.0],
                vec![0.0, 0.0],
            ]],
        };
        assert_approx_eq!(polygon.to_multi_polygon().unsigned_area(), 100.0);
    }

    #[test]
    fn test_polygon_json_round_trip() {
        let original: EsriPolygon = serde_json::from_value(json!({
            "rings": [
                [[0.0, 0.0], [0.0, 100.0], [100.0, 100.0], [100.0, 0.0], [0.0, 0.0]],
                [[25.0, 25.0], [75.0, 25.0], [75.0, 75.0], [25.0, 75.0], [25.0, 25.0]],
            ],
        }))
        .unwrap();
        let mp = original.to_multi_polygon();
        let value = EsriPolygon::json(&mp, 2227);
        assert_eq!(value["spatialReference"]["wkid"], 2227);
        let decoded: EsriPolygon = serde_json::from_value(value).unwrap();
        assert_eq!(decoded.to_multi_polygon(), mp);
    }

    #[test]
    fn test_polyline() {
        let line: EsriPolyline = serde_json::from_value(json!({
            "paths": [
                [[0.0, 0.0], [3.0, 4.0], [3.0, 10.0]],
                [[5.0, 5.0]],
            ],
        }))
        .unwrap();
        let mls = line.to_multi_line_string();
        assert_eq!(mls.0.len(), 1);
        assert_approx_eq!(mls.euclidean_length(), 11.0);
    }

    #[test]
    fn test_check_error_envelope() {
        let ok = json!({ "features": [] });
        assert_eq!(check(ok.clone()).unwrap(), ok);

        let err = json!({
            "error": {
                "code": 400,
                "message": "Unable to complete operation.",
                "details": ["Invalid where clause"],
            }
        });
        match check(err) {
            Err(GisError::Service { code, message }) => {
                assert_eq!(code, 400);
                assert_eq!(message, "Unable to complete operation. (Invalid where clause)");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_feature_attributes() {
        let set: FeatureSet<EsriPolyline> = serde_json::from_value(json!({
            "features": [
                { "attributes": { "Elevation": 405, "LAYER": "INTERMEDIATE", "APN": "33628010" } },
                { "attributes": { "Elevation": "410.0", "LAYER": " " }, "geometry": { "paths": [] } },
            ],
        }))
        .unwrap();
        assert_eq!(set.features.len(), 2);
        let first = &set.features[0].attributes;
        assert_eq!(attr_f64(first, "ELEVATION"), Some(405.0));
        assert_eq!(attr_string(first, "LAYER").as_deref(), Some("INTERMEDIATE"));
        assert!(set.features[0].geometry.is_none());
        let second = &set.features[1].attributes;
        assert_eq!(attr_f64(second, "Elevation"), Some(410.0));
        assert_eq!(attr_string(second, "LAYER"), None);

        let empty: FeatureSet<EsriPolygon> = serde_json::from_value(json!({})).unwrap();
        assert!(empty.features.is_empty());
    }

    #[test]
    fn test_elevation_field() {
        let info: LayerInfo = serde_json::from_value(json!({
            "name": "Contours",
            "fields": [
                { "name": "OBJECTID", "type": "esriFieldTypeOID" },
                { "name": "Contour", "type": "esriFieldTypeDouble" },
                { "name": "Elevation", "type": "esriFieldTypeDouble" },
            ],
        }))
        .unwrap();
        assert_eq!(info.elevation_field(), Some("Elevation"));
        assert_eq!(LayerInfo::default().elevation_field(), None);
    }

    #[test]
    fn test_samples_mean() {
        let samples: Samples = serde_json::from_value(json!({
            "samples": [
                { "value": "12.5" },
                { "value": 7.5 },
                { "value": "NoData" },
                { "location": {} },
            ],
        }))
        .unwrap();
        assert_eq!(samples.mean(), Some(10.0));
        assert_eq!(Samples::default().mean(), None);
    }
}
